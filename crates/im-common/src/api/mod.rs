pub mod recommend_request;
