pub mod location;
pub mod rank;
pub mod scoring;
pub mod skills;
pub mod weights;

pub use rank::{rank, RankError};
pub use scoring::{score_internship, ScoredMatch};
