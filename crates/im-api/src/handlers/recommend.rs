use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use im_common::api::recommend_request::RecommendRequest;
use im_common::matching::{ScoredMatch, rank};

use crate::SharedState;
use crate::error::ApiError;

/// Default result count when the caller does not pass `top_k`. Applied here
/// at the boundary; the ranker itself rejects a zero `top_k`.
const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub top_k: Option<usize>,
}

pub async fn recommend(
    State(state): State<SharedState>,
    Query(query): Query<RecommendQuery>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<Vec<ScoredMatch>>, ApiError> {
    if state.catalog.is_empty() {
        return Err(ApiError::Internal("internship catalog is empty".into()));
    }

    let top_k = query.top_k.unwrap_or(DEFAULT_TOP_K);
    let candidate = request.into_candidate();
    let results = rank(&candidate, state.catalog.internships(), top_k)?;

    Ok(Json(results))
}
