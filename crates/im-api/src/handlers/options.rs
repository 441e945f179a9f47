use axum::{Json, extract::State};
use im_common::catalog::CatalogOptions;

use crate::SharedState;

/// Distinct field values across the catalog, for selection UIs. Pure catalog
/// introspection; the scoring engine is never involved.
pub async fn catalog_options(State(state): State<SharedState>) -> Json<CatalogOptions> {
    Json(state.catalog.options())
}
