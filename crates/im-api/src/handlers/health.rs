use axum::{Json, extract::State};
use serde_json::json;

use crate::SharedState;
use crate::error::ApiError;

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readyz(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(std::sync::atomic::Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable("shutting_down".into()));
    }

    if state.catalog.is_empty() {
        return Err(ApiError::ServiceUnavailable("catalog_empty".into()));
    }

    Ok(Json(json!({
        "status": "ok",
        "listings": state.catalog.len(),
        "application": env!("CARGO_PKG_NAME"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, atomic::AtomicBool};

    use im_common::catalog::Catalog;

    use crate::{AppConfig, AppState, SharedState, default_rate_limits};

    fn state_with_readiness(readiness: bool) -> SharedState {
        let catalog = Catalog::from_json_str(r#"[{"title": "Intern"}]"#).unwrap();

        Arc::new(AppState {
            catalog,
            config: AppConfig::for_tests(),
            rate_limits: default_rate_limits(),
            readiness: Arc::new(AtomicBool::new(readiness)),
        })
    }

    #[tokio::test]
    async fn readyz_rejects_when_readiness_disabled() {
        let state = state_with_readiness(false);

        let result = readyz(State(state)).await;

        match result {
            Err(ApiError::ServiceUnavailable(code)) => {
                assert!(code.contains("shutting_down"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn readyz_rejects_empty_catalog() {
        let state = Arc::new(AppState {
            catalog: Catalog::default(),
            config: AppConfig::for_tests(),
            rate_limits: default_rate_limits(),
            readiness: Arc::new(AtomicBool::new(true)),
        });

        let result = readyz(State(state)).await;

        match result {
            Err(ApiError::ServiceUnavailable(code)) => assert!(code.contains("catalog_empty")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn readyz_reports_listing_count() {
        let state = state_with_readiness(true);

        let Json(body) = readyz(State(state)).await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["listings"], 1);
    }
}
