//! Event ingestion endpoint
//!
//! Lets an out-of-process host push events into the pipeline. Emission
//! blocks on the forwarder's HTTP round trip, so it runs on the blocking
//! thread pool.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::ApiError;
use crate::api::state::AppState;
use crate::types::Event;

/// POST /api/events - Emit one event
pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<Event>,
) -> impl IntoResponse {
    let pipeline = Arc::clone(&state.pipeline);
    match tokio::task::spawn_blocking(move || pipeline.emit(&event)).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::internal(e.to_string())),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::http::create_router;
    use crate::api::state::AppState;
    use crate::counters::{CodeTable, CounterStore, CountingHook};
    use crate::hooks::EventPipeline;
    use crate::query::CounterQuery;
    use crate::types::CounterId;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn counting_app(store: Arc<CounterStore>) -> axum::Router {
        let pipeline = Arc::new(EventPipeline::new());
        let table = CodeTable::new().with("55P03", CounterId::LockTimeout);
        pipeline.register(Arc::new(CountingHook::new(store.clone(), Box::new(table))));
        create_router(Arc::new(AppState::new(CounterQuery::new(store), pipeline)))
    }

    #[tokio::test]
    async fn test_ingest_event_runs_pipeline() {
        let store = Arc::new(CounterStore::new());
        let app = counting_app(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/events")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"lock not available","severity":"error","code":"55P03"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(store.read(CounterId::LockTimeout), 1);
    }

    #[tokio::test]
    async fn test_ingest_rejects_missing_message() {
        let app = counting_app(Arc::new(CounterStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/events")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"severity":"error"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
