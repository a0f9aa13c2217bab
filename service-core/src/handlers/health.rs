use crate::routing::ServedBy;
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

/// Liveness endpoint. Reports only that the process is scheduling requests; it
/// never consults the store, the asset root or any route group.
pub async fn health_check(State(service_name): State<Arc<str>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Extension(ServedBy::Health),
        Json(json!({
            "status": "healthy",
            "service": service_name.as_ref(),
        })),
    )
}
