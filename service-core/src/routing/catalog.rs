use super::GroupContext;
use crate::error::AppError;
use crate::store::Store;
use axum::{
    Json, Router,
    extract::State,
    http::{Method, Uri},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
struct GroupState {
    group: &'static str,
    description: &'static str,
    service_name: Arc<str>,
    store: Store,
}

/// Baseline endpoints every domain group exposes under its prefix:
/// a descriptor at `/`, a `/status` check and a JSON 404 for anything else.
pub fn domain_routes(group: &'static str, description: &'static str, ctx: &GroupContext) -> Router {
    let state = GroupState {
        group,
        description,
        service_name: ctx.service_name.clone(),
        store: ctx.store.clone(),
    };

    Router::new()
        .route("/", get(describe))
        .route("/status", get(status))
        .fallback(not_found)
        .with_state(state)
}

async fn describe(State(state): State<GroupState>) -> impl IntoResponse {
    Json(json!({
        "group": state.group,
        "service": state.service_name.as_ref(),
        "description": state.description,
    }))
}

async fn status(State(state): State<GroupState>) -> impl IntoResponse {
    let store = match state.store.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(group = state.group, error = %e, "Route group store check failed");
            "down"
        }
    };

    Json(json!({
        "group": state.group,
        "service": state.service_name.as_ref(),
        "status": "available",
        "store": store,
    }))
}

async fn not_found(State(state): State<GroupState>, method: Method, uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!(
        "No {} endpoint '{}' in route group '{}'",
        method,
        uri.path(),
        state.group
    ))
}
