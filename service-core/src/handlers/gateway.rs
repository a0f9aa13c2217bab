use super::Frontend;
use crate::routing::{ApiRouter, Dispatch};
use axum::{extract::Request, extract::State, response::Response};
use std::sync::Arc;

#[derive(Clone)]
pub struct GatewayState {
    pub api: Arc<ApiRouter>,
    pub frontend: Frontend,
}

/// Catch-all for every path the host does not answer itself: API route
/// groups first, then the frontend.
pub async fn gateway(State(state): State<GatewayState>, req: Request) -> Response {
    match state.api.route(req).await {
        Dispatch::Matched(response) => response,
        Dispatch::Unmatched(req) => state.frontend.serve(req).await,
    }
}
