use crate::routing::ServedBy;
use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Prometheus scrape endpoint.
pub async fn metrics_endpoint(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Extension(ServedBy::Metrics),
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
