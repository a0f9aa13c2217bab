use crate::routing::ServedBy;
use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// Records request count and latency. Requests are labelled by the component
/// that served them rather than the raw path, which is unbounded for SPA
/// routes.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16().to_string();
    let served_by = response
        .extensions()
        .get::<ServedBy>()
        .map(ServedBy::label)
        .unwrap_or_else(|| "other".to_string());

    let labels = [
        ("method", method),
        ("served_by", served_by),
        ("status", status),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    response
}
