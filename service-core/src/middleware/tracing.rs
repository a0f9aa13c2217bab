use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is propagated as is.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Propagates the caller's `x-request-id` when it is a short token of visible
/// ASCII, otherwise assigns a fresh one. The id is set on the request before
/// the trace span is created and echoed on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = match req.headers().get(REQUEST_ID_HEADER) {
        Some(value) if is_acceptable(value) => value.clone(),
        Some(_) => {
            let generated = generate();
            tracing::debug!(
                request_id = ?generated,
                "Replacing malformed x-request-id from client"
            );
            generated
        }
        None => generate(),
    };

    req.headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

fn is_acceptable(value: &HeaderValue) -> bool {
    let bytes = value.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= MAX_REQUEST_ID_LEN
        && bytes.iter().all(|b| b.is_ascii_graphic())
}

fn generate() -> HeaderValue {
    // A hyphenated UUID is always a valid header value
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("-"))
}
