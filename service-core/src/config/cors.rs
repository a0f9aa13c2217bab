use crate::error::AppError;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Origins permitted to make cross-origin requests.
///
/// `Any` is the wildcard policy and is refused in production by
/// [`Settings::validate`](super::Settings::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl AllowedOrigins {
    pub fn parse(origins: &[String]) -> Result<Self, AppError> {
        let origins: Vec<&str> = origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "cors.allowed_origins must not be empty"
            )));
        }

        if origins.contains(&"*") {
            if origins.len() > 1 {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "cors.allowed_origins cannot mix '*' with explicit origins"
                )));
            }
            return Ok(AllowedOrigins::Any);
        }

        let values = origins
            .into_iter()
            .map(|o| {
                o.parse::<HeaderValue>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AllowedOrigins::List(values))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, AllowedOrigins::Any)
    }

    pub fn layer(&self) -> CorsLayer {
        let allow_origin = match self {
            AllowedOrigins::Any => AllowOrigin::any(),
            AllowedOrigins::List(origins) => AllowOrigin::list(origins.clone()),
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}
