//! service-core: Shared service host for FinovaBank microservices.
pub mod assets;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routing;
pub mod startup;
pub mod store;

pub use axum;
pub use secrecy;
pub use serde;
pub use serde_json;
pub use sqlx;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
