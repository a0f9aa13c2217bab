pub mod frontend;
pub mod gateway;
pub mod health;
pub mod metrics;

pub use frontend::Frontend;
pub use gateway::{GatewayState, gateway};
pub use health::health_check;
pub use metrics::metrics_endpoint;
