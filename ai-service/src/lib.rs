//! FinovaBank AI service: fraud detection, risk assessment, recommendations
//! and analytics behind one service host.

pub mod routes;

use routes::AiGroup;
use service_core::config::{ServiceConfig, ServiceConfigBuilder, ServiceDefaults, Settings};
use sqlx::migrate::Migrator;

pub const SERVICE_NAME: &str = "FinovaBank AI Service";
pub const RUNNING_MESSAGE: &str = "AI Service is running";

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub fn defaults() -> ServiceDefaults {
    ServiceDefaults {
        port: 8012,
        asset_root: "ai-service/static",
        database_path: "ai-service/database/app.db",
        config_file: "ai-service/configuration",
    }
}

/// Host configuration with every AI route group registered in order.
pub fn service_config(settings: Settings) -> ServiceConfigBuilder {
    AiGroup::ALL.into_iter().fold(
        ServiceConfig::builder(SERVICE_NAME, settings, &MIGRATOR).running_message(RUNNING_MESSAGE),
        |builder, group| builder.group(group.prefix(), group),
    )
}
