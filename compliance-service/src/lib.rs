//! FinovaBank compliance service: audit, monitoring, security and reporting
//! behind one service host.

pub mod routes;

use routes::ComplianceGroup;
use service_core::config::{ServiceConfig, ServiceConfigBuilder, ServiceDefaults, Settings};
use sqlx::migrate::Migrator;

pub const SERVICE_NAME: &str = "FinovaBank Compliance Service";
pub const RUNNING_MESSAGE: &str = "Compliance Service is running";

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub fn defaults() -> ServiceDefaults {
    ServiceDefaults {
        port: 8013,
        asset_root: "compliance-service/static",
        database_path: "compliance-service/database/app.db",
        config_file: "compliance-service/configuration",
    }
}

pub fn service_config(settings: Settings) -> ServiceConfigBuilder {
    ComplianceGroup::ALL.into_iter().fold(
        ServiceConfig::builder(SERVICE_NAME, settings, &MIGRATOR).running_message(RUNNING_MESSAGE),
        |builder, group| builder.group(group.prefix(), group),
    )
}
