//! Layered settings shared by every service host.
//!
//! Sources, lowest precedence first: per-service defaults, an optional
//! per-service configuration file, then `APP_*` environment variables
//! (`__` separates nested keys, e.g. `APP_DATABASE__PATH`).

mod cors;
mod service;

pub use cors::AllowedOrigins;
pub use service::{ServiceConfig, ServiceConfigBuilder};

use crate::error::AppError;
use config::{Config as Cfg, Environment as EnvSource, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;

/// Minimum accepted length for an externally supplied process secret.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    pub asset_root: PathBuf,
    pub database: DatabaseSettings,
    pub cors: CorsSettings,
    #[serde(default)]
    pub secret_key: Option<Secret<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

/// Built-in values a service ships with; anything here can be overridden.
#[derive(Debug, Clone)]
pub struct ServiceDefaults {
    pub port: u16,
    pub asset_root: &'static str,
    pub database_path: &'static str,
    /// Configuration file base name, resolved by extension (`.yaml`, `.toml`, ...).
    pub config_file: &'static str,
}

impl Settings {
    pub fn load(defaults: &ServiceDefaults) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .set_default("environment", "dev")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", "info")?
            .set_default("asset_root", defaults.asset_root)?
            .set_default("database.path", defaults.database_path)?
            .set_default("database.max_connections", 5_i64)?
            .set_default("cors.allowed_origins", vec!["*"])?
            .add_source(File::with_name(defaults.config_file).required(false))
            .add_source(
                EnvSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn is_prod(&self) -> bool {
        self.environment == Environment::Prod
    }

    /// Rejects settings that are only acceptable behind a trusted perimeter
    /// when the production flag is set.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.max_connections == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "database.max_connections must be greater than 0"
            )));
        }

        let origins = AllowedOrigins::parse(&self.cors.allowed_origins)?;

        if self.is_prod() {
            if origins.is_any() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            match &self.secret_key {
                None => {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "APP_SECRET_KEY is required in production but not set"
                    )));
                }
                Some(secret) if secret.expose_secret().len() < MIN_SECRET_LEN => {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "APP_SECRET_KEY must be at least {} characters",
                        MIN_SECRET_LEN
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// The configured secret, or a random per-process one outside production.
    pub(crate) fn resolve_secret(&self) -> Result<Secret<String>, AppError> {
        match &self.secret_key {
            Some(secret) => Ok(secret.clone()),
            None if self.is_prod() => Err(AppError::ConfigError(anyhow::anyhow!(
                "APP_SECRET_KEY is required in production but not set"
            ))),
            None => {
                tracing::warn!("APP_SECRET_KEY not set, generating an ephemeral process secret");
                let bytes: [u8; 32] = rand::random();
                Ok(Secret::new(hex::encode(bytes)))
            }
        }
    }
}
