use super::{AllowedOrigins, Settings};
use crate::error::AppError;
use crate::routing::RouteGroup;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::Secret;
use sqlx::migrate::Migrator;
use std::sync::Arc;

/// Everything a service host needs to start, fixed for the process lifetime.
pub struct ServiceConfig {
    /// Reported by `/health`, e.g. "FinovaBank AI Service".
    pub service_name: String,
    /// Plain-text body served when no frontend bundle is deployed.
    pub running_message: String,
    pub settings: Settings,
    pub allowed_origins: AllowedOrigins,
    pub secret_key: Secret<String>,
    pub schema: &'static Migrator,
    /// Registered in order; prefixes must not overlap.
    pub route_groups: Vec<(String, Arc<dyn RouteGroup>)>,
    pub metrics: Option<PrometheusHandle>,
}

impl ServiceConfig {
    pub fn builder(
        service_name: impl Into<String>,
        settings: Settings,
        schema: &'static Migrator,
    ) -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            service_name: service_name.into(),
            running_message: None,
            settings,
            schema,
            route_groups: Vec::new(),
            metrics: None,
        }
    }

    pub fn listen_port(&self) -> u16 {
        self.settings.port
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service_name", &self.service_name)
            .field("settings", &self.settings)
            .field(
                "route_groups",
                &self
                    .route_groups
                    .iter()
                    .map(|(prefix, group)| (prefix.as_str(), group.name()))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

pub struct ServiceConfigBuilder {
    service_name: String,
    running_message: Option<String>,
    settings: Settings,
    schema: &'static Migrator,
    route_groups: Vec<(String, Arc<dyn RouteGroup>)>,
    metrics: Option<PrometheusHandle>,
}

impl ServiceConfigBuilder {
    pub fn running_message(mut self, message: impl Into<String>) -> Self {
        self.running_message = Some(message.into());
        self
    }

    pub fn group(mut self, prefix: impl Into<String>, group: impl RouteGroup + 'static) -> Self {
        self.route_groups.push((prefix.into(), Arc::new(group)));
        self
    }

    pub fn metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Validates the settings and resolves the process secret. Prefix
    /// collisions are only detected when the groups are registered at startup.
    pub fn build(self) -> Result<ServiceConfig, AppError> {
        self.settings.validate()?;
        let allowed_origins = AllowedOrigins::parse(&self.settings.cors.allowed_origins)?;
        let secret_key = self.settings.resolve_secret()?;

        let running_message = self
            .running_message
            .unwrap_or_else(|| format!("{} is running", self.service_name));

        Ok(ServiceConfig {
            service_name: self.service_name,
            running_message,
            settings: self.settings,
            allowed_origins,
            secret_key,
            schema: self.schema,
            route_groups: self.route_groups,
            metrics: self.metrics,
        })
    }
}
