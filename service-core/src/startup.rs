//! Service host startup and lifecycle.
//!
//! Startup is strictly ordered; each step must succeed before the next runs:
//! settings are already loaded into the [`ServiceConfig`], then the schema is
//! ensured, route groups are registered, the CORS policy is applied and
//! finally the listener is bound.

use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::handlers::{Frontend, GatewayState, gateway, health_check, metrics_endpoint};
use crate::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{REQUEST_ID_HEADER, request_id_middleware},
};
use crate::routing::{ApiRouter, GroupContext};
use crate::store::{Store, ensure_schema};
use axum::{Router, middleware::from_fn, routing::get};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Runs startup steps 2–4 and returns the fully layered router.
pub async fn build_router(config: ServiceConfig) -> Result<Router, AppError> {
    let ServiceConfig {
        service_name,
        running_message,
        settings,
        allowed_origins,
        secret_key,
        schema,
        route_groups,
        metrics,
    } = config;

    let store = Store::open(&settings.database).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to open store");
        e
    })?;
    ensure_schema(&store, schema).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize store schema");
        e
    })?;

    let service_name: Arc<str> = Arc::from(service_name);
    let context = GroupContext {
        service_name: service_name.clone(),
        store,
        secret_key,
    };

    let mut api = ApiRouter::new();
    for (prefix, group) in &route_groups {
        group.mount(&mut api, prefix, &context).map_err(|e| {
            tracing::error!(error = %e, "Route group registration failed");
            AppError::from(e)
        })?;
    }

    check_asset_root(&settings.asset_root).await?;

    let gateway_state = GatewayState {
        api: Arc::new(api),
        frontend: Frontend::new(settings.asset_root.clone(), running_message),
    };

    let mut router = Router::new().route("/health", get(health_check).with_state(service_name));
    if let Some(handle) = metrics {
        router = router.route("/metrics", get(metrics_endpoint).with_state(handle));
    }

    let router = router
        .fallback(gateway)
        .with_state(gateway_state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(allowed_origins.layer());

    Ok(router)
}

/// A missing asset root only means no frontend is deployed; anything else
/// that cannot be read as a directory is a configuration error.
async fn check_asset_root(asset_root: &Path) -> Result<(), AppError> {
    match tokio::fs::metadata(asset_root).await {
        Ok(metadata) if metadata.is_dir() => {
            let unreadable = |e: std::io::Error| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Asset root '{}' is not readable: {}",
                    asset_root.display(),
                    e
                ))
            };
            let mut entries = tokio::fs::read_dir(asset_root).await.map_err(unreadable)?;
            entries.next_entry().await.map_err(unreadable)?;
            tracing::info!(asset_root = %asset_root.display(), "Serving frontend bundle");
            Ok(())
        }
        Ok(_) => Err(AppError::ConfigError(anyhow::anyhow!(
            "Asset root '{}' is not a directory",
            asset_root.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                asset_root = %asset_root.display(),
                "Asset root not found, serving the liveness line for frontend paths"
            );
            Ok(())
        }
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "Asset root '{}' is not readable: {}",
            asset_root.display(),
            e
        ))),
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application: startup steps 2–5.
    pub async fn build(config: ServiceConfig) -> Result<Self, AppError> {
        let host = config.settings.host.clone();
        let port = config.listen_port();
        let service_name = config.service_name.clone();

        let router = build_router(config).await?;

        let address = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, addr = %address, "Failed to bind HTTP listener");
            AppError::ConfigError(anyhow::anyhow!("Failed to bind to {}: {}", address, e))
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = %service_name, port = port, "Listener bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until the process is stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(port = self.port, "Service ready to accept connections");

        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal)
        .await
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
