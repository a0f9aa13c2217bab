//! AI Service entry point.

use ai_service::{defaults, service_config, SERVICE_NAME};
use service_core::config::Settings;
use service_core::error::AppError;
use service_core::observability::{init_metrics, init_tracing, shutdown_tracing};
use service_core::startup::{shutdown_signal, Application};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration
    let settings = Settings::load(&defaults()).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize tracing
    init_tracing(
        SERVICE_NAME,
        &settings.log_level,
        settings.otlp_endpoint.as_deref(),
    )?;
    let export_spans = settings.otlp_endpoint.is_some();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?settings.environment,
        port = settings.port,
        asset_root = %settings.asset_root.display(),
        database = %settings.database.path.display(),
        "Starting ai-service"
    );

    let metrics = init_metrics()?;
    let config = service_config(settings).metrics(metrics).build()?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to build application");
        e
    })?;

    app.run_with_shutdown(shutdown_signal()).await.map_err(|e| {
        tracing::error!(error = %e, "Application error");
        e
    })?;

    if export_spans {
        shutdown_tracing();
    }
    tracing::info!("Service shutdown complete");
    Ok(())
}
