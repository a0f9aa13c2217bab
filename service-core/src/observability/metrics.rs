use crate::error::AppError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the process-wide Prometheus recorder on first use and returns a
/// handle for rendering the scrape output.
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    PROMETHEUS
        .get_or_try_init(|| {
            PrometheusBuilder::new().install_recorder().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Failed to install Prometheus recorder: {}",
                    e
                ))
            })
        })
        .cloned()
}
