pub mod error;
pub mod providers;
pub mod types;

pub use error::*;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

use crate::MetricsConfig;

/// Destination for per-stage timing measurements. Delivery is best-effort:
/// callers log a failed `record` and move on, never surfacing it to the
/// HTTP client.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn record(&self, metric: Metric) -> Result<(), MetricsError>;
    fn name(&self) -> &str;
}

pub type DynMetricsSink = Arc<dyn MetricsSink>;

/// Build the configured sink once at startup. With no `[metrics]` table
/// timings are logged locally instead of shipped anywhere.
pub async fn create_sink(config: Option<&MetricsConfig>) -> Result<DynMetricsSink, MetricsError> {
    match config {
        Some(metrics) => Ok(Arc::new(
            providers::graphite::GraphiteSink::connect(metrics).await?,
        )),
        None => Ok(Arc::new(providers::null::NullSink::new())),
    }
}
