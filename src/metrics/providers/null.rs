use async_trait::async_trait;
use tracing::info;

use crate::metrics::{Metric, MetricsError, MetricsSink};

/// Logging-only sink used when no metrics backend is configured.
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSink for NullSink {
    async fn record(&self, metric: Metric) -> Result<(), MetricsError> {
        info!(
            "NULL METRICS SINK - would send: {} = {}",
            metric.name, metric.value
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "Null Metrics Sink (Logging Only)"
    }
}
