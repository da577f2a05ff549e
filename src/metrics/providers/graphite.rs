use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::MetricsConfig;
use crate::metrics::{Metric, MetricsError, MetricsSink};

/// Ships metrics to a hosted-graphite carbon endpoint over UDP in the
/// plaintext line protocol, one datagram per metric.
///
/// The socket is opened once at startup and shared by every request
/// worker; sends on a connected UdpSocket need no coordination. Delivery
/// is unacknowledged and best-effort by design.
#[derive(Debug)]
pub struct GraphiteSink {
    socket: UdpSocket,
    api_key: String,
    target: String,
}

impl GraphiteSink {
    pub async fn connect(config: &MetricsConfig) -> Result<Self, MetricsError> {
        if config.api_key.is_empty() {
            return Err(MetricsError::ConfigError(
                "api_key must not be empty".to_string(),
            ));
        }

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let target = format!("{}:{}", config.host, config.port);
        socket.connect(&target).await?;

        Ok(Self {
            socket,
            api_key: config.api_key.clone(),
            target,
        })
    }
}

/// Render one metric as a graphite plaintext line:
/// `<api_key>.<name> <value> <unix_timestamp>\n`.
fn format_line(api_key: &str, metric: &Metric) -> String {
    let unix = metric
        .timestamp
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}.{} {} {}\n", api_key, metric.name, metric.value, unix)
}

#[async_trait]
impl MetricsSink for GraphiteSink {
    async fn record(&self, metric: Metric) -> Result<(), MetricsError> {
        let payload = format_line(&self.api_key, &metric);
        debug!("sending metric to {}: {}", self.target, payload.trim_end());
        self.socket.send(payload.as_bytes()).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Hosted Graphite (UDP)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn line_format_matches_the_carbon_plaintext_protocol() {
        let metric = Metric::new("fetch", 1_234_567)
            .with_timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(
            format_line("apikey", &metric),
            "apikey.fetch 1234567 1700000000\n"
        );
    }

    #[tokio::test]
    async fn empty_api_key_is_a_config_error() {
        let config = MetricsConfig {
            host: "127.0.0.1".to_string(),
            port: 2003,
            api_key: String::new(),
        };
        let err = GraphiteSink::connect(&config).await.unwrap_err();
        assert!(matches!(err, MetricsError::ConfigError(_)));
    }

    #[tokio::test]
    async fn record_delivers_one_datagram_per_metric() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = receiver.local_addr().unwrap();

        let config = MetricsConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            api_key: "testkey".to_string(),
        };
        let sink = GraphiteSink::connect(&config).await.unwrap();
        sink.record(Metric::new("decode", 42)).await.unwrap();

        let mut buffer = [0u8; 256];
        let received = receiver.recv(&mut buffer).await.unwrap();
        let line = std::str::from_utf8(&buffer[..received]).unwrap();
        assert!(line.starts_with("testkey.decode 42 "));
        assert!(line.ends_with('\n'));
    }
}
