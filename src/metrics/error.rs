use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
