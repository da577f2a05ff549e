use serde::{Deserialize, Serialize};

pub mod metrics;
pub mod pipeline;
pub mod timing;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub metrics: Option<MetricsConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

/// Outbound retrieval limits. Both are hard requirements: an origin that
/// never answers or streams forever must not pin a request worker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_body_bytes() -> u64 {
    20 * 1024 * 1024
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_host")]
    pub host: String,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
    pub api_key: String,
}

fn default_metrics_host() -> String {
    "carbon.hostedgraphite.com".to_string()
}

fn default_metrics_port() -> u16 {
    2003
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            app: AppConfig {
                name: "Shukusho".to_string(),
                log_level: "info".to_string(),
            },
            fetch: FetchConfig::default(),
            metrics: None,
        }
    }
}

use axum::{Router, middleware, routing::post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: pipeline::SharedPipeline,
    pub metrics: metrics::DynMetricsSink,
    pub config: Config,
}

/// Failure while wiring the application together at startup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Metrics(#[from] metrics::MetricsError),
}

pub async fn create_app(config: Config) -> Result<Router, AppError> {
    let pipeline = Arc::new(pipeline::Pipeline::new(&config.fetch)?);

    let sink = metrics::create_sink(config.metrics.as_ref()).await?;
    tracing::info!("Metrics sink: {}", sink.name());

    let app_state = AppState {
        pipeline,
        metrics: sink,
        config,
    };

    Ok(Router::new()
        .route("/resize", post(pipeline::resize_handler))
        .layer(middleware::from_fn(timing::time_elapsed_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    let user_agent = request
                        .headers()
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");

                    tracing::info!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        user_agent = %user_agent,
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state))
}
