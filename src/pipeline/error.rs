use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("width and height cannot both be zero")]
    ZeroDimensions,

    #[error("not a valid absolute http(s) URL: {0}")]
    InvalidUrl(String),

    #[error("error downloading image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("image body exceeds the configured limit of {0} bytes")]
    BodyTooLarge(u64),

    #[error("unknown content type {0}")]
    UnsupportedFormat(String),

    #[error("error decoding image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("error encoding resized image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("error encoding response: {0}")]
    ResponseSerialization(#[from] serde_json::Error),

    #[error("image processing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Pipeline stage the failure belongs to, for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::MalformedRequest(_)
            | PipelineError::ZeroDimensions
            | PipelineError::InvalidUrl(_) => "request",
            PipelineError::Fetch(_) | PipelineError::BodyTooLarge(_) => "fetch",
            PipelineError::UnsupportedFormat(_) | PipelineError::Decode(_) => "decode",
            PipelineError::Encode(_) => "encode",
            PipelineError::Join(_) => "transform",
            PipelineError::ResponseSerialization(_) => "respond",
        }
    }

    /// Bad input is the caller's fault; an unreachable or broken origin is
    /// an upstream failure and maps to the gateway statuses instead.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::MalformedRequest(_)
            | PipelineError::ZeroDimensions
            | PipelineError::InvalidUrl(_)
            | PipelineError::UnsupportedFormat(_)
            | PipelineError::Decode(_)
            | PipelineError::Encode(_) => StatusCode::BAD_REQUEST,
            PipelineError::Fetch(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            PipelineError::Fetch(_) | PipelineError::BodyTooLarge(_) => StatusCode::BAD_GATEWAY,
            PipelineError::ResponseSerialization(_) | PipelineError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(stage = self.stage(), status = %status, "{}", self);
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(
            PipelineError::ZeroDimensions.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PipelineError::MalformedRequest("oops".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PipelineError::UnsupportedFormat("image/webp".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn oversized_body_maps_to_bad_gateway() {
        assert_eq!(
            PipelineError::BodyTooLarge(16).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn unsupported_format_names_the_type() {
        let message = PipelineError::UnsupportedFormat("image/webp".to_string()).to_string();
        assert!(message.contains("image/webp"));
    }
}
