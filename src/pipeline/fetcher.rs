use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::PipelineError;
use super::types::FetchedImage;

/// Retrieves source images over HTTP.
///
/// The client carries the per-request timeout; the fetcher itself enforces
/// the body size cap while reading so an oversized origin response is
/// abandoned instead of buffered whole.
pub struct ImageFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl ImageFetcher {
    pub fn new(client: Client, max_body_bytes: u64) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    /// Issue exactly one GET for the image and read the body fully, up to
    /// the configured cap. The origin's Content-Type header is passed
    /// through untouched; format support is decided downstream.
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage, PipelineError> {
        let parsed = Url::parse(url).map_err(|_| PipelineError::InvalidUrl(url.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PipelineError::InvalidUrl(url.to_string()));
        }

        let mut response = self.client.get(parsed).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if let Some(length) = response.content_length()
            && length > self.max_body_bytes
        {
            return Err(PipelineError::BodyTooLarge(self.max_body_bytes));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() as u64 + chunk.len() as u64 > self.max_body_bytes {
                return Err(PipelineError::BodyTooLarge(self.max_body_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(
            url = %url,
            content_type = %content_type,
            bytes = bytes.len(),
            "fetched source image"
        );

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fetcher(max_body_bytes: u64) -> ImageFetcher {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        ImageFetcher::new(client, max_body_bytes)
    }

    #[tokio::test]
    async fn relative_url_is_rejected_before_any_io() {
        let err = fetcher(1024).fetch("/cat.jpg").await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn non_http_scheme_is_rejected() {
        let err = fetcher(1024).fetch("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unreachable_origin_surfaces_a_fetch_error() {
        // Port 1 is never listening on loopback.
        let err = fetcher(1024)
            .fetch("http://127.0.0.1:1/cat.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(_)));
    }
}
