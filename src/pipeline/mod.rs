// Pipeline module - fetch, decode, resize, encode, package
mod codec;
mod error;
mod fetcher;
mod handlers;
mod package;
mod resize;
mod types;

pub use codec::ImageCodec;
pub use error::PipelineError;
pub use fetcher::ImageFetcher;
pub use handlers::resize_handler;
pub use package::to_data_uri;
pub use resize::{ResizeAlgorithm, resize_image};
pub use types::{FetchedImage, ResizeRequest, ResizeResponse};

use std::sync::Arc;
use std::time::Duration;

use crate::timing::StageTimer;

pub type SharedPipeline = Arc<Pipeline>;

/// Runs the fetch → decode → resize → encode → package sequence for one
/// request. Stages are strictly sequential; the first failure aborts the
/// run with no retries and no partial result.
pub struct Pipeline {
    fetcher: ImageFetcher,
}

impl Pipeline {
    pub fn new(config: &crate::FetchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            fetcher: ImageFetcher::new(client, config.max_body_bytes),
        })
    }

    /// Execute the pipeline for one request, recording a cumulative timer
    /// lap after each completed stage.
    pub async fn execute(
        &self,
        request: &ResizeRequest,
        timer: &mut StageTimer,
    ) -> Result<String, PipelineError> {
        if request.width == 0 && request.height == 0 {
            return Err(PipelineError::ZeroDimensions);
        }

        let fetched = self.fetcher.fetch(&request.image_url).await?;
        timer.lap("fetch");

        // One lookup drives decode and encode, so the output format always
        // matches what the origin served.
        let codec = ImageCodec::from_content_type(&fetched.content_type)?;
        let algorithm = ResizeAlgorithm::from_name(request.algorithm.as_deref());
        let (width, height) = (request.width, request.height);

        // The CPU-heavy stages run off the async workers. The timer moves
        // through the blocking task so its laps stay relative to the
        // request start.
        let task_timer = timer.clone();
        let (finished_timer, outcome) = tokio::task::spawn_blocking(move || {
            let mut task_timer = task_timer;
            let outcome = transform(&fetched.bytes, codec, algorithm, width, height, &mut task_timer);
            (task_timer, outcome)
        })
        .await?;

        *timer = finished_timer;
        outcome
    }
}

/// The CPU-bound back half of the pipeline: decode, resize, re-encode and
/// package. Runs on a blocking thread.
fn transform(
    bytes: &[u8],
    codec: ImageCodec,
    algorithm: ResizeAlgorithm,
    width: u32,
    height: u32,
    timer: &mut StageTimer,
) -> Result<String, PipelineError> {
    let image = codec.decode(bytes)?;
    timer.lap("decode");

    let resized = resize_image(&image, width, height, algorithm);
    timer.lap("resize");

    let encoded = codec.encode(&resized)?;
    timer.lap("encode");

    let data_uri = to_data_uri(&encoded, codec.content_type());
    timer.lap("package");

    Ok(data_uri)
}
