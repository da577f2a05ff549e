use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::AppState;
use crate::metrics::Metric;
use crate::timing::StageTimer;

use super::error::PipelineError;
use super::types::{ResizeRequest, ResizeResponse};

/// `POST /resize`: run the full pipeline for one request and reply with
/// the resized image packaged as a data URI.
#[axum::debug_handler]
pub async fn resize_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<ResizeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return PipelineError::MalformedRequest(rejection.body_text()).into_response();
        }
    };

    debug!(
        url = %request.image_url,
        width = request.width,
        height = request.height,
        algorithm = ?request.algorithm,
        "resize request"
    );

    let mut timer = StageTimer::start();
    let result = app_state.pipeline.execute(&request, &mut timer).await;

    // Stage timings go to the sink off the response path; the caller never
    // waits on the metrics transport and never sees its failures.
    flush_stage_timings(&app_state, timer);

    match result {
        Ok(data_uri) => {
            match serde_json::to_string(&ResizeResponse { resized: data_uri }) {
                Ok(body) => {
                    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
                }
                Err(e) => PipelineError::ResponseSerialization(e).into_response(),
            }
        }
        Err(err) => err.into_response(),
    }
}

fn flush_stage_timings(app_state: &AppState, timer: StageTimer) {
    let sink = app_state.metrics.clone();
    tokio::spawn(async move {
        for lap in timer.into_laps() {
            let metric = Metric::new(lap.stage, lap.elapsed.as_nanos());
            if let Err(e) = sink.record(metric).await {
                warn!("failed to record {} timing: {}", lap.stage, e);
            }
        }
    });
}
