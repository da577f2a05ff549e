use std::time::{Duration, Instant};

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

pub const TIME_ELAPSED_HEADER: &str = "x-time-elapsed";

/// Measures the whole request and attaches the elapsed wall-clock time as
/// an `X-Time-Elapsed` header on every response, success or failure.
/// Purely observational: status, body and the other headers pass through
/// untouched.
pub async fn time_elapsed_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(request).await;
    let elapsed = format_duration(started.elapsed());
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        response.headers_mut().insert(TIME_ELAPSED_HEADER, value);
    }
    response
}

/// Render a duration for the timing header. Header values must be visible
/// ASCII, which rules out the standard library's Debug form ("123µs").
pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() > 0 {
        format!("{:.3}s", duration.as_secs_f64())
    } else {
        format!("{:.3}ms", duration.as_secs_f64() * 1000.0)
    }
}

/// Cumulative per-stage timings for one request.
///
/// Each lap records time elapsed since the request started, not time spent
/// in that stage alone, so the emitted series is cumulative and
/// non-decreasing in stage order.
#[derive(Debug, Clone)]
pub struct StageTimer {
    started: Instant,
    laps: Vec<StageLap>,
}

#[derive(Debug, Clone)]
pub struct StageLap {
    pub stage: &'static str,
    pub elapsed: Duration,
}

impl StageTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            laps: Vec::new(),
        }
    }

    pub fn lap(&mut self, stage: &'static str) {
        self.laps.push(StageLap {
            stage,
            elapsed: self.started.elapsed(),
        });
    }

    pub fn laps(&self) -> &[StageLap] {
        &self.laps
    }

    pub fn into_laps(self) -> Vec<StageLap> {
        self.laps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laps_are_cumulative_and_non_decreasing() {
        let mut timer = StageTimer::start();
        timer.lap("fetch");
        std::thread::sleep(Duration::from_millis(2));
        timer.lap("decode");
        timer.lap("resize");

        let laps = timer.laps();
        assert_eq!(laps.len(), 3);
        assert_eq!(laps[0].stage, "fetch");
        assert!(laps[1].elapsed >= laps[0].elapsed + Duration::from_millis(2));
        assert!(laps[2].elapsed >= laps[1].elapsed);
    }

    #[test]
    fn durations_render_as_ascii() {
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.500ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.500s");
        assert!(format_duration(Duration::from_nanos(42)).is_ascii());
    }

    #[test]
    fn a_cloned_timer_keeps_the_original_start_instant() {
        let mut timer = StageTimer::start();
        std::thread::sleep(Duration::from_millis(2));
        let mut moved = timer.clone();
        moved.lap("decode");
        timer = moved;
        assert!(timer.laps()[0].elapsed >= Duration::from_millis(2));
    }
}
