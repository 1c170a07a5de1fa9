use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Fixed-window request limiter for the public surface. One window per
/// process; the quiz API has no per-client identity to key on.
#[derive(Clone, Debug)]
pub struct RpsLimiter {
    max_per_second: u32,
    served: Arc<AtomicU32>,
    window_start: Arc<Mutex<Instant>>,
}

impl RpsLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            max_per_second: max_per_second.max(1),
            served: Arc::new(AtomicU32::new(0)),
            window_start: Arc::new(Mutex::new(Instant::now())),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut start = self.window_start.lock().expect("rate limiter mutex poisoned");
        if start.elapsed() >= Duration::from_secs(1) {
            *start = Instant::now();
            self.served.store(0, Ordering::Relaxed);
        }
        self.served.fetch_add(1, Ordering::Relaxed) < self.max_per_second
    }
}

pub async fn rps_middleware(
    State(limiter): State<RpsLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_acquire() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}

pub fn new_rps_state(rps: u32) -> RpsLimiter {
    RpsLimiter::new(rps)
}
