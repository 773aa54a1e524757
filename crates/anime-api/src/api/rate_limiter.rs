//! Request pacing for the metadata source.
//!
//! Enforces both per-second and per-minute rate limits. The limiter is shared
//! by every request handler, so its window lives behind an async mutex and
//! callers queue on it in arrival order.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between two requests
    min_interval: Duration,
    /// Maximum requests per minute
    max_per_minute: usize,
    state: Mutex<Window>,
}

#[derive(Debug, Default)]
struct Window {
    last_request: Option<Instant>,
    /// Request timestamps in the last minute, oldest first
    recent: VecDeque<Instant>,
}

impl Window {
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.recent.front() {
            if now.duration_since(oldest) >= WINDOW {
                self.recent.pop_front();
            } else {
                break;
            }
        }
    }
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// A non-positive or non-finite per-second rate disables spacing. A rate
    /// too small to express as a spacing is capped at one per `WINDOW`.
    pub fn new(max_per_second: f64, max_per_minute: u32) -> Self {
        let min_interval = if max_per_second > 0.0 && max_per_second.is_finite() {
            Duration::try_from_secs_f64(1.0 / max_per_second)
                .map_or(WINDOW, |interval| interval.min(WINDOW))
        } else {
            Duration::ZERO
        };

        Self {
            min_interval,
            max_per_minute: max_per_minute.max(1) as usize,
            state: Mutex::new(Window::default()),
        }
    }

    /// Wait until a request can be made, respecting both rate limits
    pub async fn acquire(&self) {
        // Holding the lock across the sleep serializes waiters
        let mut window = self.state.lock().await;

        let now = Instant::now();
        window.prune(now);

        if window.recent.len() >= self.max_per_minute {
            if let Some(&oldest) = window.recent.front() {
                let wait_time = WINDOW.saturating_sub(now.duration_since(oldest));
                if !wait_time.is_zero() {
                    tracing::debug!(
                        wait_ms = wait_time.as_millis(),
                        "Rate limit: waiting for per-minute limit"
                    );
                    sleep(wait_time).await;
                }
            }
        }

        if let Some(last) = window.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting for per-second limit"
                );
                sleep(wait_time).await;
            }
        }

        let request_time = Instant::now();
        window.prune(request_time);
        window.last_request = Some(request_time);
        window.recent.push_back(request_time);
    }

    /// Get the current number of requests in the last minute
    pub async fn current_minute_count(&self) -> usize {
        let mut window = self.state.lock().await;
        window.prune(Instant::now());
        window.recent.len()
    }
}
