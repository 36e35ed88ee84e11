use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// At most `requests` iterations per `per`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub requests: u32,
    pub per: Duration,
}

impl RateLimit {
    pub fn new(requests: u32, per: Duration) -> Self {
        Self { requests, per }
    }

    /// One iteration every `delay`; a zero delay disables throttling.
    pub fn fixed_delay(delay: Duration) -> Self {
        Self::new(1, delay)
    }

    pub fn unlimited() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        if self.requests == 0 {
            return self.per;
        }
        self.per / self.requests
    }
}

/// Spaces out iterations of a sequential loop according to a [`RateLimit`].
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    next: Option<Instant>,
}

impl Throttle {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            interval: limit.interval(),
            next: None,
        }
    }

    /// Wait for the next slot. The first call returns immediately.
    pub async fn ready(&mut self) {
        if let Some(next) = self.next {
            sleep_until(next).await;
        }
        if !self.interval.is_zero() {
            self.next = Some(Instant::now() + self.interval);
        }
    }
}
