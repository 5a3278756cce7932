use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

use crate::errors::AppError;

/// Sliding window counter: the previous window's count decays linearly
/// while the current one fills.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    /// Returns `Ok(())` when admitted, otherwise the seconds until a slot frees up.
    fn allow(&mut self, now: Instant) -> Result<(), u64> {
        self.last_seen = now;
        let mut elapsed = now.duration_since(self.current_window_start);

        if elapsed >= self.window_size {
            // A gap longer than two windows forgets everything.
            self.prev_count = if elapsed >= self.window_size * 2 { 0 } else { self.current_count };
            self.current_count = 0;
            self.current_window_start = now;
            elapsed = Duration::ZERO;
        }

        let weight = elapsed.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64);

        if effective < self.limit as f64 {
            self.current_count += 1;
            Ok(())
        } else {
            let remaining = self.window_size.saturating_sub(elapsed);
            Err(remaining.as_secs().max(1))
        }
    }
}

type Key = String;

/// Per-client limiter for public form submissions.
#[derive(Clone)]
pub struct SubmissionLimiter {
    map: Arc<DashMap<Key, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl SubmissionLimiter {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        }
    }

    pub fn per_hour(limit: u64) -> Self {
        Self::new(limit, Duration::from_secs(60 * 60))
    }

    fn get_window(&self, key: &str, now: Instant) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, now))))
            .clone()
    }

    pub fn check(&self, key: &str) -> Result<(), AppError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), AppError> {
        let window = self.get_window(key, now);
        let mut guard = window.lock();
        guard.allow(now).map_err(|retry_after| {
            tracing::warn!(client = key, retry_after, "Submission rate limit exceeded");
            AppError::RateLimited { retry_after }
        })
    }

    /// Drops keys idle for longer than `ttl`. Returns how many were removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, window| now.duration_since(window.lock().last_seen) < ttl);
        before.saturating_sub(self.map.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }

    /// Periodic eviction loop; spawn it once at startup.
    pub async fn run_eviction(self, every: Duration, ttl: Duration) {
        loop {
            sleep(every).await;
            let removed = self.evict_idle(ttl);
            if removed > 0 {
                tracing::debug!(removed, "Evicted idle rate-limit entries");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_limit_then_rejects() {
        let limiter = SubmissionLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("1.2.3.4", now).is_ok());
        assert!(limiter.check_at("1.2.3.4", now).is_ok());
        match limiter.check_at("1.2.3.4", now) {
            Err(AppError::RateLimited { retry_after }) => assert!(retry_after >= 1 && retry_after <= 60),
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[test]
    fn clients_are_independent() {
        let limiter = SubmissionLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("b", now).is_ok());
        assert!(limiter.check_at("a", now).is_err());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn previous_window_decays() {
        let limiter = SubmissionLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();
        assert!(limiter.check_at("k", start).is_ok());
        assert!(limiter.check_at("k", start).is_ok());

        // Just after rollover the previous count still weighs fully.
        let rollover = start + Duration::from_secs(10);
        assert!(limiter.check_at("k", rollover).is_err());

        // Long idle gap resets the client.
        let later = start + Duration::from_secs(35);
        assert!(limiter.check_at("k", later).is_ok());
    }

    #[test]
    fn eviction_removes_idle_keys() {
        let limiter = SubmissionLimiter::new(5, Duration::from_secs(60));
        limiter.check("idle").unwrap();
        assert_eq!(limiter.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(limiter.evict_idle(Duration::ZERO), 1);
        assert_eq!(limiter.tracked_clients(), 0);
    }
}
