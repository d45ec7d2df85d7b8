//! # Feature: Rate Limiting
//!
//! Caps how often a member may toggle roles. Uses a sliding window per user
//! with DashMap for thread-safe concurrent access.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Idle users are swept from the window map
//! - 1.0.0: Initial release with per-user sliding window on role toggles

use dashmap::DashMap;
use serenity::model::id::UserId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Acquisitions between sweeps of idle users.
const SWEEP_EVERY: usize = 256;

pub struct RateLimiter {
    requests: DashMap<UserId, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
    acquisitions: AtomicUsize,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
            acquisitions: AtomicUsize::new(0),
        }
    }

    /// Records a request, or returns how long until the next one is allowed.
    pub fn try_acquire(&self, user_id: UserId) -> Result<(), Duration> {
        // Must run before `entry` below takes a shard lock.
        if self.acquisitions.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep();
        }

        let now = Instant::now();
        let mut entry = self.requests.entry(user_id).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            let oldest = entry.first().copied().unwrap_or(now);
            Err(self.time_window.saturating_sub(now.duration_since(oldest)))
        } else {
            entry.push(now);
            Ok(())
        }
    }

    /// Drops users whose requests have all left the window.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.requests.retain(|_, times| {
            times.retain(|&time| now.duration_since(time) < self.time_window);
            !times.is_empty()
        });
    }

    /// Number of users currently holding window entries.
    pub fn tracked_users(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_rate_limiter_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));

        assert!(limiter.try_acquire(UserId(1)).is_ok());
        assert!(limiter.try_acquire(UserId(1)).is_ok());
        assert!(limiter.try_acquire(UserId(1)).is_ok());
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));

        assert!(limiter.try_acquire(UserId(1)).is_ok());
        assert!(limiter.try_acquire(UserId(1)).is_ok());

        let wait = limiter.try_acquire(UserId(1)).unwrap_err();
        assert!(wait > Duration::ZERO && wait <= Duration::from_secs(10));
    }

    #[test]
    fn test_rate_limiter_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.try_acquire(UserId(1)).is_ok());
        assert!(limiter.try_acquire(UserId(1)).is_err());

        sleep(Duration::from_millis(150));
        assert!(limiter.try_acquire(UserId(1)).is_ok());
    }

    #[test]
    fn test_rate_limiter_per_user() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.try_acquire(UserId(1)).is_ok());
        assert!(limiter.try_acquire(UserId(2)).is_ok());
        assert!(limiter.try_acquire(UserId(1)).is_err());
        assert!(limiter.try_acquire(UserId(2)).is_err());
    }

    #[test]
    fn test_sweep_forgets_idle_users() {
        let limiter = RateLimiter::new(5, Duration::from_millis(50));

        assert!(limiter.try_acquire(UserId(1)).is_ok());
        assert!(limiter.try_acquire(UserId(2)).is_ok());
        assert_eq!(limiter.tracked_users(), 2);

        sleep(Duration::from_millis(80));
        assert!(limiter.try_acquire(UserId(3)).is_ok());
        limiter.sweep();

        assert_eq!(limiter.tracked_users(), 1);
    }

    #[test]
    fn test_acquire_sweeps_periodically() {
        let limiter = RateLimiter::new(SWEEP_EVERY, Duration::from_millis(50));

        assert!(limiter.try_acquire(UserId(1)).is_ok());
        sleep(Duration::from_millis(80));

        // Drive the counter to the next sweep using a single other user.
        for _ in 1..SWEEP_EVERY {
            assert!(limiter.try_acquire(UserId(2)).is_ok());
        }

        assert_eq!(limiter.tracked_users(), 1);
    }
}
