use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Fixed-window counter for one identifier.
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

/// Result of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether this request may proceed.
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the window resets; the client-facing retry hint.
    pub retry_after: Duration,
}

/// Fixed-window request counter keyed by an identifier string (typically
/// `action:client-ip`).
///
/// Entries are replaced wholesale when their window expires: lazily on the
/// next check for that identifier, and by [`RateLimiter::sweep`] for
/// identifiers that stopped making requests and would otherwise sit in the
/// map forever.
#[derive(Default)]
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    /// Create an empty limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `identifier` under a fixed window.
    pub fn check(&self, identifier: &str, max_requests: u32, window: Duration) -> RateLimitDecision {
        self.check_at(identifier, max_requests, window, Instant::now())
    }

    /// Drop every entry whose window has already expired.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.reset_at > now);
    }

    /// Number of tracked identifiers.
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    fn check_at(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
        now: Instant,
    ) -> RateLimitDecision {
        let mut entry = self
            .entries
            .entry(identifier.to_owned())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + window,
            });

        // A stale window is replaced wholesale, never partially updated.
        if now >= entry.reset_at {
            *entry = RateLimitEntry {
                count: 0,
                reset_at: now + window,
            };
        }

        if entry.count >= max_requests {
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                retry_after: entry.reset_at.saturating_duration_since(now),
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: max_requests - entry.count,
            retry_after: entry.reset_at.saturating_duration_since(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn first_request_is_allowed_with_full_window() {
        let limiter = RateLimiter::new();
        let decision = limiter.check("login:1.2.3.4", 5, WINDOW);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
    }

    #[test]
    fn sixth_request_in_the_window_is_denied() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at("login:ip", 5, WINDOW, start).allowed);
        }
        let denied = limiter.check_at("login:ip", 5, WINDOW, start + Duration::from_secs(1));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after, Duration::from_secs(59));
    }

    #[test]
    fn window_expiry_resets_the_counter_to_one() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.check_at("upload:ip", 5, WINDOW, start);
        }
        assert!(!limiter.check_at("upload:ip", 5, WINDOW, start).allowed);

        let after = limiter.check_at("upload:ip", 5, WINDOW, start + WINDOW);
        assert!(after.allowed);
        assert_eq!(after.remaining, 4);
    }

    #[test]
    fn identifiers_are_independent() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.check_at("api:alpha", 5, WINDOW, start);
        }
        assert!(!limiter.check_at("api:alpha", 5, WINDOW, start).allowed);
        assert!(limiter.check_at("api:beta", 5, WINDOW, start).allowed);
    }

    #[test]
    fn sweep_evicts_only_expired_windows() {
        let limiter = RateLimiter::new();
        limiter.check_at("old:ip", 5, Duration::ZERO, Instant::now() - Duration::from_secs(1));
        limiter.check("fresh:ip", 5, WINDOW);
        assert_eq!(limiter.tracked(), 2);

        limiter.sweep();
        assert_eq!(limiter.tracked(), 1);
    }
}
