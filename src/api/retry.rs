use std::time::Duration;

/// Statuses worth another attempt: rate limiting and gateway/server hiccups.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_BASE: f64 = 1.5;

/// Longest wait between two attempts, however large the attempt number.
pub const MAX_BACKOFF: Duration = Duration::from_secs(300);

pub fn is_transient(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: f64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: f64) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// Wait before the retry that follows failed attempt number `attempt` (1-based):
    /// `backoff_base ^ attempt` seconds, capped at [`MAX_BACKOFF`].
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_base.powi(exponent);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_set() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_transient(status), "{} should be transient", status);
        }
        for status in [200, 400, 401, 403, 404, 422, 501, 505] {
            assert!(!is_transient(status), "{} should not be transient", status);
        }
    }

    #[test]
    fn test_exponential_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2250));
        assert_eq!(policy.delay_for(3), Duration::from_millis(3375));
    }

    #[test]
    fn test_retry_cap() {
        let policy = RetryPolicy::new(2, 2.0);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_late_attempts_saturate() {
        let policy = RetryPolicy::new(1_000, 1.5);
        assert_eq!(policy.delay_for(20), MAX_BACKOFF);
        assert_eq!(policy.delay_for(2_000), MAX_BACKOFF);
        assert_eq!(policy.delay_for(u32::MAX), MAX_BACKOFF);
        assert_eq!(RetryPolicy::new(5, f64::INFINITY).delay_for(1), MAX_BACKOFF);
        assert!(policy.delay_for(10) < MAX_BACKOFF);
    }

    #[test]
    fn test_degenerate_base_never_panics() {
        assert_eq!(RetryPolicy::new(1, -2.0).delay_for(1), Duration::ZERO);
        assert_eq!(RetryPolicy::new(1, f64::NAN).delay_for(1), Duration::ZERO);
        assert_eq!(RetryPolicy::new(1, 0.0).delay_for(3), Duration::ZERO);
    }
}
