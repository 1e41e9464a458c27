//! Backoff schedule for rate-limited calls.
//!
//! The server signals rate limiting with HTTP 429; the client resends after
//! an exponentially growing delay. The schedule is 500ms doubling per retry,
//! capped at 8s, with 50-100% jitter so concurrent callers don't resend in
//! lockstep.

use std::time::Duration;

use rand::Rng;

const INITIAL_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(8);

/// Returns the jittered delay before the given retry (1-indexed).
pub(crate) fn backoff_delay(retry: u32) -> Duration {
    let base = base_delay(retry);
    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
    base.mul_f64(jitter_factor)
}

/// The un-jittered delay: `500ms * 2^(retry - 1)`, capped at 8s.
fn base_delay(retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(31);
    let multiplier = 2u32.saturating_pow(exponent);
    INITIAL_DELAY.saturating_mul(multiplier).min(MAX_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_delay_doubles() {
        assert_eq!(base_delay(1), Duration::from_millis(500));
        assert_eq!(base_delay(2), Duration::from_secs(1));
        assert_eq!(base_delay(3), Duration::from_secs(2));
        assert_eq!(base_delay(4), Duration::from_secs(4));
    }

    #[test]
    fn test_base_delay_capped() {
        assert_eq!(base_delay(5), Duration::from_secs(8));
        assert_eq!(base_delay(30), Duration::from_secs(8));
        assert_eq!(base_delay(u32::MAX), Duration::from_secs(8));
    }

    #[test]
    fn test_jitter_stays_within_half_to_full() {
        for retry in 1..=6 {
            let base = base_delay(retry);
            for _ in 0..50 {
                let delay = backoff_delay(retry);
                assert!(delay >= base.mul_f64(0.5));
                assert!(delay <= base);
            }
        }
    }
}
