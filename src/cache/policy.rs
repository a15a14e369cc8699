//! Expiration Policy Module
//!
//! Decides whether a stored record is stale.

// == Expiration Policy ==
/// TTL policy applied to store timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpirationPolicy {
    /// Timeout in seconds; 0 disables expiration
    timeout: f64,
}

impl ExpirationPolicy {
    /// Creates a policy with the given timeout in seconds.
    ///
    /// The timeout must be finite and non-negative; callers validate it with
    /// [`crate::config::check_timeout`].
    pub fn new(timeout: f64) -> Self {
        debug_assert!(
            timeout.is_finite() && timeout >= 0.0,
            "invalid expiration timeout {}",
            timeout
        );
        Self { timeout }
    }

    /// Returns the timeout in seconds.
    pub fn timeout(&self) -> f64 {
        self.timeout
    }

    /// Returns true when expiration is turned off.
    pub fn is_disabled(&self) -> bool {
        self.timeout == 0.0
    }

    // == Is Expired ==
    /// Checks a record timestamp against the timeout.
    ///
    /// A missing timestamp (no record, or the lookup failed) counts as not
    /// expired. A record is expired only once strictly more than `timeout`
    /// seconds have elapsed, so an age equal to the timeout is still fresh.
    pub fn is_expired(&self, record_time: Option<f64>, now: f64) -> bool {
        if self.is_disabled() {
            return false;
        }

        match record_time {
            Some(time) => now - time > self.timeout,
            None => false,
        }
    }
}
