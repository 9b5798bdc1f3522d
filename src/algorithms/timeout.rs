use std::cell::Cell;
use std::time::{Duration, Instant};

/// Cooperative cancellation checked by the diff algorithms between iterations.
/// Once `is_valid` returns `false` it keeps returning `false`.
pub trait Timeout {
    fn is_valid(&self) -> bool;
}

/// Never expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteTimeout;

impl Timeout for InfiniteTimeout {
    fn is_valid(&self) -> bool {
        true
    }
}

/// Expires once the monotonic clock passes a deadline fixed at construction.
/// Expiry is sticky: after the first failed check every later check fails too.
#[derive(Debug, Clone)]
pub struct DateTimeout {
    deadline: Instant,
    expired: Cell<bool>,
}

impl DateTimeout {
    pub fn new(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
            expired: Cell::new(false),
        }
    }
}

impl Timeout for DateTimeout {
    fn is_valid(&self) -> bool {
        if self.expired.get() {
            return false;
        }
        if Instant::now() >= self.deadline {
            tracing::debug!("diff computation budget exhausted");
            self.expired.set(true);
            return false;
        }
        true
    }
}

/// Builds the timeout for a millisecond budget where `0` means "no limit".
pub fn timeout_for_budget(max_computation_time_ms: u64) -> Box<dyn Timeout> {
    if max_computation_time_ms == 0 {
        Box::new(InfiniteTimeout)
    } else {
        Box::new(DateTimeout::new(Duration::from_millis(max_computation_time_ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_timeout_is_always_valid() {
        assert!(InfiniteTimeout.is_valid());
        assert!(timeout_for_budget(0).is_valid());
    }

    #[test]
    fn expired_deadline_stays_expired() {
        let timeout = DateTimeout::new(Duration::ZERO);
        assert!(!timeout.is_valid());
        assert!(!timeout.is_valid());
    }

    #[test]
    fn generous_deadline_is_valid() {
        let timeout = DateTimeout::new(Duration::from_secs(3600));
        assert!(timeout.is_valid());
    }
}
