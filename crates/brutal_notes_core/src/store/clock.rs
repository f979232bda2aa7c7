//! Millisecond clocks used to stamp notes.

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock, optionally advancing by `step_ms` after every read.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
    step_ms: i64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self::stepping(start_ms, 0)
    }

    pub fn stepping(start_ms: i64, step_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
            step_ms,
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, SystemClock};

    #[test]
    fn stepping_clock_returns_then_advances() {
        let clock = ManualClock::stepping(100, 10);
        assert_eq!(clock.now_ms(), 100);
        assert_eq!(clock.now_ms(), 110);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
