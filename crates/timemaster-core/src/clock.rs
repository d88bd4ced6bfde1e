//! Time sources for the engines.
//!
//! Every engine operation takes the current instant as a plain millisecond
//! count instead of reading the clock itself, so the controller decides where
//! time comes from. Production code uses [`SystemClock`]; tests drive a
//! [`ManualClock`] forward by hand.

use std::cell::Cell;
use std::rc::Rc;

/// A source of "now" in milliseconds.
pub trait Clock {
    /// Current instant in milliseconds. Must never go backwards.
    fn now_ms(&self) -> u64;
}

/// Wall clock measured in milliseconds since the Unix epoch.
///
/// Epoch-based values survive a process restart, which lets a running
/// stopwatch be persisted and picked up again later.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Hand-driven clock. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        // Monotonic: never move backwards.
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(50);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn manual_clock_is_monotonic() {
        let clock = ManualClock::new(1_000);
        clock.set(10);
        assert_eq!(clock.now_ms(), 1_000);
        clock.set(2_000);
        assert_eq!(clock.now_ms(), 2_000);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
