//! Ledger clock
//!
//! All time reads in the engine go through `Clock::now`, so tests can swap in
//! a `ManualClock` and move time forward explicitly.

use cosign_core::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of ledger time
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in whole seconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = chrono::Utc::now().timestamp();
        Timestamp::from_secs(u64::try_from(secs).unwrap_or(0))
    }
}

/// Controllable clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start.as_secs())),
        }
    }

    /// Move time forward by `secs`
    pub fn advance(&self, secs: u64) {
        // Infallible: the closure always returns Some
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(secs))
            });
    }

    /// Jump to an absolute time
    pub fn set(&self, at: Timestamp) {
        self.now.store(at.as_secs(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.now.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(Timestamp::from_secs(1_000));
        assert_eq!(clock.now().as_secs(), 1_000);

        clock.advance(300);
        assert_eq!(clock.now().as_secs(), 1_300);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(Timestamp::EPOCH);
        let handle = clock.clone();

        handle.advance(42);
        assert_eq!(clock.now().as_secs(), 42);

        handle.set(Timestamp::from_secs(7));
        assert_eq!(clock.now().as_secs(), 7);
    }

    #[test]
    fn test_concurrent_advances_all_land() {
        let clock = ManualClock::new(Timestamp::EPOCH);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = clock.clone();
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        clock.advance(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(clock.now().as_secs(), 8_000);
    }

    #[test]
    fn test_advance_saturates() {
        let clock = ManualClock::new(Timestamp::from_secs(u64::MAX - 1));
        clock.advance(10);
        assert_eq!(clock.now().as_secs(), u64::MAX);
    }

    #[test]
    fn test_shared_clock_object() {
        let manual = ManualClock::new(Timestamp::from_secs(5));
        let shared: Arc<dyn Clock> = Arc::new(manual.clone());

        manual.advance(10);
        assert_eq!(shared.now().as_secs(), 15);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }
}
