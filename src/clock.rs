//! The `Clock` collaborator (spec.md §1): monotonic seconds since epoch, as
//! reported by the host ledger's block time — never wall-clock time, since
//! every predicate in this crate must agree with what the host's own
//! transaction execution observed.

use std::sync::atomic::{AtomicU64, Ordering};

pub trait Clock {
    fn now(&self) -> u64;
}

/// Reference `Clock` for tests and simulations: an explicit, settable
/// counter rather than `SystemTime`, so test scenarios can place `now` at
/// exact phase boundaries (spec.md §8 "boundary behaviors").
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn new(now: u64) -> Self {
        Self(AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
