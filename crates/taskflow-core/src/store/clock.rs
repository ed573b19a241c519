//! Server-side timestamp source

use std::sync::atomic::{AtomicI64, Ordering};

use crate::util::unix_millis_now;

/// Hands out strictly increasing Unix-millisecond timestamps.
///
/// Two writes in the same millisecond still get distinct, ordered stamps.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: AtomicI64,
}

impl MonotonicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next timestamp, never lower than wall-clock time
    pub fn now(&self) -> i64 {
        let wall = unix_millis_now();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let next = wall.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => previous = actual,
            }
        }
    }
}
