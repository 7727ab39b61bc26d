//! Identifier generation
//!
//! Ids stay wall-clock milliseconds like the ones already in the mirrored
//! files, but never repeat: each new id is at least one above the previous.

use std::sync::atomic::{AtomicI64, Ordering};
use crate::utils::helpers::now_millis;

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        self.next_after(now_millis())
    }

    /// Make sure future ids are greater than `id`
    pub fn observe(&self, id: i64) {
        self.last.fetch_max(id, Ordering::AcqRel);
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(current, candidate, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
