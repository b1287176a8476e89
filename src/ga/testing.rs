//! Test helpers for cultural runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Seeded random source that raises a cancel flag once it has served
/// `limit` draws, stopping a run at a reproducible point.
pub(crate) struct CancelAfter {
    inner: SmallRng,
    draws: usize,
    limit: usize,
    flag: Arc<AtomicBool>,
}

impl CancelAfter {
    pub(crate) fn new(seed: u64, limit: usize, flag: Arc<AtomicBool>) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
            draws: 0,
            limit,
            flag,
        }
    }

    fn tick(&mut self) {
        self.draws += 1;
        if self.draws >= self.limit {
            self.flag.store(true, Ordering::Relaxed);
        }
    }
}

impl RngCore for CancelAfter {
    fn next_u32(&mut self) -> u32 {
        self.tick();
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.tick();
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.tick();
        self.inner.fill_bytes(dst)
    }
}
