//! Task decomposition into capacity-bounded chunks.
//!
//! A job of duration `d` with maximum chunk size `c` is split into
//! `n = ceil(d / c)` near-equal parts: every part gets `d / n`, and the
//! first `d % n` parts get one extra unit. Parts still larger than `c` are
//! split again the same way.

use crate::models::Job;

/// Splits job durations into balanced chunk sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDecomposer {
    max_chunk_size: u32,
}

impl TaskDecomposer {
    /// Creates a decomposer. A zero limit is treated as one.
    pub fn new(max_chunk_size: u32) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    /// The chunk size limit.
    pub fn max_chunk_size(&self) -> u32 {
        self.max_chunk_size
    }

    /// Chunk sizes for a job, in execution order.
    pub fn split_job(&self, job: &Job) -> Vec<u32> {
        split(job.duration, self.max_chunk_size)
    }
}

/// Balanced split of `duration` into parts no larger than `max_chunk_size`.
///
/// The sizes always sum to `duration`. A duration within the limit
/// (including zero) yields a single part.
pub fn split(duration: u32, max_chunk_size: u32) -> Vec<u32> {
    let max = max_chunk_size.max(1);
    if duration <= max {
        return vec![duration];
    }

    let parts = duration.div_ceil(max);
    let base = duration / parts;
    let remainder = duration % parts;

    let mut sizes = Vec::with_capacity(parts as usize);
    for i in 0..parts {
        let size = if i < remainder { base + 1 } else { base };
        if size > max {
            sizes.extend(split(size, max));
        } else {
            sizes.push(size);
        }
    }
    sizes
}
