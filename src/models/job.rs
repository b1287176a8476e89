//! Job model.
//!
//! A job is a unit of work measured in abstract time units. Jobs longer
//! than [`MAX_CHUNK_SIZE`](super::MAX_CHUNK_SIZE) are executed as a
//! sequence of chunks, possibly on different machines.

use serde::{Deserialize, Serialize};

/// Job identifier, unique within one request.
pub type JobId = i64;

/// A job to be scheduled.
///
/// Immutable once submitted. Dependencies name other jobs that must
/// finish completely before any chunk of this job may start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Human-readable name.
    pub name: String,
    /// Total work in time units.
    pub duration: u32,
    /// Jobs that must complete before this one starts.
    #[serde(default)]
    pub dependencies: Vec<JobId>,
    /// Smallest chunk the submitter would accept. Informational only.
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: u32,
}

fn default_min_chunk_size() -> u32 {
    1
}

impl Job {
    /// Creates a job without dependencies.
    pub fn new(id: JobId, name: impl Into<String>, duration: u32) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            dependencies: Vec::new(),
            min_chunk_size: default_min_chunk_size(),
        }
    }

    /// Adds a dependency.
    pub fn with_dependency(mut self, job_id: JobId) -> Self {
        self.dependencies.push(job_id);
        self
    }

    /// Sets the minimum chunk size.
    pub fn with_min_chunk_size(mut self, size: u32) -> Self {
        self.min_chunk_size = size;
        self
    }

    /// Whether the job must be split to respect `max_chunk_size`.
    #[inline]
    pub fn is_oversized(&self, max_chunk_size: u32) -> bool {
        self.duration > max_chunk_size
    }

    /// Number of chunks a balanced split produces (`ceil(duration / max)`).
    pub fn chunks_needed(&self, max_chunk_size: u32) -> u32 {
        let max = max_chunk_size.max(1);
        self.duration.div_ceil(max).max(1)
    }
}
