//! Schedule (solution) model.
//!
//! A schedule holds, for every machine, the chunks placed on it in order
//! of start time. Capacity overruns found while building it are kept
//! separately as [`CapacityViolation`]s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{JobId, MachineId};

/// A chunk of a job placed on a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedChunk {
    /// Owning job.
    pub job_id: JobId,
    /// Machine executing the chunk.
    pub machine: MachineId,
    /// Start time.
    pub start: u32,
    /// End time (`start + size`).
    pub end: u32,
    /// Work units in this chunk.
    pub size: u32,
    /// Position among the job's chunks (1-based).
    pub index: usize,
    /// Number of chunks the job was split into.
    pub total: usize,
}

/// A chunk that finished past its machine's capacity.
///
/// Recorded and penalized, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityViolation {
    pub job_id: JobId,
    pub job_name: String,
    pub machine: MachineId,
    pub chunk_size: u32,
    pub start: u32,
    pub end: u32,
    /// `end - capacity`.
    pub exceeded_by: u32,
}

/// A complete schedule over a fixed number of machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Per-machine timelines, each ordered by start time.
    pub machines: Vec<Vec<PlacedChunk>>,
}

impl Schedule {
    /// Creates an empty schedule for `num_machines` machines.
    pub fn with_machines(num_machines: usize) -> Self {
        Self {
            machines: vec![Vec::new(); num_machines],
        }
    }

    /// Appends a chunk to its machine's timeline.
    ///
    /// Callers place chunks in non-decreasing start order per machine.
    pub fn push(&mut self, chunk: PlacedChunk) {
        if chunk.machine >= self.machines.len() {
            self.machines.resize(chunk.machine + 1, Vec::new());
        }
        self.machines[chunk.machine].push(chunk);
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Timeline of one machine.
    pub fn timeline(&self, machine: MachineId) -> &[PlacedChunk] {
        self.machines.get(machine).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All placed chunks, machine by machine.
    pub fn chunks(&self) -> impl Iterator<Item = &PlacedChunk> {
        self.machines.iter().flatten()
    }

    /// Number of placed chunks.
    pub fn chunk_count(&self) -> usize {
        self.machines.iter().map(Vec::len).sum()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.chunk_count() == 0
    }

    /// Latest end time across all machines.
    pub fn makespan(&self) -> u32 {
        self.chunks().map(|c| c.end).max().unwrap_or(0)
    }

    /// Work units placed on a machine.
    pub fn machine_work(&self, machine: MachineId) -> u32 {
        self.timeline(machine).iter().map(|c| c.size).sum()
    }

    /// Work units placed on all machines.
    pub fn total_work(&self) -> u32 {
        self.chunks().map(|c| c.size).sum()
    }

    /// Chunks of a job ordered by their index.
    pub fn chunks_for_job(&self, job_id: JobId) -> Vec<&PlacedChunk> {
        let mut chunks: Vec<&PlacedChunk> =
            self.chunks().filter(|c| c.job_id == job_id).collect();
        chunks.sort_by_key(|c| c.index);
        chunks
    }

    /// Completion time of a job (latest end of its chunks).
    pub fn job_completion_time(&self, job_id: JobId) -> Option<u32> {
        self.chunks()
            .filter(|c| c.job_id == job_id)
            .map(|c| c.end)
            .max()
    }

    /// Number of chunks placed per job.
    pub fn chunk_counts(&self) -> BTreeMap<JobId, usize> {
        let mut counts = BTreeMap::new();
        for chunk in self.chunks() {
            *counts.entry(chunk.job_id).or_insert(0) += 1;
        }
        counts
    }
}
