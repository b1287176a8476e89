//! Scheduling domain models.
//!
//! Jobs are the input, machines form the fixed fleet, and a schedule is
//! the per-machine placement of job chunks.
//!
//! | Type | Meaning |
//! |------|---------|
//! | Job | Unit of work with dependencies |
//! | Machine | One of the identical fleet members |
//! | PlacedChunk | Slice of a job running on one machine |
//! | Schedule | Per-machine chunk timelines |
//! | CapacityViolation | Chunk finishing past machine capacity |

mod job;
mod machine;
mod schedule;

pub use job::{Job, JobId};
pub use machine::{
    Machine, MachineId, MACHINE_CAPACITY, MAX_CHUNK_SIZE, NUM_MACHINES, TOTAL_CAPACITY,
};
pub use schedule::{CapacityViolation, PlacedChunk, Schedule};
