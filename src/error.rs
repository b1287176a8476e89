//! Error types for schedule construction.
//!
//! Fatal conditions abort a solve and surface as a failure result.
//! Capacity overruns of individual chunks are not errors: they are
//! recorded as [`CapacityViolation`](crate::models::CapacityViolation)s
//! and returned alongside a successful schedule.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::JobId;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, SolveError>;

/// Errors that abort a solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Job '{name}' ({duration} units) exceeds the {capacity}-unit machine capacity limit")]
    CapacityExceeded {
        job_id: JobId,
        name: String,
        duration: u32,
        capacity: u32,
    },
    #[error("Cyclic dependencies detected involving job {job_id}")]
    CyclicDependency { job_id: JobId },
    #[error("No valid solution found")]
    Infeasible,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Solve cancelled before a feasible schedule was found")]
    Cancelled,
}

/// Serializable discriminant of [`SolveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CapacityExceeded,
    CyclicDependency,
    Infeasible,
    InvalidInput,
    Cancelled,
}

impl SolveError {
    /// The error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolveError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            SolveError::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            SolveError::Infeasible => ErrorKind::Infeasible,
            SolveError::InvalidInput(_) => ErrorKind::InvalidInput,
            SolveError::Cancelled => ErrorKind::Cancelled,
        }
    }
}
