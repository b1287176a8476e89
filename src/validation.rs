//! Input validation for job lists.
//!
//! Checks structural integrity of the submitted jobs before scheduling.
//! Detects:
//! - Empty job lists
//! - Duplicate job IDs
//! - Jobs without work (zero duration)
//! - Jobs that cannot fit on a single machine
//!
//! Dependency cycles are reported by [`crate::graph`] when ordering.
//! Unknown dependency ids are not errors.

use std::collections::HashSet;

use crate::error::SolveError;
use crate::models::Job;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No jobs were submitted.
    NoJobs,
    /// Two jobs share the same ID.
    DuplicateId,
    /// A job has zero duration.
    ZeroDuration,
    /// A job's duration alone exceeds machine capacity.
    CapacityExceeded,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Rejects the first job whose duration exceeds `capacity`.
///
/// Runs before any scheduling attempt.
pub fn check_capacity(jobs: &[Job], capacity: u32) -> Result<(), SolveError> {
    match jobs.iter().find(|j| j.duration > capacity) {
        Some(job) => Err(SolveError::CapacityExceeded {
            job_id: job.id,
            name: job.name.clone(),
            duration: job.duration,
            capacity,
        }),
        None => Ok(()),
    }
}

/// Validates a job list against a machine capacity.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(jobs: &[Job], capacity: u32) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    if jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoJobs,
            "No jobs submitted",
        ));
    }

    for job in jobs {
        if !ids.insert(job.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }

        if job.duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Job '{}' has zero duration", job.name),
            ));
        }

        if job.duration > capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapacityExceeded,
                format!(
                    "Job '{}' ({} units) exceeds the {}-unit machine capacity limit",
                    job.name, job.duration, capacity
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
