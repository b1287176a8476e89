//! Human-readable solve log.
//!
//! Schedulers narrate their progress into a [`Journal`]; the lines are
//! returned to the caller with the result and mirrored to the `log`
//! facade at debug level.

use std::collections::HashMap;

use log::debug;

use crate::models::{CapacityViolation, Job, JobId, Schedule};
use crate::scheduler::ScheduleStats;

/// Ordered collection of progress and analysis lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    lines: Vec<String>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line.
    pub fn record(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!("{line}");
        self.lines.push(line);
    }

    /// Recorded lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Consumes the journal.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Appends the per-machine analysis and the violation list.
///
/// Chunks are listed by job name; ids missing from `jobs` print as `Job <id>`.
pub fn analyze_schedule(
    journal: &mut Journal,
    jobs: &[Job],
    schedule: &Schedule,
    stats: &ScheduleStats,
    violations: &[CapacityViolation],
    capacity: u32,
) {
    let names: HashMap<JobId, &str> = jobs.iter().map(|j| (j.id, j.name.as_str())).collect();

    journal.record("===== SCHEDULE ANALYSIS =====");

    for (machine, timeline) in schedule.machines.iter().enumerate() {
        let work = stats.machine_work.get(machine).copied().unwrap_or(0);
        let utilization = stats.machine_utilization.get(machine).copied().unwrap_or(0.0);
        let usage = (work as f64 / capacity.max(1) as f64 * 100.0).min(100.0);

        journal.record(format!("Machine {}:", machine + 1));
        journal.record(format!("  Total work: {work}"));
        journal.record(format!("  Utilization: {utilization:.1}%"));
        journal.record(format!("  Capacity: {capacity} units"));
        journal.record(format!("  Capacity usage: {usage:.1}%"));
        journal.record(format!("  Tasks: {}", timeline.len()));

        if work > capacity {
            journal.record(format!(
                "  WARNING: Exceeded capacity by {} units",
                work - capacity
            ));
        }

        for chunk in timeline {
            let name = match names.get(&chunk.job_id) {
                Some(name) => (*name).to_string(),
                None => format!("Job {}", chunk.job_id),
            };
            journal.record(format!(
                "    {name} [{}/{}]: {}-{} ({} units)",
                chunk.index, chunk.total, chunk.start, chunk.end, chunk.size
            ));
        }
    }

    if !violations.is_empty() {
        journal.record("===== CAPACITY VIOLATIONS =====");
        for v in violations {
            journal.record(format!("  Job {} (ID: {})", v.job_name, v.job_id));
            journal.record(format!("    Machine {}: {}-{}", v.machine + 1, v.start, v.end));
            journal.record(format!("    Exceeded capacity by {} units", v.exceeded_by));
        }
    }
}
