//! Greedy list scheduler.
//!
//! # Algorithm
//!
//! 1. Order jobs topologically.
//! 2. For each job, wait for the latest end among its dependencies' chunks.
//! 3. Split the job into balanced chunks.
//! 4. Put each chunk on the machine that frees up first (lowest index on
//!    ties), no earlier than the previous chunk of the same job.
//!
//! Capacity is advisory: a chunk ending past capacity is recorded as a
//! violation and placed anyway. There is no search and no backtracking;
//! the result is deterministic for a given job list.
//!
//! # Complexity
//! O(n * c * m) where n=jobs, c=chunks/job, m=machines.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (list scheduling)

use super::simulation::Simulation;
use crate::decompose::TaskDecomposer;
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::models::{CapacityViolation, Job, Machine, Schedule, MACHINE_CAPACITY, MAX_CHUNK_SIZE};
use crate::report::Journal;
use crate::validation::check_capacity;

/// Result of a greedy run.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyOutcome {
    pub schedule: Schedule,
    /// Latest machine finish time.
    pub makespan: u32,
    pub violations: Vec<CapacityViolation>,
}

/// Least-loaded-machine list scheduler.
///
/// # Example
///
/// ```
/// use chunk_schedule::models::Job;
/// use chunk_schedule::report::Journal;
/// use chunk_schedule::scheduler::GreedyListScheduler;
///
/// let jobs = vec![Job::new(1, "A", 5), Job::new(2, "B", 5).with_dependency(1)];
/// let outcome = GreedyListScheduler::new()
///     .schedule(&jobs, &mut Journal::new())
///     .unwrap();
/// assert_eq!(outcome.makespan, 10);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyListScheduler {
    decomposer: TaskDecomposer,
}

impl GreedyListScheduler {
    /// Creates a scheduler with the fixed chunk size limit.
    pub fn new() -> Self {
        Self {
            decomposer: TaskDecomposer::new(MAX_CHUNK_SIZE),
        }
    }

    /// Schedules `jobs` on the fixed fleet.
    ///
    /// # Errors
    /// - [`SolveError::CapacityExceeded`](crate::SolveError::CapacityExceeded)
    ///   if a job alone exceeds machine capacity.
    /// - [`SolveError::CyclicDependency`](crate::SolveError::CyclicDependency)
    ///   if the dependency graph has a cycle.
    pub fn schedule(&self, jobs: &[Job], journal: &mut Journal) -> Result<GreedyOutcome> {
        check_capacity(jobs, MACHINE_CAPACITY)?;
        let order = DependencyGraph::new(jobs).topological_order()?;

        let mut sim = Simulation::new(Machine::fleet());

        for job in order {
            journal.record(format!("Processing: {} (Duration: {})", job.name, job.duration));

            let mut current = job
                .dependencies
                .iter()
                .filter_map(|dep| sim.completion_time(*dep))
                .max()
                .unwrap_or(0);

            let sizes = self.decomposer.split_job(job);
            let total = sizes.len();
            if job.is_oversized(self.decomposer.max_chunk_size()) {
                journal.record(format!("   Needs splitting into {total} chunks"));
                journal.record(format!("   Chunk sizes: {sizes:?}"));
            }

            for (i, size) in sizes.into_iter().enumerate() {
                let machine = sim.least_loaded();
                let before = sim.violation_count();
                let (start, end) = sim.place(job, machine, current, size, i + 1, total);

                if sim.violation_count() > before {
                    journal.record(format!("   Capacity warning on Machine {}", machine + 1));
                }
                if total > 1 {
                    journal.record(format!(
                        "   Chunk {}: Size={size}, Machine={}, Start={start}, End={end}",
                        i + 1,
                        machine + 1
                    ));
                } else {
                    journal.record(format!(
                        "   No splitting needed. Machine={}, Start={start}, End={end}",
                        machine + 1
                    ));
                }
                current = end;
            }
        }

        let outcome = sim.finish();
        let makespan = outcome
            .machines
            .iter()
            .map(|m| m.busy_until)
            .max()
            .unwrap_or(0);

        Ok(GreedyOutcome {
            schedule: outcome.schedule,
            makespan,
            violations: outcome.violations,
        })
    }
}

impl Default for GreedyListScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolveError;
    use std::collections::HashSet;

    fn run(jobs: &[Job]) -> GreedyOutcome {
        GreedyListScheduler::new()
            .schedule(jobs, &mut Journal::new())
            .unwrap()
    }

    #[test]
    fn test_three_small_jobs_on_distinct_machines() {
        let jobs = vec![Job::new(1, "A", 5), Job::new(2, "B", 5), Job::new(3, "C", 5)];
        let outcome = run(&jobs);

        assert_eq!(outcome.makespan, 5);
        assert!(outcome.violations.is_empty());
        let machines: HashSet<usize> = outcome.schedule.chunks().map(|c| c.machine).collect();
        assert_eq!(machines.len(), 3);
        assert!(outcome.schedule.chunk_counts().values().all(|&n| n == 1));
    }

    #[test]
    fn test_three_jobs_of_ten_split_in_two() {
        let jobs = vec![Job::new(1, "A", 10), Job::new(2, "B", 10), Job::new(3, "C", 10)];
        let outcome = run(&jobs);

        assert!(outcome.schedule.chunk_counts().values().all(|&n| n == 2));
        assert!(outcome.schedule.chunks().all(|c| c.size == 5));
        // Sequential chunks of the same job leave one machine idle per step.
        assert_eq!(outcome.makespan, 15);
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_twelve_units_spread_sequentially() {
        let jobs = vec![Job::new(1, "Split", 12)];
        let outcome = run(&jobs);

        let chunks = outcome.schedule.chunks_for_job(1);
        let placed: Vec<(usize, u32, u32, usize, usize)> = chunks
            .iter()
            .map(|c| (c.machine, c.start, c.end, c.index, c.total))
            .collect();
        assert_eq!(
            placed,
            vec![(0, 0, 4, 1, 3), (1, 4, 8, 2, 3), (2, 8, 12, 3, 3)]
        );
        assert_eq!(outcome.makespan, 12);
    }

    #[test]
    fn test_dependent_starts_after_dependency() {
        let jobs = vec![Job::new(1, "A", 5), Job::new(2, "B", 5).with_dependency(1)];
        let outcome = run(&jobs);

        let a_end = outcome.schedule.job_completion_time(1).unwrap();
        let b = outcome.schedule.chunks_for_job(2);
        assert_eq!(a_end, 5);
        assert!(b[0].start >= a_end);
        assert_eq!(b[0].machine, 1);
    }

    #[test]
    fn test_dependencies_respected_in_chain() {
        let jobs = vec![
            Job::new(3, "C", 7).with_dependency(2),
            Job::new(2, "B", 9).with_dependency(1),
            Job::new(1, "A", 6),
            Job::new(4, "D", 4),
        ];
        let outcome = run(&jobs);

        for job in &jobs {
            let first_start = outcome.schedule.chunks_for_job(job.id)[0].start;
            for dep in &job.dependencies {
                assert!(first_start >= outcome.schedule.job_completion_time(*dep).unwrap());
            }
        }
    }

    #[test]
    fn test_overload_records_violations() {
        // 150 units on 120 units of capacity.
        let jobs: Vec<Job> = (1..=5).map(|i| Job::new(i, format!("J{i}"), 30)).collect();
        let mut journal = Journal::new();
        let outcome = GreedyListScheduler::new().schedule(&jobs, &mut journal).unwrap();

        assert!(!outcome.violations.is_empty());
        assert!(outcome.violations.iter().all(|v| v.end > 40 && v.exceeded_by == v.end - 40));
        assert_eq!(outcome.schedule.total_work(), 150);
        assert!(journal.contains("Capacity warning"));
    }

    #[test]
    fn test_capacity_error() {
        let err = GreedyListScheduler::new()
            .schedule(&[Job::new(1, "Huge", 41)], &mut Journal::new())
            .unwrap_err();
        assert!(matches!(err, SolveError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_cycle_error() {
        let jobs = vec![
            Job::new(1, "A", 5).with_dependency(2),
            Job::new(2, "B", 5).with_dependency(1),
        ];
        let err = GreedyListScheduler::new()
            .schedule(&jobs, &mut Journal::new())
            .unwrap_err();
        assert!(matches!(err, SolveError::CyclicDependency { .. }));
    }

    #[test]
    fn test_journal_narrates_splits() {
        let mut journal = Journal::new();
        GreedyListScheduler::new()
            .schedule(&[Job::new(1, "Split", 12)], &mut journal)
            .unwrap();
        assert!(journal.contains("Needs splitting into 3 chunks"));
        assert!(journal.contains("Chunk sizes: [4, 4, 4]"));
    }
}
