//! Solve entry point.
//!
//! Takes a validated job list and an algorithm selector, runs the chosen
//! scheduler and assembles a [`ScheduleResult`]: the per-machine chunk
//! records, statistics, the narrative log and any capacity violations.
//! Failures never escape as errors; they become results with
//! `success == false`, an [`ErrorKind`] and a message.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result, SolveError};
use crate::ga::{CulturalConfig, CulturalOutcome, CulturalScheduler};
use crate::models::{
    CapacityViolation, Job, JobId, MachineId, Schedule, MACHINE_CAPACITY, MAX_CHUNK_SIZE,
    TOTAL_CAPACITY,
};
use crate::report::{analyze_schedule, Journal};
use crate::scheduler::{GreedyListScheduler, ScheduleStats};
use crate::validation::{check_capacity, validate_input};

/// Scheduling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Least-loaded-machine list scheduling. Accepts the legacy selector
    /// `"backtracking"`; no backtracking takes place.
    #[default]
    #[serde(alias = "backtracking")]
    Greedy,
    /// Cultural (genetic + belief space) search.
    Cultural,
}

/// A scheduling request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveRequest {
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Parameters for [`Algorithm::Cultural`].
    #[serde(default)]
    pub cultural: CulturalConfig,
}

impl SolveRequest {
    pub fn new(jobs: Vec<Job>, algorithm: Algorithm) -> Self {
        Self {
            jobs,
            algorithm,
            cultural: CulturalConfig::default(),
        }
    }

    pub fn with_cultural_config(mut self, config: CulturalConfig) -> Self {
        self.cultural = config;
        self
    }
}

/// A placed chunk as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub job: Job,
    pub machine: MachineId,
    pub start: u32,
    pub end: u32,
    /// 1-based position among the job's chunks.
    pub chunk_id: usize,
    pub total_chunks: usize,
    pub size: u32,
}

/// Search parameters of a cultural run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceDetails {
    pub generations: usize,
    pub population: usize,
    pub machine_capacity: u32,
}

/// Outcome of [`solve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub success: bool,
    /// Set when a cultural run stopped early on its cancel flag; the
    /// schedule is then the best found before the stop.
    pub cancelled: bool,
    /// Latest machine finish time; 0 on failure.
    pub makespan: u32,
    /// Penalized fitness of the returned schedule (cultural only).
    pub fitness: Option<f64>,
    /// Wall-clock seconds.
    pub execution_time: f64,
    /// Per-machine chunk records, ordered by start time.
    pub schedule: Vec<Vec<ChunkRecord>>,
    pub logs: Vec<String>,
    /// Generations run (cultural only).
    pub iterations: Option<usize>,
    /// Chunk count per job.
    pub splits_info: BTreeMap<JobId, usize>,
    /// Percentage of machine time spent working.
    pub efficiency: Option<f64>,
    pub total_work: Option<u32>,
    pub total_idle_time: Option<f64>,
    pub total_machine_time: Option<f64>,
    /// Per-machine work as a percentage of capacity.
    pub machine_loads: Option<Vec<f64>>,
    pub capacity_violations: Vec<CapacityViolation>,
    /// Best fitness per generation (cultural only).
    pub history: Vec<f64>,
    pub performance_details: Option<PerformanceDetails>,
    pub error_kind: Option<ErrorKind>,
    pub error_message: Option<String>,
}

impl ScheduleResult {
    fn failure(err: &SolveError, logs: Vec<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            cancelled: matches!(err, SolveError::Cancelled),
            makespan: 0,
            fitness: None,
            execution_time: elapsed.as_secs_f64(),
            schedule: Vec::new(),
            logs,
            iterations: None,
            splits_info: BTreeMap::new(),
            efficiency: None,
            total_work: None,
            total_idle_time: None,
            total_machine_time: None,
            machine_loads: None,
            capacity_violations: Vec::new(),
            history: Vec::new(),
            performance_details: None,
            error_kind: Some(err.kind()),
            error_message: Some(err.to_string()),
        }
    }
}

/// Schedule produced by either algorithm, before reporting.
struct Solution {
    schedule: Schedule,
    violations: Vec<CapacityViolation>,
    fitness: Option<f64>,
    history: Vec<f64>,
    details: Option<PerformanceDetails>,
    cancelled: bool,
}

impl Solution {
    fn from_cultural(outcome: CulturalOutcome, population: usize) -> Self {
        Self {
            schedule: outcome.best.schedule,
            violations: outcome.best.violations,
            fitness: Some(outcome.best.fitness),
            history: outcome.history,
            details: Some(PerformanceDetails {
                generations: outcome.generations,
                population,
                machine_capacity: MACHINE_CAPACITY,
            }),
            cancelled: outcome.cancelled,
        }
    }
}

/// Runs the requested algorithm. Never panics on bad input.
pub fn solve(request: &SolveRequest) -> ScheduleResult {
    let started = Instant::now();
    let mut journal = Journal::new();

    match run(request, &mut journal) {
        Ok(solution) => report(request, solution, journal, started.elapsed()),
        Err(err) => {
            warn!("solve failed: {err}");
            journal.record(format!("ERROR: {err}"));
            ScheduleResult::failure(&err, journal.into_lines(), started.elapsed())
        }
    }
}

fn run(request: &SolveRequest, journal: &mut Journal) -> Result<Solution> {
    let jobs = &request.jobs;

    check_capacity(jobs, MACHINE_CAPACITY)?;
    if let Err(errors) = validate_input(jobs, MACHINE_CAPACITY) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(SolveError::InvalidInput(messages.join("; ")));
    }

    let total_work: u32 = jobs.iter().map(|j| j.duration).sum();
    journal.record(format!("Starting {:?} scheduler...", request.algorithm));
    journal.record(format!("Total jobs: {}", jobs.len()));
    journal.record(format!("Total work: {total_work} units"));
    journal.record(format!(
        "Machine Capacity: {MACHINE_CAPACITY} units per machine (FIXED)"
    ));
    if total_work > TOTAL_CAPACITY {
        journal.record(format!(
            "WARNING: Total work exceeds total capacity ({TOTAL_CAPACITY} units)"
        ));
    }
    for job in jobs.iter().filter(|j| j.is_oversized(MAX_CHUNK_SIZE)) {
        journal.record(format!(
            "{} ({}) -> {} chunks",
            job.name,
            job.duration,
            job.chunks_needed(MAX_CHUNK_SIZE)
        ));
    }

    match request.algorithm {
        Algorithm::Greedy => {
            let outcome = GreedyListScheduler::new().schedule(jobs, journal)?;
            Ok(Solution {
                schedule: outcome.schedule,
                violations: outcome.violations,
                fitness: None,
                history: Vec::new(),
                details: None,
                cancelled: false,
            })
        }
        Algorithm::Cultural => {
            let scheduler = CulturalScheduler::new(jobs, request.cultural.clone());
            let outcome = scheduler.run(journal)?;
            Ok(Solution::from_cultural(
                outcome,
                scheduler.config().population_size,
            ))
        }
    }
}

fn report(
    request: &SolveRequest,
    solution: Solution,
    mut journal: Journal,
    elapsed: Duration,
) -> ScheduleResult {
    let stats = ScheduleStats::calculate(&solution.schedule, MACHINE_CAPACITY);
    if !stats.within_capacity(MACHINE_CAPACITY) {
        warn!(
            "machine work {:?} exceeds the {MACHINE_CAPACITY}-unit capacity",
            stats.machine_work
        );
    }

    journal.record(format!("Final Best Makespan: {}", stats.makespan));
    journal.record(format!("Efficiency: {:.2}%", stats.efficiency));
    analyze_schedule(
        &mut journal,
        &request.jobs,
        &solution.schedule,
        &stats,
        &solution.violations,
        MACHINE_CAPACITY,
    );

    info!(
        "{:?}: makespan {} for {} jobs, {} capacity violations",
        request.algorithm,
        stats.makespan,
        request.jobs.len(),
        solution.violations.len()
    );

    let jobs: HashMap<JobId, &Job> = request.jobs.iter().map(|j| (j.id, j)).collect();
    let schedule = solution
        .schedule
        .machines
        .iter()
        .map(|timeline| {
            timeline
                .iter()
                .filter_map(|c| {
                    jobs.get(&c.job_id).map(|job| ChunkRecord {
                        job: (*job).clone(),
                        machine: c.machine,
                        start: c.start,
                        end: c.end,
                        chunk_id: c.index,
                        total_chunks: c.total,
                        size: c.size,
                    })
                })
                .collect()
        })
        .collect();

    ScheduleResult {
        success: true,
        cancelled: solution.cancelled,
        makespan: stats.makespan,
        fitness: solution.fitness,
        execution_time: elapsed.as_secs_f64(),
        schedule,
        logs: journal.into_lines(),
        iterations: solution.details.as_ref().map(|d| d.generations),
        splits_info: stats.chunk_counts,
        efficiency: Some(stats.efficiency),
        total_work: Some(request.jobs.iter().map(|j| j.duration).sum()),
        total_idle_time: Some(stats.total_idle_time),
        total_machine_time: Some(stats.total_machine_time),
        machine_loads: Some(stats.machine_loads),
        capacity_violations: solution.violations,
        history: solution.history,
        performance_details: solution.details,
        error_kind: None,
        error_message: None,
    }
}
