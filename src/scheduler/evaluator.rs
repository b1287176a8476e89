//! Chromosome evaluation.
//!
//! Simulates a chunk→machine assignment in topological order and scores
//! the resulting schedule. Lower fitness is better.
//!
//! # Fitness
//!
//! ```text
//! fitness = makespan
//!         + (1 - efficiency) * makespan * 0.4
//!         + (max util - min util) * makespan * 0.2
//!         + 10 * violations
//! ```
//!
//! where `efficiency = work / (makespan * machines)` and per-machine
//! utilization is `work / max(1, busy_until)`.
//!
//! Dependency ids that name no submitted job count as satisfied, matching
//! the dependency graph, so such chromosomes stay feasible instead of being
//! scored `+inf`.

use std::collections::HashMap;

use super::simulation::Simulation;
use crate::ga::Chromosome;
use crate::models::{
    CapacityViolation, Job, JobId, Machine, Schedule, MAX_CHUNK_SIZE,
};

/// Weight of the inefficiency penalty.
pub const INEFFICIENCY_WEIGHT: f64 = 0.4;
/// Weight of the utilization imbalance penalty.
pub const IMBALANCE_WEIGHT: f64 = 0.2;
/// Penalty per capacity violation.
pub const VIOLATION_PENALTY: f64 = 10.0;

/// Score and decoded schedule of one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Penalized makespan; `+inf` when infeasible.
    pub fitness: f64,
    /// Raw makespan of the schedule.
    pub makespan: u32,
    pub schedule: Schedule,
    pub violations: Vec<CapacityViolation>,
}

impl Evaluation {
    fn infeasible() -> Self {
        Self {
            fitness: f64::INFINITY,
            makespan: 0,
            schedule: Schedule::default(),
            violations: Vec::new(),
        }
    }

    /// Whether the chromosome decoded into a schedule.
    pub fn is_feasible(&self) -> bool {
        self.fitness.is_finite()
    }
}

/// Decodes and scores chromosomes against a fixed job set.
///
/// Holds only shared references, so one evaluator can score a whole
/// population from several threads.
#[derive(Debug, Clone)]
pub struct ScheduleEvaluator<'a> {
    jobs: HashMap<JobId, &'a Job>,
    fleet: Vec<Machine>,
    max_chunk_size: u32,
}

impl<'a> ScheduleEvaluator<'a> {
    /// Creates an evaluator for the fixed fleet.
    pub fn new(jobs: &'a [Job]) -> Self {
        Self {
            jobs: jobs.iter().map(|j| (j.id, j)).collect(),
            fleet: Machine::fleet(),
            max_chunk_size: MAX_CHUNK_SIZE,
        }
    }

    /// Overrides the chunk size limit.
    pub fn with_max_chunk_size(mut self, max_chunk_size: u32) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    /// Scores `chromosome` by simulating it in `order`.
    ///
    /// Returns an infeasible evaluation when the chromosome breaks the
    /// size invariants, misses a job, names an unknown job or machine, or
    /// when a present dependency has not completed before its dependent.
    pub fn evaluate(&self, chromosome: &Chromosome, order: &[&Job]) -> Evaluation {
        if !self.is_consistent(chromosome) {
            return Evaluation::infeasible();
        }

        let mut sim = Simulation::new(self.fleet.clone());
        let mut completed: HashMap<JobId, u32> = HashMap::with_capacity(order.len());

        for job in order {
            let mut ready = 0;
            for dep in &job.dependencies {
                if !self.jobs.contains_key(dep) {
                    continue;
                }
                match completed.get(dep) {
                    Some(&end) => ready = ready.max(end),
                    None => return Evaluation::infeasible(),
                }
            }

            let mut genes: Vec<_> = match chromosome.genes(job.id) {
                Some(genes) if !genes.is_empty() => genes.iter().collect(),
                _ => return Evaluation::infeasible(),
            };
            genes.sort_by_key(|g| g.order);

            let total = genes.len();
            for (i, gene) in genes.into_iter().enumerate() {
                if gene.machine >= sim.machine_count() {
                    return Evaluation::infeasible();
                }
                let (_, end) = sim.place(job, gene.machine, ready, gene.size, i + 1, total);
                ready = end;
            }
            completed.insert(job.id, ready);
        }

        let outcome = sim.finish();
        let fitness = fitness(&outcome.machines, outcome.violations.len());
        Evaluation {
            fitness,
            makespan: outcome.schedule.makespan(),
            schedule: outcome.schedule,
            violations: outcome.violations,
        }
    }

    fn is_consistent(&self, chromosome: &Chromosome) -> bool {
        chromosome.iter().all(|(job_id, genes)| {
            let Some(job) = self.jobs.get(&job_id) else {
                return false;
            };
            let total: u32 = genes.iter().map(|g| g.size).sum();
            total == job.duration && genes.iter().all(|g| g.size <= self.max_chunk_size)
        })
    }
}

/// Penalized makespan of a simulated fleet.
pub(crate) fn fitness(machines: &[Machine], violation_count: usize) -> f64 {
    let makespan = machines.iter().map(|m| m.busy_until).max().unwrap_or(0) as f64;
    let total_work: u32 = machines.iter().map(|m| m.work).sum();

    let machine_time = makespan * machines.len() as f64;
    let efficiency = if machine_time > 0.0 {
        total_work as f64 / machine_time
    } else {
        0.0
    };
    let inefficiency = (1.0 - efficiency) * makespan * INEFFICIENCY_WEIGHT;

    let (min_util, max_util) = machines
        .iter()
        .map(Machine::utilization)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), u| {
            (lo.min(u), hi.max(u))
        });
    let imbalance = if machines.is_empty() {
        0.0
    } else {
        (max_util - min_util) * makespan * IMBALANCE_WEIGHT
    };

    makespan + inefficiency + imbalance + VIOLATION_PENALTY * violation_count as f64
}
