//! Schedule construction and evaluation.
//!
//! Provides the greedy list scheduler, the chromosome evaluator used by
//! the cultural algorithm, and schedule quality metrics. Both builders
//! place chunks through the same simulation, so start times, capacity
//! violations and makespan follow identical rules.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

mod evaluator;
mod greedy;
mod kpi;
mod simulation;

pub use evaluator::{
    Evaluation, ScheduleEvaluator, IMBALANCE_WEIGHT, INEFFICIENCY_WEIGHT, VIOLATION_PENALTY,
};
pub use greedy::{GreedyListScheduler, GreedyOutcome};
pub use kpi::ScheduleStats;
