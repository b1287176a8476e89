//! Chunked job scheduling on a fixed machine fleet.
//!
//! Jobs with integer durations and precedence constraints are split into
//! chunks of at most [`MAX_CHUNK_SIZE`] units and placed on
//! [`NUM_MACHINES`] identical machines, each with a soft capacity of
//! [`MACHINE_CAPACITY`] work units. The goal is a short makespan with a
//! balanced load and no capacity overruns.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Machine`, `Schedule`, `PlacedChunk`
//! - **`graph`**: Dependency graph and topological ordering
//! - **`decompose`**: Balanced chunk splitting
//! - **`scheduler`**: Greedy list scheduling, chromosome evaluation, KPIs
//! - **`ga`**: Cultural algorithm (genetic search + belief space)
//! - **`validation`**: Input integrity checks
//! - **`solver`**: The [`solve`] entry point and its result type
//!
//! # Example
//!
//! ```
//! use chunk_schedule::{solve, Algorithm, Job, SolveRequest};
//!
//! let jobs = vec![Job::new(1, "Cut", 12), Job::new(2, "Weld", 4).with_dependency(1)];
//! let result = solve(&SolveRequest::new(jobs, Algorithm::Greedy));
//! assert!(result.success);
//! assert_eq!(result.splits_info[&1], 3);
//! ```
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Reynolds (1994), "An Introduction to Cultural Algorithms"

pub mod decompose;
pub mod error;
pub mod ga;
pub mod graph;
pub mod models;
pub mod report;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{ErrorKind, Result, SolveError};
pub use models::{Job, JobId, MACHINE_CAPACITY, MAX_CHUNK_SIZE, NUM_MACHINES};
pub use solver::{solve, Algorithm, ChunkRecord, ScheduleResult, SolveRequest};
