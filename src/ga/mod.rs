//! Cultural-algorithm scheduling.
//!
//! A genetic search over chunk→machine assignments guided by a belief
//! space (the cultural component).
//!
//! # Encoding
//!
//! A [`Chromosome`] maps each job to its ordered chunk list; each
//! [`ChunkGene`] holds the chunk's machine, size and position. Oversized
//! jobs always carry a balanced split, so operators only move chunks
//! between machines or redraw the machine spread.
//!
//! # Submodules
//!
//! - [`operators`]: selection, crossover and mutation
//!
//! # Reference
//! - Reynolds (1994), "An Introduction to Cultural Algorithms"
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

mod belief;
mod chromosome;
mod config;
mod cultural;
pub mod operators;
#[cfg(test)]
pub(crate) mod testing;

pub use belief::{BeliefSpace, BestSolution, Candidate};
pub use chromosome::{spread_split, ChunkGene, Chromosome};
pub use config::CulturalConfig;
pub use cultural::{CulturalOutcome, CulturalScheduler};
