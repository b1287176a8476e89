//! Cultural algorithm configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Parameters of a cultural run.
///
/// Every field has a default, so a request may override any subset.
///
/// # Example
///
/// ```
/// use chunk_schedule::ga::CulturalConfig;
///
/// let config = CulturalConfig::default()
///     .with_population_size(20)
///     .with_generations(10)
///     .with_seed(42);
/// assert_eq!(config.elite_size, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalConfig {
    /// Chromosomes per generation.
    pub population_size: usize,
    /// Generations to run.
    pub generations: usize,
    /// Best individuals copied unchanged into the next generation.
    pub elite_size: usize,
    /// Probability a child comes from crossover rather than cloning.
    pub crossover_rate: f64,
    /// Probability a child is mutated.
    pub mutation_rate: f64,
    /// Individuals per selection tournament.
    pub tournament_size: usize,
    /// Share of each generation accepted into the belief space, in percent.
    pub acceptance_percent: usize,
    /// Probability a small-job mutation follows the belief space.
    pub influence_rate: f64,
    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Evaluate each generation on the rayon thread pool.
    pub parallel: bool,
    #[serde(skip)]
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for CulturalConfig {
    fn default() -> Self {
        Self {
            population_size: 60,
            generations: 100,
            elite_size: 8,
            crossover_rate: 0.9,
            mutation_rate: 0.5,
            tournament_size: 5,
            acceptance_percent: 20,
            influence_rate: 0.7,
            seed: None,
            parallel: true,
            cancel: None,
        }
    }
}

impl CulturalConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(1);
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_elite_size(mut self, size: usize) -> Self {
        self.elite_size = size;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = clamp_rate(rate);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = clamp_rate(rate);
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Installs a flag that stops the run at the next generation boundary.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether the cancel flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Values clamped into their valid ranges.
    ///
    /// Deserialized configs bypass the builders, so the run normalizes
    /// them once before use.
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        config.population_size = config.population_size.max(1);
        config.tournament_size = config.tournament_size.max(1);
        config.acceptance_percent = config.acceptance_percent.clamp(1, 100);
        config.crossover_rate = clamp_rate(config.crossover_rate);
        config.mutation_rate = clamp_rate(config.mutation_rate);
        config.influence_rate = clamp_rate(config.influence_rate);
        config
    }
}

/// Clamps a probability into `[0, 1]`, mapping NaN to zero.
pub(super) fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}
