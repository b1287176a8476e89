//! Cultural algorithm scheduler.
//!
//! A generational genetic search over chunk→machine assignments, coupled
//! with a [`BeliefSpace`] that remembers the best solution and biases
//! mutation towards machines favoured by the top of each generation.
//!
//! # Generation
//!
//! 1. Evaluate every chromosome (optionally in parallel); drop infeasible ones.
//! 2. Feed the feasible pool to the belief space; record the best fitness.
//! 3. Tournament-select parents.
//! 4. Copy the elite, fill the rest with crossover or clones, then mutate.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::operators::{mutate, tournament_select, uniform_crossover};
use super::{BeliefSpace, BestSolution, Candidate, Chromosome, CulturalConfig};
use crate::decompose::TaskDecomposer;
use crate::error::{Result, SolveError};
use crate::graph::DependencyGraph;
use crate::models::{Job, MACHINE_CAPACITY, MAX_CHUNK_SIZE, NUM_MACHINES};
use crate::report::Journal;
use crate::scheduler::{Evaluation, ScheduleEvaluator};
use crate::validation::check_capacity;

/// Result of a cultural run.
#[derive(Debug, Clone)]
pub struct CulturalOutcome {
    /// Best solution found.
    pub best: BestSolution,
    /// Best fitness after each generation that had a feasible pool.
    pub history: Vec<f64>,
    /// Generations actually run.
    pub generations: usize,
    /// Whether the run stopped on the cancel flag.
    pub cancelled: bool,
}

/// Cultural algorithm over a borrowed job list.
///
/// # Example
///
/// ```
/// use chunk_schedule::ga::{CulturalConfig, CulturalScheduler};
/// use chunk_schedule::models::Job;
/// use chunk_schedule::report::Journal;
///
/// let jobs = vec![Job::new(1, "A", 5), Job::new(2, "B", 12)];
/// let config = CulturalConfig::default().with_generations(10).with_seed(1);
/// let outcome = CulturalScheduler::new(&jobs, config)
///     .run(&mut Journal::new())
///     .unwrap();
/// assert!(outcome.best.fitness.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct CulturalScheduler<'a> {
    jobs: &'a [Job],
    config: CulturalConfig,
    decomposer: TaskDecomposer,
}

impl<'a> CulturalScheduler<'a> {
    pub fn new(jobs: &'a [Job], config: CulturalConfig) -> Self {
        Self {
            jobs,
            config: config.normalized(),
            decomposer: TaskDecomposer::new(MAX_CHUNK_SIZE),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &CulturalConfig {
        &self.config
    }

    /// Runs with a random source seeded from the config, or the OS.
    pub fn run(&self, journal: &mut Journal) -> Result<CulturalOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.run_with_rng(&mut rng, journal)
    }

    /// Runs with the given random source.
    ///
    /// # Errors
    /// - [`SolveError::CapacityExceeded`] if a job alone exceeds capacity.
    /// - [`SolveError::CyclicDependency`] if the dependency graph has a cycle.
    /// - [`SolveError::Infeasible`] if no generation produced a feasible
    ///   chromosome.
    /// - [`SolveError::Cancelled`] if cancelled before anything feasible
    ///   was found.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        journal: &mut Journal,
    ) -> Result<CulturalOutcome> {
        check_capacity(self.jobs, MACHINE_CAPACITY)?;
        let order = DependencyGraph::new(self.jobs).topological_order()?;
        let cfg = &self.config;

        journal.record(format!(
            "Population: {}, Generations: {}",
            cfg.population_size, cfg.generations
        ));

        let evaluator = ScheduleEvaluator::new(self.jobs)
            .with_max_chunk_size(self.decomposer.max_chunk_size());
        let mut belief = BeliefSpace::new()
            .with_acceptance_percent(cfg.acceptance_percent)
            .with_influence_rate(cfg.influence_rate);

        let mut population: Vec<Chromosome> = (0..cfg.population_size)
            .map(|_| Chromosome::random(&order, &self.decomposer, NUM_MACHINES, rng))
            .collect();

        let mut history = Vec::with_capacity(cfg.generations);
        let mut generations = 0;
        let mut cancelled = false;

        for generation in 0..cfg.generations {
            if cfg.is_cancelled() {
                warn!("cultural run cancelled at generation {generation}");
                journal.record(format!("Cancelled at generation {generation}"));
                cancelled = true;
                break;
            }
            generations += 1;

            let evaluations = self.evaluate_all(&evaluator, &population, &order);
            let (mut pool, rejected): (Vec<Candidate>, Vec<Candidate>) = population
                .drain(..)
                .zip(evaluations)
                .map(|(chromosome, evaluation)| Candidate {
                    chromosome,
                    evaluation,
                })
                .partition(|c| c.evaluation.is_feasible());

            if pool.is_empty() {
                debug!("generation {generation}: no feasible chromosome");
                population = rejected.into_iter().map(|c| c.chromosome).collect();
                continue;
            }

            pool.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
            if belief.update(&pool) {
                debug!(
                    "generation {generation}: new best fitness {:.2}",
                    belief.best_fitness()
                );
            }
            history.push(belief.best_fitness());

            if (generation + 1) % 10 == 0 {
                info!(
                    "generation {}: best fitness {:.2}, feasible {}/{}",
                    generation + 1,
                    belief.best_fitness(),
                    pool.len(),
                    cfg.population_size
                );
                journal.record(format!(
                    "Generation {}: best fitness {:.2}",
                    generation + 1,
                    belief.best_fitness()
                ));
            }

            population = self.reproduce(&pool, &order, &belief, rng);
        }

        match belief.into_best() {
            Some(best) => {
                journal.record(format!("Final Best Fitness: {:.2}", best.fitness));
                Ok(CulturalOutcome {
                    best,
                    history,
                    generations,
                    cancelled,
                })
            }
            None if cancelled => Err(SolveError::Cancelled),
            None => Err(SolveError::Infeasible),
        }
    }

    fn evaluate_all(
        &self,
        evaluator: &ScheduleEvaluator<'_>,
        population: &[Chromosome],
        order: &[&Job],
    ) -> Vec<Evaluation> {
        if self.config.parallel {
            population
                .par_iter()
                .map(|c| evaluator.evaluate(c, order))
                .collect()
        } else {
            population
                .iter()
                .map(|c| evaluator.evaluate(c, order))
                .collect()
        }
    }

    /// Builds the next generation from a pool sorted by fitness.
    fn reproduce<R: Rng + ?Sized>(
        &self,
        pool: &[Candidate],
        order: &[&Job],
        belief: &BeliefSpace,
        rng: &mut R,
    ) -> Vec<Chromosome> {
        let cfg = &self.config;
        let parents = tournament_select(pool, pool.len(), cfg.tournament_size, rng);

        let mut next: Vec<Chromosome> = pool
            .iter()
            .take(cfg.elite_size.min(cfg.population_size))
            .map(|c| c.chromosome.clone())
            .collect();

        while next.len() < cfg.population_size {
            let p1 = &pool[parents[rng.random_range(0..parents.len())]].chromosome;
            let p2 = &pool[parents[rng.random_range(0..parents.len())]].chromosome;

            let mut child = if rng.random_bool(cfg.crossover_rate) {
                uniform_crossover(p1, p2, order, rng)
            } else {
                p1.clone()
            };
            if rng.random_bool(cfg.mutation_rate) {
                mutate(&mut child, order, &self.decomposer, belief, NUM_MACHINES, rng);
            }
            next.push(child);
        }

        next
    }
}
