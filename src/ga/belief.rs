//! Belief space of the cultural algorithm.
//!
//! Cross-generation memory with two knowledge sources:
//! - **Situational**: the best solution seen so far, held as an owned copy
//!   independent of the evolving population.
//! - **Normative**: per-job counts of which machine the accepted (top
//!   ranked) chromosomes chose, used to bias mutation.
//!
//! # Reference
//! Reynolds (1994), "An Introduction to Cultural Algorithms"

use std::collections::HashMap;

use rand::Rng;

use super::config::clamp_rate;
use super::Chromosome;
use crate::models::{CapacityViolation, JobId, MachineId, Schedule};
use crate::scheduler::Evaluation;

/// A scored population member.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub chromosome: Chromosome,
    pub evaluation: Evaluation,
}

impl Candidate {
    /// Fitness of the evaluation (lower is better).
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.evaluation.fitness
    }
}

/// Best solution retained by the belief space.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    pub fitness: f64,
    pub chromosome: Chromosome,
    pub schedule: Schedule,
    pub violations: Vec<CapacityViolation>,
}

/// Shared memory of one cultural run.
#[derive(Debug, Clone)]
pub struct BeliefSpace {
    best: Option<BestSolution>,
    /// job → (machine, count) in first-seen order.
    reputation: HashMap<JobId, Vec<(MachineId, usize)>>,
    acceptance_percent: usize,
    influence_rate: f64,
}

impl BeliefSpace {
    /// Accepts the top 20% and influences 70% of eligible mutations.
    pub fn new() -> Self {
        Self {
            best: None,
            reputation: HashMap::new(),
            acceptance_percent: 20,
            influence_rate: 0.7,
        }
    }

    /// Sets the share of each generation that is accepted (1..=100).
    pub fn with_acceptance_percent(mut self, percent: usize) -> Self {
        self.acceptance_percent = percent.clamp(1, 100);
        self
    }

    /// Sets the probability that a mutation follows the reputation.
    /// NaN counts as zero.
    pub fn with_influence_rate(mut self, rate: f64) -> Self {
        self.influence_rate = clamp_rate(rate);
        self
    }

    /// Best fitness so far, `+inf` before the first feasible update.
    pub fn best_fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |b| b.fitness)
    }

    /// Best solution so far.
    pub fn best(&self) -> Option<&BestSolution> {
        self.best.as_ref()
    }

    /// Consumes the belief space, keeping the best solution.
    pub fn into_best(self) -> Option<BestSolution> {
        self.best
    }

    /// Number of candidates accepted out of a pool of `pool` (at least one).
    pub fn acceptance_count(&self, pool: usize) -> usize {
        (pool * self.acceptance_percent).div_ceil(100).max(1).min(pool)
    }

    /// Absorbs a scored generation.
    ///
    /// Ranks the candidates, replaces the best solution when the top one is
    /// strictly better, and adds the accepted chromosomes' machine choices
    /// to the reputation. Returns whether the best improved.
    pub fn update(&mut self, candidates: &[Candidate]) -> bool {
        if candidates.is_empty() {
            return false;
        }

        let mut ranked: Vec<&Candidate> = candidates.iter().collect();
        ranked.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
        ranked.truncate(self.acceptance_count(candidates.len()));

        let top = ranked[0];
        let improved = top.fitness() < self.best_fitness();
        if improved {
            self.best = Some(BestSolution {
                fitness: top.fitness(),
                chromosome: top.chromosome.clone(),
                schedule: top.evaluation.schedule.clone(),
                violations: top.evaluation.violations.clone(),
            });
        }

        for candidate in ranked {
            for (job_id, genes) in candidate.chromosome.iter() {
                let counts = self.reputation.entry(job_id).or_default();
                for gene in genes {
                    match counts.iter_mut().find(|(m, _)| *m == gene.machine) {
                        Some((_, n)) => *n += 1,
                        None => counts.push((gene.machine, 1)),
                    }
                }
            }
        }

        improved
    }

    /// Machine counts recorded for a job, in first-seen order.
    pub fn reputation(&self, job_id: JobId) -> Option<&[(MachineId, usize)]> {
        self.reputation.get(&job_id).map(Vec::as_slice)
    }

    /// Most frequently chosen machine for a job; first seen wins ties.
    pub fn preferred_machine(&self, job_id: JobId) -> Option<MachineId> {
        self.reputation(job_id)?
            .iter()
            .fold(None, |best: Option<(MachineId, usize)>, &(m, n)| match best {
                Some((_, top)) if top >= n => best,
                _ => Some((m, n)),
            })
            .map(|(m, _)| m)
    }

    /// Machine suggested for mutating a job.
    ///
    /// With the influence probability, and only when the job has reputation
    /// data, returns the preferred machine. `None` means the caller should
    /// pick uniformly at random.
    pub fn influence_mutation<R: Rng + ?Sized>(&self, job_id: JobId, rng: &mut R) -> Option<MachineId> {
        if !self.reputation.contains_key(&job_id) || !rng.random_bool(self.influence_rate) {
            return None;
        }
        self.preferred_machine(job_id)
    }
}

impl Default for BeliefSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::ChunkGene;
    use crate::models::Job;
    use crate::scheduler::ScheduleEvaluator;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn candidate(jobs: &[Job], machines: &[usize]) -> Candidate {
        let order: Vec<&Job> = jobs.iter().collect();
        let mut chromosome = Chromosome::new();
        for (job, &machine) in jobs.iter().zip(machines) {
            chromosome.insert(
                job.id,
                vec![ChunkGene {
                    machine,
                    size: job.duration,
                    order: 0,
                }],
            );
        }
        let evaluation = ScheduleEvaluator::new(jobs).evaluate(&chromosome, &order);
        Candidate {
            chromosome,
            evaluation,
        }
    }

    fn jobs() -> Vec<Job> {
        vec![Job::new(1, "A", 5), Job::new(2, "B", 5), Job::new(3, "C", 5)]
    }

    #[test]
    fn test_acceptance_count() {
        let belief = BeliefSpace::new();
        assert_eq!(belief.acceptance_count(60), 12);
        assert_eq!(belief.acceptance_count(7), 2);
        assert_eq!(belief.acceptance_count(3), 1);
        assert_eq!(belief.acceptance_count(1), 1);
    }

    #[test]
    fn test_update_keeps_best() {
        let jobs = jobs();
        let spread = candidate(&jobs, &[0, 1, 2]);
        let stacked = candidate(&jobs, &[0, 0, 0]);
        assert!(spread.fitness() < stacked.fitness());

        let mut belief = BeliefSpace::new();
        assert!(belief.best_fitness().is_infinite());
        assert!(belief.update(&[stacked.clone(), spread.clone()]));
        assert!((belief.best_fitness() - spread.fitness()).abs() < 1e-10);
        assert_eq!(belief.best().unwrap().chromosome, spread.chromosome);
    }

    #[test]
    fn test_best_fitness_is_monotonic() {
        let jobs = jobs();
        let good = candidate(&jobs, &[0, 1, 2]);
        let bad = candidate(&jobs, &[1, 1, 1]);

        let mut belief = BeliefSpace::new();
        belief.update(&[good.clone()]);
        let after_good = belief.best_fitness();
        assert!(!belief.update(&[bad]));
        assert!(belief.best_fitness() <= after_good);
        assert_eq!(belief.best().unwrap().chromosome, good.chromosome);
    }

    #[test]
    fn test_best_is_independent_of_population() {
        let jobs = jobs();
        let mut population = vec![candidate(&jobs, &[0, 1, 2])];

        let mut belief = BeliefSpace::new();
        belief.update(&population);
        population[0].chromosome.genes_mut(1).unwrap()[0].machine = 2;

        assert_eq!(belief.best().unwrap().chromosome.genes(1).unwrap()[0].machine, 0);
    }

    #[test]
    fn test_reputation_counts_accepted_only() {
        let jobs = jobs();
        // 10 candidates → 2 accepted.
        let mut pool = vec![candidate(&jobs, &[0, 1, 2]), candidate(&jobs, &[0, 2, 1])];
        for _ in 0..8 {
            pool.push(candidate(&jobs, &[2, 2, 2]));
        }

        let mut belief = BeliefSpace::new();
        belief.update(&pool);

        assert_eq!(belief.reputation(1), Some(&[(0, 2)][..]));
        assert_eq!(belief.preferred_machine(1), Some(0));
        // Job 2 saw machine 1 then 2 once each: first seen wins.
        assert_eq!(belief.preferred_machine(2), Some(1));
        assert_eq!(belief.preferred_machine(99), None);
    }

    #[test]
    fn test_influence_mutation() {
        let jobs = jobs();
        let mut belief = BeliefSpace::new().with_influence_rate(1.0);
        let mut rng = SmallRng::seed_from_u64(42);

        assert_eq!(belief.influence_mutation(1, &mut rng), None);
        belief.update(&[candidate(&jobs, &[2, 0, 1])]);
        assert_eq!(belief.influence_mutation(1, &mut rng), Some(2));

        let silent = belief.clone().with_influence_rate(0.0);
        assert_eq!(silent.influence_mutation(1, &mut rng), None);
    }

    #[test]
    fn test_nan_influence_rate_never_influences() {
        let jobs = jobs();
        let mut belief = BeliefSpace::new().with_influence_rate(f64::NAN);
        belief.update(&[candidate(&jobs, &[2, 0, 1])]);

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(belief.influence_mutation(1, &mut rng), None);
        }
        let eager = BeliefSpace::new().with_influence_rate(5.0);
        assert!((eager.influence_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_update_empty_is_noop() {
        let mut belief = BeliefSpace::new();
        assert!(!belief.update(&[]));
        assert!(belief.best().is_none());
    }
}
