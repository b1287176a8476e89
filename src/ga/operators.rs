//! Genetic operators for chunk-assignment chromosomes.
//!
//! - [`tournament_select`]: best of a small sample drawn without replacement
//! - [`uniform_crossover`]: each job's whole chunk list from either parent
//! - [`mutate`]: re-split or reassign one job, guided by the belief space
//!
//! All operators take the random source as a parameter so runs can be
//! seeded.

use rand::seq::{index, IndexedRandom};
use rand::Rng;

use super::chromosome::spread_split;
use super::{BeliefSpace, Candidate, Chromosome};
use crate::decompose::TaskDecomposer;
use crate::models::Job;

/// Picks `count` parents, each the fittest of `tournament_size` candidates
/// sampled without replacement (fewer when the pool is smaller).
///
/// Returns indices into `pool`.
pub fn tournament_select<R: Rng + ?Sized>(
    pool: &[Candidate],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    if pool.is_empty() {
        return Vec::new();
    }
    let k = tournament_size.clamp(1, pool.len());

    (0..count)
        .map(|_| {
            index::sample(rng, pool.len(), k)
                .iter()
                .min_by(|&a, &b| pool[a].fitness().total_cmp(&pool[b].fitness()))
                .unwrap_or(0)
        })
        .collect()
}

/// Uniform per-job crossover.
///
/// For every job in `order`, the child takes that job's chunk list from
/// `p1` or `p2` with equal probability. A job missing from the chosen
/// parent stays missing in the child.
pub fn uniform_crossover<R: Rng + ?Sized>(
    p1: &Chromosome,
    p2: &Chromosome,
    order: &[&Job],
    rng: &mut R,
) -> Chromosome {
    let mut child = Chromosome::new();
    for job in order {
        let donor = if rng.random_bool(0.5) { p1 } else { p2 };
        if let Some(genes) = donor.genes(job.id) {
            child.insert(job.id, genes.to_vec());
        }
    }
    child
}

/// Mutates one job chosen uniformly from `order`.
///
/// Oversized jobs are either re-split with a fresh machine spread or have
/// one chunk moved to a random machine (even odds). Other jobs move to the
/// belief space's preferred machine, or a random one when it has none.
pub fn mutate<R: Rng + ?Sized>(
    chromosome: &mut Chromosome,
    order: &[&Job],
    decomposer: &TaskDecomposer,
    belief: &BeliefSpace,
    num_machines: usize,
    rng: &mut R,
) {
    let Some(job) = order.choose(rng).copied() else {
        return;
    };
    if !chromosome.contains(job.id) {
        return;
    }

    let resplit = rng.random_bool(0.5);
    if job.is_oversized(decomposer.max_chunk_size()) {
        if resplit {
            chromosome.insert(job.id, spread_split(job, decomposer, num_machines, rng));
        } else if let Some(genes) = chromosome.genes_mut(job.id) {
            if !genes.is_empty() {
                let idx = rng.random_range(0..genes.len());
                genes[idx].machine = rng.random_range(0..num_machines);
            }
        }
    } else {
        let machine = belief
            .influence_mutation(job.id, rng)
            .unwrap_or_else(|| rng.random_range(0..num_machines));
        if let Some(gene) = chromosome.genes_mut(job.id).and_then(|g| g.first_mut()) {
            gene.machine = machine;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::ChunkGene;
    use crate::scheduler::ScheduleEvaluator;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn jobs() -> Vec<Job> {
        vec![
            Job::new(1, "Small", 3),
            Job::new(2, "Split", 12),
            Job::new(3, "Other", 5),
        ]
    }

    fn scored(jobs: &[Job], seed: u64) -> Candidate {
        let order: Vec<&Job> = jobs.iter().collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        let chromosome = Chromosome::random(&order, &TaskDecomposer::new(5), 3, &mut rng);
        let evaluation = ScheduleEvaluator::new(jobs).evaluate(&chromosome, &order);
        Candidate {
            chromosome,
            evaluation,
        }
    }

    #[test]
    fn test_tournament_picks_best_when_sampling_everything() {
        let jobs = jobs();
        let pool: Vec<Candidate> = (0..4).map(|s| scored(&jobs, s)).collect();
        let best = (0..pool.len())
            .min_by(|&a, &b| pool[a].fitness().total_cmp(&pool[b].fitness()))
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let parents = tournament_select(&pool, 10, 5, &mut rng);
        assert_eq!(parents.len(), 10);
        assert!(parents
            .iter()
            .all(|&p| pool[p].fitness() == pool[best].fitness()));
    }

    #[test]
    fn test_tournament_empty_pool() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(tournament_select(&[], 5, 5, &mut rng).is_empty());
    }

    #[test]
    fn test_crossover_takes_whole_job_lists() {
        let jobs = jobs();
        let order: Vec<&Job> = jobs.iter().collect();
        let p1 = scored(&jobs, 11).chromosome;
        let p2 = scored(&jobs, 12).chromosome;
        let mut rng = SmallRng::seed_from_u64(5);

        for _ in 0..20 {
            let child = uniform_crossover(&p1, &p2, &order, &mut rng);
            assert_eq!(child.len(), 3);
            for job in &jobs {
                let genes = child.genes(job.id).unwrap();
                assert!(genes == p1.genes(job.id).unwrap() || genes == p2.genes(job.id).unwrap());
            }
        }
    }

    #[test]
    fn test_crossover_skips_missing_jobs() {
        let jobs = jobs();
        let order: Vec<&Job> = jobs.iter().collect();
        let empty = Chromosome::new();
        let mut rng = SmallRng::seed_from_u64(5);

        let child = uniform_crossover(&empty, &empty, &order, &mut rng);
        assert!(child.is_empty());
    }

    #[test]
    fn test_mutation_preserves_validity() {
        let jobs = jobs();
        let order: Vec<&Job> = jobs.iter().collect();
        let decomposer = TaskDecomposer::new(5);
        let belief = BeliefSpace::new();
        let evaluator = ScheduleEvaluator::new(&jobs);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut ch = scored(&jobs, 3).chromosome;

        for _ in 0..200 {
            mutate(&mut ch, &order, &decomposer, &belief, 3, &mut rng);
            assert!(evaluator.evaluate(&ch, &order).is_feasible());
        }
    }

    #[test]
    fn test_mutation_follows_belief() {
        let jobs = vec![Job::new(1, "Small", 3)];
        let order: Vec<&Job> = jobs.iter().collect();
        let mut ch = Chromosome::new();
        ch.insert(
            1,
            vec![ChunkGene {
                machine: 2,
                size: 3,
                order: 0,
            }],
        );
        let evaluation = ScheduleEvaluator::new(&jobs).evaluate(&ch, &order);
        let mut belief = BeliefSpace::new().with_influence_rate(1.0);
        belief.update(&[Candidate {
            chromosome: ch.clone(),
            evaluation,
        }]);

        let mut rng = SmallRng::seed_from_u64(4);
        let mut mutated = ch.clone();
        mutated.genes_mut(1).unwrap()[0].machine = 0;
        mutate(&mut mutated, &order, &TaskDecomposer::new(5), &belief, 3, &mut rng);
        assert_eq!(mutated.genes(1).unwrap()[0].machine, 2);
    }

    #[test]
    fn test_mutation_on_empty_order_is_noop() {
        let mut ch = Chromosome::new();
        let mut rng = SmallRng::seed_from_u64(4);
        mutate(&mut ch, &[], &TaskDecomposer::new(5), &BeliefSpace::new(), 3, &mut rng);
        assert!(ch.is_empty());
    }
}
