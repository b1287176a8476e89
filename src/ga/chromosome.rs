//! Chunk-assignment chromosome.
//!
//! # Encoding
//!
//! A chromosome maps each job id to the ordered list of its chunks. Each
//! gene carries the chunk's machine, its size and its position within the
//! job. Jobs are kept in a `BTreeMap` so iteration is deterministic.
//!
//! A chromosome is valid when, for every job, gene sizes sum to the job's
//! duration and no gene exceeds the maximum chunk size. The evaluator
//! scores invalid chromosomes as infinitely bad.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::decompose::TaskDecomposer;
use crate::models::{Job, JobId, MachineId};

/// One chunk of a job in a chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkGene {
    /// Assigned machine.
    pub machine: MachineId,
    /// Work units.
    pub size: u32,
    /// Execution position within the job (0-based).
    pub order: usize,
}

/// Full assignment of every job's chunks to machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    genes: BTreeMap<JobId, Vec<ChunkGene>>,
}

impl Chromosome {
    /// Creates an empty chromosome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Random chromosome over `order`.
    ///
    /// Jobs within the chunk limit get one chunk on a uniformly random
    /// machine; larger jobs get a balanced split spread over the machines
    /// (see [`spread_split`]).
    pub fn random<R: Rng + ?Sized>(
        order: &[&Job],
        decomposer: &TaskDecomposer,
        num_machines: usize,
        rng: &mut R,
    ) -> Self {
        let mut chromosome = Self::new();
        for job in order {
            let genes = if job.is_oversized(decomposer.max_chunk_size()) {
                spread_split(job, decomposer, num_machines, rng)
            } else {
                vec![ChunkGene {
                    machine: rng.random_range(0..num_machines),
                    size: job.duration,
                    order: 0,
                }]
            };
            chromosome.insert(job.id, genes);
        }
        chromosome
    }

    /// Sets the chunks of a job, replacing any previous ones.
    pub fn insert(&mut self, job_id: JobId, genes: Vec<ChunkGene>) {
        self.genes.insert(job_id, genes);
    }

    /// Chunks of a job.
    pub fn genes(&self, job_id: JobId) -> Option<&[ChunkGene]> {
        self.genes.get(&job_id).map(Vec::as_slice)
    }

    /// Mutable chunks of a job.
    pub fn genes_mut(&mut self, job_id: JobId) -> Option<&mut Vec<ChunkGene>> {
        self.genes.get_mut(&job_id)
    }

    /// Iterates `(job_id, chunks)` in ascending job id.
    pub fn iter(&self) -> impl Iterator<Item = (JobId, &[ChunkGene])> {
        self.genes.iter().map(|(&id, genes)| (id, genes.as_slice()))
    }

    /// Number of jobs encoded.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether no job is encoded.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether the chromosome encodes a job.
    pub fn contains(&self, job_id: JobId) -> bool {
        self.genes.contains_key(&job_id)
    }
}

/// Balanced split of an oversized job with a machine spread.
///
/// Sizes come from the decomposer; machines cycle over a shuffled fleet
/// so sibling chunks land on different machines first.
pub fn spread_split<R: Rng + ?Sized>(
    job: &Job,
    decomposer: &TaskDecomposer,
    num_machines: usize,
    rng: &mut R,
) -> Vec<ChunkGene> {
    let mut machines: Vec<MachineId> = (0..num_machines.max(1)).collect();
    machines.shuffle(rng);

    decomposer
        .split_job(job)
        .into_iter()
        .enumerate()
        .map(|(order, size)| ChunkGene {
            machine: machines[order % machines.len()],
            size,
            order,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new(1, "Small", 4),
            Job::new(2, "Split", 12).with_dependency(1),
            Job::new(3, "Long", 40),
        ]
    }

    #[test]
    fn test_random_chromosome_is_consistent() {
        let jobs = sample_jobs();
        let order: Vec<&Job> = jobs.iter().collect();
        let decomposer = TaskDecomposer::new(5);
        let mut rng = SmallRng::seed_from_u64(42);

        let ch = Chromosome::random(&order, &decomposer, 3, &mut rng);
        assert_eq!(ch.len(), 3);
        for job in &jobs {
            let genes = ch.genes(job.id).unwrap();
            assert_eq!(genes.iter().map(|g| g.size).sum::<u32>(), job.duration);
            assert!(genes.iter().all(|g| g.size <= 5 && g.machine < 3));
        }
        assert_eq!(ch.genes(1).unwrap().len(), 1);
        assert_eq!(ch.genes(3).unwrap().len(), 8);
    }

    #[test]
    fn test_spread_split_uses_every_machine() {
        let job = Job::new(1, "Split", 15);
        let decomposer = TaskDecomposer::new(5);
        let mut rng = SmallRng::seed_from_u64(7);

        let genes = spread_split(&job, &decomposer, 3, &mut rng);
        assert_eq!(genes.len(), 3);
        let machines: HashSet<MachineId> = genes.iter().map(|g| g.machine).collect();
        assert_eq!(machines.len(), 3);
        let orders: Vec<usize> = genes.iter().map(|g| g.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_spread_split_cycles_machines() {
        let job = Job::new(1, "Split", 20);
        let decomposer = TaskDecomposer::new(5);
        let mut rng = SmallRng::seed_from_u64(3);

        let genes = spread_split(&job, &decomposer, 3, &mut rng);
        assert_eq!(genes.len(), 4);
        assert_eq!(genes[0].machine, genes[3].machine);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut ch = Chromosome::new();
        assert!(ch.is_empty());
        ch.insert(
            5,
            vec![ChunkGene {
                machine: 2,
                size: 3,
                order: 0,
            }],
        );
        assert!(ch.contains(5));
        assert_eq!(ch.genes(5).unwrap()[0].machine, 2);
        ch.genes_mut(5).unwrap()[0].machine = 1;
        assert_eq!(ch.genes(5).unwrap()[0].machine, 1);
        assert_eq!(ch.genes(5).map(<[ChunkGene]>::len), Some(1));
        assert!(ch.genes(6).is_none());
    }
}
