//! Chunk placement shared by the greedy scheduler and the evaluator.
//!
//! A chunk starts at `max(ready, machine.busy_until)` and runs for its
//! size. Finishing past machine capacity records a [`CapacityViolation`]
//! but never blocks placement.

use crate::models::{CapacityViolation, Job, JobId, Machine, MachineId, PlacedChunk, Schedule};

/// Final state of a simulation.
#[derive(Debug, Clone)]
pub(crate) struct SimulationOutcome {
    pub schedule: Schedule,
    pub violations: Vec<CapacityViolation>,
    pub machines: Vec<Machine>,
}

/// Running placement state over a machine fleet.
#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    machines: Vec<Machine>,
    schedule: Schedule,
    violations: Vec<CapacityViolation>,
}

impl Simulation {
    pub fn new(machines: Vec<Machine>) -> Self {
        let schedule = Schedule::with_machines(machines.len());
        Self {
            machines,
            schedule,
            violations: Vec::new(),
        }
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Machine with the smallest `busy_until`, lowest index on ties.
    pub fn least_loaded(&self) -> MachineId {
        self.machines
            .iter()
            .min_by_key(|m| (m.busy_until, m.id))
            .map_or(0, |m| m.id)
    }

    /// Latest end among the placed chunks of `job_id`.
    pub fn completion_time(&self, job_id: JobId) -> Option<u32> {
        self.schedule.job_completion_time(job_id)
    }

    /// Places one chunk and returns its `(start, end)`.
    ///
    /// `machine` must be a fleet index.
    pub fn place(
        &mut self,
        job: &Job,
        machine: MachineId,
        ready: u32,
        size: u32,
        index: usize,
        total: usize,
    ) -> (u32, u32) {
        let m = &mut self.machines[machine];
        let (start, end) = m.occupy(ready, size);

        if let Some(exceeded_by) = m.overrun(end) {
            self.violations.push(CapacityViolation {
                job_id: job.id,
                job_name: job.name.clone(),
                machine,
                chunk_size: size,
                start,
                end,
                exceeded_by,
            });
        }

        self.schedule.push(PlacedChunk {
            job_id: job.id,
            machine,
            start,
            end,
            size,
            index,
            total,
        });

        (start, end)
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn finish(self) -> SimulationOutcome {
        SimulationOutcome {
            schedule: self.schedule,
            violations: self.violations,
            machines: self.machines,
        }
    }
}
