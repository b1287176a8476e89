//! Schedule quality metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest completion time |
//! | Machine time | makespan × machines |
//! | Efficiency | work / machine time, in percent |
//! | Idle time | machine time − work |
//! | Utilization | machine work / makespan, in percent |
//! | Load | machine work / capacity, in percent |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{JobId, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub makespan: u32,
    /// Work units placed across all machines.
    pub total_work: u32,
    /// makespan × number of machines.
    pub total_machine_time: f64,
    pub total_idle_time: f64,
    /// Percentage of machine time spent working.
    pub efficiency: f64,
    /// Work units per machine.
    pub machine_work: Vec<u32>,
    /// Per-machine work over makespan, in percent.
    pub machine_utilization: Vec<f64>,
    /// Per-machine work over capacity, in percent.
    pub machine_loads: Vec<f64>,
    /// Chunks placed per job.
    pub chunk_counts: BTreeMap<JobId, usize>,
}

impl ScheduleStats {
    /// Computes metrics for a schedule on machines of the given capacity.
    pub fn calculate(schedule: &Schedule, capacity: u32) -> Self {
        let makespan = schedule.makespan();
        let machines = schedule.machine_count();
        let machine_work: Vec<u32> = (0..machines).map(|m| schedule.machine_work(m)).collect();
        let total_work: u32 = machine_work.iter().sum();

        let total_machine_time = makespan as f64 * machines as f64;
        let efficiency = if total_machine_time > 0.0 {
            total_work as f64 / total_machine_time * 100.0
        } else {
            0.0
        };

        let machine_utilization = machine_work
            .iter()
            .map(|&w| {
                if makespan > 0 {
                    w as f64 / makespan as f64 * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        let machine_loads = machine_work
            .iter()
            .map(|&w| {
                if capacity > 0 {
                    w as f64 / capacity as f64 * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        Self {
            makespan,
            total_work,
            total_machine_time,
            total_idle_time: total_machine_time - total_work as f64,
            efficiency,
            machine_work,
            machine_utilization,
            machine_loads,
            chunk_counts: schedule.chunk_counts(),
        }
    }

    /// Whether every machine stays within `capacity` work units.
    pub fn within_capacity(&self, capacity: u32) -> bool {
        self.machine_work.iter().all(|&w| w <= capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlacedChunk;

    fn place(schedule: &mut Schedule, job_id: JobId, machine: usize, start: u32, end: u32) {
        schedule.push(PlacedChunk {
            job_id,
            machine,
            start,
            end,
            size: end - start,
            index: 1,
            total: 1,
        });
    }

    #[test]
    fn test_stats_basic() {
        let mut s = Schedule::with_machines(3);
        place(&mut s, 1, 0, 0, 10);
        place(&mut s, 2, 1, 0, 5);

        let stats = ScheduleStats::calculate(&s, 40);
        assert_eq!(stats.makespan, 10);
        assert_eq!(stats.total_work, 15);
        assert!((stats.total_machine_time - 30.0).abs() < 1e-10);
        assert!((stats.total_idle_time - 15.0).abs() < 1e-10);
        assert!((stats.efficiency - 50.0).abs() < 1e-10);
        assert!((stats.machine_utilization[0] - 100.0).abs() < 1e-10);
        assert!((stats.machine_utilization[1] - 50.0).abs() < 1e-10);
        assert!((stats.machine_utilization[2] - 0.0).abs() < 1e-10);
        assert!((stats.machine_loads[0] - 25.0).abs() < 1e-10);
        assert_eq!(stats.chunk_counts[&1], 1);
    }

    #[test]
    fn test_stats_empty() {
        let stats = ScheduleStats::calculate(&Schedule::with_machines(3), 40);
        assert_eq!(stats.makespan, 0);
        assert!((stats.efficiency - 0.0).abs() < 1e-10);
        assert_eq!(stats.machine_work, vec![0, 0, 0]);
        assert!(stats.within_capacity(40));
    }

    #[test]
    fn test_within_capacity() {
        let mut s = Schedule::with_machines(1);
        place(&mut s, 1, 0, 0, 41);
        assert!(!ScheduleStats::calculate(&s, 40).within_capacity(40));
    }
}
