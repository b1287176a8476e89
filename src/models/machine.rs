//! Machine model and the fixed fleet configuration.

use serde::{Deserialize, Serialize};

/// Machine index into the fleet (0-based).
pub type MachineId = usize;

/// Number of identical machines.
pub const NUM_MACHINES: usize = 3;
/// Per-machine capacity in time units.
pub const MACHINE_CAPACITY: u32 = 40;
/// Largest chunk a job may be executed in.
pub const MAX_CHUNK_SIZE: u32 = 5;
/// Combined capacity of the fleet.
pub const TOTAL_CAPACITY: u32 = MACHINE_CAPACITY * NUM_MACHINES as u32;

/// A machine with its running simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Fleet index.
    pub id: MachineId,
    /// Capacity in time units. Finishing past it is a violation, not a block.
    pub capacity: u32,
    /// Time at which the machine becomes free.
    pub busy_until: u32,
    /// Sum of chunk sizes placed on this machine.
    pub work: u32,
}

impl Machine {
    /// Creates an idle machine.
    pub fn new(id: MachineId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            busy_until: 0,
            work: 0,
        }
    }

    /// The fixed fleet: [`NUM_MACHINES`] machines of [`MACHINE_CAPACITY`].
    pub fn fleet() -> Vec<Machine> {
        (0..NUM_MACHINES)
            .map(|id| Machine::new(id, MACHINE_CAPACITY))
            .collect()
    }

    /// Occupies the machine with `size` units, starting no earlier than `ready`.
    ///
    /// Returns `(start, end)`.
    pub fn occupy(&mut self, ready: u32, size: u32) -> (u32, u32) {
        let start = ready.max(self.busy_until);
        let end = start + size;
        self.busy_until = end;
        self.work += size;
        (start, end)
    }

    /// Amount by which `end` overruns capacity, if it does.
    #[inline]
    pub fn overrun(&self, end: u32) -> Option<u32> {
        (end > self.capacity).then(|| end - self.capacity)
    }

    /// Work divided by busy time (busy time floored at 1).
    pub fn utilization(&self) -> f64 {
        self.work as f64 / self.busy_until.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet() {
        let fleet = Machine::fleet();
        assert_eq!(fleet.len(), NUM_MACHINES);
        assert!(fleet.iter().all(|m| m.capacity == MACHINE_CAPACITY));
        assert_eq!(TOTAL_CAPACITY, 120);
    }

    #[test]
    fn test_occupy_waits_for_busy_until() {
        let mut m = Machine::new(0, 40);
        assert_eq!(m.occupy(0, 5), (0, 5));
        assert_eq!(m.occupy(2, 3), (5, 8));
        assert_eq!(m.occupy(10, 1), (10, 11));
        assert_eq!(m.busy_until, 11);
        assert_eq!(m.work, 9);
    }

    #[test]
    fn test_overrun() {
        let m = Machine::new(0, 40);
        assert_eq!(m.overrun(40), None);
        assert_eq!(m.overrun(43), Some(3));
    }

    #[test]
    fn test_utilization() {
        let mut m = Machine::new(0, 40);
        assert!((m.utilization() - 0.0).abs() < 1e-10);
        m.occupy(5, 5);
        assert!((m.utilization() - 0.5).abs() < 1e-10);
    }
}
