//! Simulated time
//!
//! One tick advances the simulation by a fixed timestep. Time here is in
//! simulation units, not wall-clock time.

/// Simulation time tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationTime {
    tick_count: u64,
    elapsed: f64,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            elapsed: 0.0,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Record one completed tick of length `timestep`.
    pub fn advance_tick(&mut self, timestep: f64) {
        self.tick_count += 1;
        self.elapsed += timestep;
    }

    /// Total simulated time.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}
