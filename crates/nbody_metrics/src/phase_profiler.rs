//! Accumulated time per named tick phase

use std::time::{Duration, Instant};

pub struct PhaseProfiler {
    timings: Vec<(&'static str, Duration)>,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self {
            timings: Vec::new(),
        }
    }

    pub fn time_phase<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        match self.timings.iter_mut().find(|(phase, _)| *phase == name) {
            Some((_, total)) => *total += elapsed,
            None => self.timings.push((name, elapsed)),
        }
        result
    }

    pub fn get_timing(&self, name: &str) -> Duration {
        self.timings
            .iter()
            .find(|(phase, _)| *phase == name)
            .map(|(_, total)| *total)
            .unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    /// Phases in the order they were first timed.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.timings.iter().copied()
    }
}

impl Default for PhaseProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_accumulate() {
        let mut profiler = PhaseProfiler::new();
        let value = profiler.time_phase("kernel", || 7);
        profiler.time_phase("copy_back", || ());
        profiler.time_phase("kernel", || std::thread::sleep(Duration::from_millis(1)));

        assert_eq!(value, 7);
        assert!(profiler.get_timing("kernel") >= Duration::from_millis(1));
        let names: Vec<_> = profiler.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["kernel", "copy_back"]);

        profiler.reset();
        assert_eq!(profiler.get_timing("kernel"), Duration::ZERO);
    }
}
