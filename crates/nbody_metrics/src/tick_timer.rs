//! Wall-clock timing of simulation ticks

use std::time::{Duration, Instant};

use super::rolling_window::RollingWindow;

/// Rolling timing of whole ticks plus the pair-interaction throughput they
/// achieved.
pub struct TickTimer {
    tick_start: Instant,
    tick_times: RollingWindow<Duration>,
    pair_rates: RollingWindow<f64>,
}

impl TickTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            tick_start: Instant::now(),
            tick_times: RollingWindow::new(capacity),
            pair_rates: RollingWindow::new(capacity),
        }
    }

    pub fn begin(&mut self) {
        self.tick_start = Instant::now();
    }

    /// Close the current tick, which advanced `particles` bodies.
    pub fn end(&mut self, particles: usize) {
        self.record(self.tick_start.elapsed(), particles);
    }

    /// Record a tick that took `elapsed` over `particles` bodies.
    pub fn record(&mut self, elapsed: Duration, particles: usize) {
        self.tick_times.push(elapsed);

        let pairs = particles.saturating_mul(particles.saturating_sub(1)) as f64;
        let secs = elapsed.as_secs_f64();
        self.pair_rates.push(if secs > 0.0 { pairs / secs } else { 0.0 });
    }

    pub fn ticks_per_second(&self) -> f64 {
        let avg = self.tick_times.average();
        if avg.as_secs_f64() > 0.0 {
            1.0 / avg.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn tick_time_ms(&self) -> f64 {
        self.tick_times.average().as_secs_f64() * 1000.0
    }

    pub fn tick_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.tick_times.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }

    /// Ordered pair interactions evaluated per second, rolling average.
    pub fn pair_interactions_per_second(&self) -> f64 {
        self.pair_rates.average()
    }
}
