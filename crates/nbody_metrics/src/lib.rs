//! N-body metrics - tick timing and phase profiling
//!
//! Instrumentation for the simulation loop that completely vanishes when the
//! `metrics` feature is off.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use nbody_metrics::TickTimer;
//!
//! let mut timer = TickTimer::new(60); // Track last 60 ticks
//! timer.begin();
//! // ... advance the simulation ...
//! timer.end(particle_count);
//! println!("ticks/s: {:.1}", timer.ticks_per_second());
//! ```

#[cfg(feature = "metrics")]
mod phase_profiler;
#[cfg(feature = "metrics")]
mod rolling_window;
#[cfg(feature = "metrics")]
mod tick_timer;

#[cfg(feature = "metrics")]
pub use phase_profiler::PhaseProfiler;
#[cfg(feature = "metrics")]
pub use rolling_window::RollingWindow;
#[cfg(feature = "metrics")]
pub use tick_timer::TickTimer;

/// Whether instrumentation is compiled in.
pub const ENABLED: bool = cfg!(feature = "metrics");

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct TickTimer;

#[cfg(not(feature = "metrics"))]
impl TickTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self, _particles: usize) {}
    pub fn record(&mut self, _elapsed: std::time::Duration, _particles: usize) {}
    pub fn ticks_per_second(&self) -> f64 { 0.0 }
    pub fn tick_time_ms(&self) -> f64 { 0.0 }
    pub fn tick_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
    pub fn pair_interactions_per_second(&self) -> f64 { 0.0 }
}

#[cfg(not(feature = "metrics"))]
pub struct RollingWindow<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RollingWindow<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn latest(&self) -> Option<T> { None }
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
    pub fn average(&self) -> T where T: Default { T::default() }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct PhaseProfiler;

#[cfg(not(feature = "metrics"))]
impl PhaseProfiler {
    pub fn new() -> Self { Self }
    pub fn time_phase<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn get_timing(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn reset(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, std::time::Duration)> + '_ { std::iter::empty() }
}
