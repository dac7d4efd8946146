// simulation.rs - Driver that owns every particle buffer and advances ticks

use glam::DVec3;
use nbody_metrics::PhaseProfiler;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::command::{CommandOutcome, ControlCommand};
use crate::groups::{Group, GroupError, GroupHandle, GroupRegistry};
use crate::kernel::{self, KernelParams};
use crate::spawn::{self, SpawnSpec};
use crate::store::{ParticleStore, StoreError};
use crate::time::SimulationTime;

/// Errors surfaced by the driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error("no preset named '{name}'")]
    UnknownPreset { name: String },
}

/// Read-only snapshot handed to presentation after a tick.
///
/// The borrow ties the view to the simulation, so it cannot outlive the
/// start of the next tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub tick: u64,
    pub positions: &'a [DVec3],
    pub masses: &'a [f64],
}

impl FrameView<'_> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Consumer of per-tick frames (renderer, recorder, ...).
pub trait FrameSink {
    fn present(&mut self, frame: &FrameView<'_>);
}

/// The single simulation instance.
///
/// Constructed once by the process entry point and passed by reference to
/// anything that needs it. Membership changes and ticks both take
/// `&mut self`, so they can never overlap.
pub struct Simulation {
    store: ParticleStore,
    groups: GroupRegistry,
    presets: Vec<(String, SpawnSpec)>,
    params: KernelParams,
    time: SimulationTime,
    profiler: PhaseProfiler,
    released: bool,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_params(KernelParams::default())
    }

    pub fn with_params(params: KernelParams) -> Self {
        debug!(?params, "simulation created");
        Self {
            store: ParticleStore::new(),
            groups: GroupRegistry::new(),
            presets: Vec::new(),
            params,
            time: SimulationTime::new(),
            profiler: PhaseProfiler::new(),
            released: false,
        }
    }

    /// Make `spec` available to [`ControlCommand::AddPreset`] under `name`,
    /// replacing any preset of the same name.
    pub fn register_preset(&mut self, name: impl Into<String>, spec: SpawnSpec) {
        let name = name.into();
        match self.presets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.presets.push((name, spec)),
        }
    }

    pub fn preset(&self, name: &str) -> Option<&SpawnSpec> {
        self.presets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    /// Sample `spec` and append it as a new group after every existing particle.
    pub fn add_group(&mut self, spec: SpawnSpec) -> Result<GroupHandle, SimulationError> {
        let sampled = spawn::sample(&spec);
        self.insert_sampled(spec, &sampled)
    }

    /// Add several groups at once, in order, with consecutive ranges.
    ///
    /// Sampling runs in parallel; every spec uses its own generator so the
    /// result matches adding them one by one.
    pub fn add_groups<I>(&mut self, specs: I) -> Result<Vec<GroupHandle>, SimulationError>
    where
        I: IntoIterator<Item = SpawnSpec>,
    {
        let specs: Vec<SpawnSpec> = specs.into_iter().collect();
        let sampled: Vec<_> = specs.par_iter().map(spawn::sample).collect();

        specs
            .into_iter()
            .zip(&sampled)
            .map(|(spec, group)| self.insert_sampled(spec, group))
            .collect()
    }

    /// Remove a group's particles and shift every later group down.
    ///
    /// A stale handle leaves every buffer untouched.
    pub fn remove_group(&mut self, handle: GroupHandle) -> Result<Group, SimulationError> {
        let (start, count) = self
            .groups
            .get(handle)
            .map(|group| (group.start(), group.count()))
            .ok_or(GroupError::UnknownGroup { handle })?;

        self.store.remove_range(start, count)?;
        let removed = self.groups.unregister(handle)?;

        info!(
            %handle,
            start,
            count,
            remaining = self.store.len(),
            "group removed"
        );
        Ok(removed)
    }

    /// Execute one control command.
    pub fn apply(&mut self, command: ControlCommand) -> Result<CommandOutcome, SimulationError> {
        match command {
            ControlCommand::AddGroup(spec) => self.add_group(spec).map(CommandOutcome::Added),
            ControlCommand::AddPreset(name) => {
                let spec = self
                    .preset(&name)
                    .cloned()
                    .ok_or(SimulationError::UnknownPreset { name })?;
                self.add_group(spec).map(CommandOutcome::Added)
            }
            ControlCommand::RemoveGroup(handle) => {
                self.remove_group(handle).map(CommandOutcome::Removed)
            }
        }
    }

    /// Advance one timestep and return the frame to present.
    ///
    /// 1. copy the previous tick's staged positions into the live buffer
    /// 2. run the kernel over every particle
    /// 3. hand out positions and masses, read-only
    pub fn tick(&mut self) -> FrameView<'_> {
        let store = &mut self.store;
        self.profiler
            .time_phase("copy_back", || store.commit_next_positions());

        let params = self.params;
        self.profiler
            .time_phase("kernel", || kernel::step(&params, store.kernel_views()));

        self.time.advance_tick(self.params.timestep);
        trace!(
            tick = self.time.tick_count(),
            particles = self.store.len(),
            "tick complete"
        );

        self.frame()
    }

    /// The current live positions and masses without advancing.
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            tick: self.time.tick_count(),
            positions: self.store.positions(),
            masses: self.store.masses(),
        }
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    /// Live groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn group(&self, handle: GroupHandle) -> Option<&Group> {
        self.groups.get(handle)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn time(&self) -> SimulationTime {
        self.time
    }

    pub fn profiler(&self) -> &PhaseProfiler {
        &self.profiler
    }

    pub fn total_mass(&self) -> f64 {
        self.store.masses().iter().sum()
    }

    /// Mass-weighted mean of the live positions, or the origin when empty.
    pub fn center_of_mass(&self) -> DVec3 {
        let total = self.total_mass();
        if total == 0.0 {
            return DVec3::ZERO;
        }

        let weighted = self
            .store
            .positions()
            .iter()
            .zip(self.store.masses())
            .fold(DVec3::ZERO, |acc, (&p, &m)| acc + m * p);
        weighted / total
    }

    /// Tear the simulation down, releasing every buffer.
    pub fn shutdown(mut self) {
        info!(
            ticks = self.time.tick_count(),
            elapsed = self.time.elapsed(),
            particles = self.store.len(),
            groups = self.groups.len(),
            "simulation shutting down"
        );
        for (phase, total) in self.profiler.iter() {
            info!(phase, total_ms = total.as_secs_f64() * 1000.0, "phase time");
        }
        self.release_buffers();
    }

    fn insert_sampled(
        &mut self,
        spec: SpawnSpec,
        sampled: &spawn::SampledGroup,
    ) -> Result<GroupHandle, SimulationError> {
        let range = self.store.append(sampled)?;
        let (start, count) = (range.start, range.len());
        let handle = self.groups.register(spec, start, count);

        info!(%handle, start, count, total = self.store.len(), "group added");
        Ok(handle)
    }

    fn release_buffers(&mut self) {
        if self.released {
            return;
        }
        self.store.release();
        self.released = true;
        debug!("particle buffers released");
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.release_buffers();
    }
}
