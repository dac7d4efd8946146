// runner.rs - Owns the simulation for the lifetime of the process and drives ticks

use anyhow::{Context, Result};
use nbody_core::glam::DVec3;
use nbody_core::{CommandOutcome, FrameSink, GroupHandle, Simulation};
use nbody_metrics::TickTimer;
use nbody_services::{ControlQueue, RunSettings, Settings};
use tracing::info;

/// Ticks averaged by the timer.
const TIMER_WINDOW: usize = 60;

/// Final statistics of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub particles: usize,
    pub groups: usize,
    pub frames_presented: u64,
    pub center_of_mass: DVec3,
}

/// The startup group that `toggle_every` switches on and off.
struct ToggledGroup {
    preset: String,
    handle: Option<GroupHandle>,
    /// Queue position of the pending toggle, if one is queued.
    pending: Option<usize>,
}

pub struct Runner<S: FrameSink> {
    simulation: Simulation,
    queue: ControlQueue,
    sink: S,
    timer: TickTimer,
    run: RunSettings,
    toggled: Option<ToggledGroup>,
    frames_presented: u64,
}

impl<S: FrameSink> Runner<S> {
    /// Build the simulation and realize every startup preset.
    pub fn new(settings: &Settings, sink: S) -> Result<Self> {
        let mut simulation = Simulation::with_params(settings.kernel);
        settings.install_presets(&mut simulation);

        let specs = settings
            .startup_specs()
            .context("startup names an unknown preset")?;
        let handles = simulation.add_groups(specs)?;
        info!(
            groups = handles.len(),
            particles = simulation.particle_count(),
            "startup groups realized"
        );

        let toggled = settings
            .startup
            .first()
            .zip(handles.first())
            .map(|(preset, &handle)| ToggledGroup {
                preset: preset.clone(),
                handle: Some(handle),
                pending: None,
            });

        Ok(Self {
            simulation,
            queue: ControlQueue::new(),
            sink,
            timer: TickTimer::new(TIMER_WINDOW),
            run: settings.run,
            toggled,
            frames_presented: 0,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run the configured number of ticks.
    pub fn run(&mut self) {
        info!(ticks = self.run.ticks, "tick loop starting");
        for _ in 0..self.run.ticks {
            self.step();
        }
    }

    /// Apply pending commands, advance one tick and present the frame.
    pub fn step(&mut self) {
        self.apply_pending();

        self.timer.begin();
        let frame = self.simulation.tick();
        self.sink.present(&frame);
        self.frames_presented += 1;
        self.timer.end(self.simulation.particle_count());

        let tick = self.simulation.time().tick_count();
        if self.run.log_every > 0 && tick % self.run.log_every == 0 {
            self.log_stats(tick);
        }
        if self.run.toggle_every > 0 && tick % self.run.toggle_every == 0 {
            self.queue_toggle();
        }
    }

    /// Shut the simulation down and report what the run ended with.
    pub fn finish(self) -> RunSummary {
        let summary = RunSummary {
            ticks: self.simulation.time().tick_count(),
            particles: self.simulation.particle_count(),
            groups: self.simulation.group_count(),
            frames_presented: self.frames_presented,
            center_of_mass: self.simulation.center_of_mass(),
        };
        self.simulation.shutdown();
        summary
    }

    fn apply_pending(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let results = self.queue.apply_all(&mut self.simulation);
        let Some(toggled) = self.toggled.as_mut() else {
            return;
        };
        let Some(slot) = toggled.pending.take() else {
            return;
        };

        match results.get(slot) {
            Some(Ok(CommandOutcome::Added(handle))) => toggled.handle = Some(*handle),
            Some(Ok(CommandOutcome::Removed(_))) => toggled.handle = None,
            // The group was removed elsewhere; re-add on the next toggle.
            Some(Err(_)) => toggled.handle = None,
            None => {}
        }
    }

    fn queue_toggle(&mut self) {
        let Some(toggled) = self.toggled.as_mut() else {
            return;
        };
        if toggled.pending.is_some() {
            return;
        }

        let slot = match toggled.handle {
            Some(handle) => self.queue.remove_group(handle),
            None => self.queue.add_preset(toggled.preset.clone()),
        };
        toggled.pending = Some(slot);
    }

    fn log_stats(&self, tick: u64) {
        let com = self.simulation.center_of_mass();
        info!(
            tick,
            particles = self.simulation.particle_count(),
            groups = self.simulation.group_count(),
            ms_per_tick = self.timer.tick_time_ms(),
            ticks_per_sec = self.timer.ticks_per_second(),
            pairs_per_sec = self.timer.pair_interactions_per_second(),
            total_mass = self.simulation.total_mass(),
            com_x = com.x,
            com_y = com.y,
            com_z = com.z,
            "tick stats"
        );
    }
}
