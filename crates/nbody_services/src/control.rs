//! Control-command queue
//!
//! Requests to add or remove groups can arrive at any time, but membership
//! only changes between ticks. The queue collects them and the runtime drains
//! it into the simulation once per loop iteration.

use std::collections::VecDeque;

use nbody_core::{
    CommandOutcome, ControlCommand, GroupHandle, Simulation, SimulationError, SpawnSpec,
};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ControlQueue {
    pending: VecDeque<ControlCommand>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command, returning its position in the next drain.
    pub fn push(&mut self, command: ControlCommand) -> usize {
        debug!(?command, "control command queued");
        self.pending.push_back(command);
        self.pending.len() - 1
    }

    pub fn add_group(&mut self, spec: SpawnSpec) -> usize {
        self.push(ControlCommand::AddGroup(spec))
    }

    pub fn add_preset(&mut self, name: impl Into<String>) -> usize {
        self.push(ControlCommand::AddPreset(name.into()))
    }

    pub fn remove_group(&mut self, handle: GroupHandle) -> usize {
        self.push(ControlCommand::RemoveGroup(handle))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending command in arrival order.
    ///
    /// Results line up with the positions returned by `push`. A rejected
    /// command is logged and does not stop the ones after it.
    pub fn apply_all(
        &mut self,
        simulation: &mut Simulation,
    ) -> Vec<Result<CommandOutcome, SimulationError>> {
        self.pending
            .drain(..)
            .map(|command| {
                let result = simulation.apply(command);
                if let Err(err) = &result {
                    warn!(error = %err, "control command rejected");
                }
                result
            })
            .collect()
    }
}
