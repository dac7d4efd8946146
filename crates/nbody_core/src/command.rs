//! Membership changes requested from outside the tick loop

use crate::groups::{Group, GroupHandle};
use crate::spawn::SpawnSpec;

/// A single request to add or remove particles.
///
/// Commands are applied strictly between ticks through
/// [`Simulation::apply`](crate::Simulation::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Realize a spec as a new group.
    AddGroup(SpawnSpec),
    /// Realize a named preset from the simulation's catalog.
    AddPreset(String),
    RemoveGroup(GroupHandle),
}

/// What an applied command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Added(GroupHandle),
    /// The group as it was right before removal.
    Removed(Group),
}
