//! N-body Simulation Core
//!
//! Contains the fundamental simulation pieces:
//! - Particle store (contiguous SoA buffers)
//! - Group registry (runtime conditions as index ranges)
//! - Seeded initial-condition sampler
//! - Direct-summation force/integration kernel
//! - Simulation driver, control commands and simulated time

pub mod command;
pub mod groups;
pub mod kernel;
pub mod math;
pub mod simulation;
pub mod spawn;
pub mod store;
pub mod time;

pub use glam;

pub use command::{CommandOutcome, ControlCommand};
pub use groups::{Group, GroupError, GroupHandle, GroupRegistry};
pub use kernel::KernelParams;
pub use simulation::{FrameSink, FrameView, Simulation, SimulationError};
pub use spawn::{SampledGroup, SpawnSpec};
pub use store::{ParticleStore, StoreError};
pub use time::SimulationTime;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
