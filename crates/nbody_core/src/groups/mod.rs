//! Runtime groups of particles.
//!
//! Every realized [`SpawnSpec`](crate::SpawnSpec) becomes one [`Group`]: a
//! contiguous, half-open index range inside the particle store. The registry
//! keeps groups in registration order and is the only writer of their ranges.

mod group_error;
mod group_handle;
mod registry;

pub use group_error::GroupError;
pub use group_handle::GroupHandle;
pub use registry::{Group, GroupRegistry};
