// mod.rs - Particle store exports

mod column;
mod error;
mod particle_store;

pub use column::Column;
pub use error::StoreError;
pub use particle_store::{KernelViews, ParticleStore};
