//! N-body Render Boundary
//!
//! The simulation works in double precision; anything that draws particles
//! consumes single-precision vertices. This crate owns that conversion and the
//! mass-to-color mapping, plus a headless frame sink for runs without a window.

pub mod frame;
pub mod palette;

pub use frame::{HeadlessSink, ParticleVertex};
pub use palette::{particle_color, Palette, PaletteError, MASS_COLOR_SCALE};
