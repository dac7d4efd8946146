//! Direct-summation gravity and integration kernel
//!
//! For every particle `i`:
//!
//! ```text
//! a_i      = sum_{j != i} m_j (x_j - x_i) / (|x_j - x_i|^2 + eps)^1.5
//! v_i'     = v_i + dt * G * a_i
//! x_i'     = x_i + dt * v_i'
//! ```
//!
//! The new position goes to the staging buffer, never over the positions
//! other particles are still reading. Work is partitioned by particle index
//! across the rayon pool; each task owns exactly one velocity slot and one
//! staging slot.

use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::KernelViews;

/// Plummer softening added to the squared separation.
pub const SOFTENING: f64 = 0.01;
/// Simulated time advanced by one tick.
pub const TIMESTEP: f64 = 0.5;
/// Gravitational scale applied to the accumulated sum.
pub const GRAVITY: f64 = 1e-6;

/// Below this many particles per task rayon splitting costs more than it saves.
const MIN_PARTICLES_PER_TASK: usize = 64;

/// Constants of the force law and integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelParams {
    pub softening: f64,
    pub timestep: f64,
    pub gravity: f64,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            softening: SOFTENING,
            timestep: TIMESTEP,
            gravity: GRAVITY,
        }
    }
}

/// Mass-weighted, softened pull of particle `j` on particle `i`.
#[inline]
pub fn pair_term(position_i: DVec3, position_j: DVec3, mass_j: f64, softening: f64) -> DVec3 {
    let r = position_j - position_i;
    let r_sq = r.length_squared() + softening;
    mass_j * r / (r_sq * r_sq.sqrt())
}

/// Unscaled acceleration on particle `i` from every other particle.
pub fn acceleration_on(i: usize, positions: &[DVec3], masses: &[f64], softening: f64) -> DVec3 {
    let position_i = positions[i];
    positions
        .iter()
        .zip(masses)
        .enumerate()
        .filter(|&(j, _)| j != i)
        .fold(DVec3::ZERO, |acc, (_, (&position_j, &mass_j))| {
            acc + pair_term(position_i, position_j, mass_j, softening)
        })
}

/// Advance every particle by one timestep.
///
/// Reads `views.positions`/`views.masses`, updates `views.velocities` in
/// place and writes the result into `views.next_positions`.
pub fn step(params: &KernelParams, views: KernelViews<'_>) {
    let KernelViews {
        positions,
        masses,
        velocities,
        next_positions,
    } = views;

    debug_assert_eq!(positions.len(), masses.len());
    debug_assert_eq!(positions.len(), velocities.len());
    debug_assert_eq!(positions.len(), next_positions.len());

    let dt = params.timestep;
    let kick = params.timestep * params.gravity;
    let softening = params.softening;

    velocities
        .par_iter_mut()
        .zip(next_positions.par_iter_mut())
        .enumerate()
        .with_min_len(MIN_PARTICLES_PER_TASK)
        .for_each(|(i, (velocity, next_position))| {
            let acceleration = acceleration_on(i, positions, masses, softening);
            *velocity += kick * acceleration;
            *next_position = positions[i] + dt * *velocity;
        });
}
