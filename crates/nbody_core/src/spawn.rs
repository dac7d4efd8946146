//! Initial conditions for a new particle group
//!
//! A [`SpawnSpec`] is a declarative description of a group. [`sample`] turns
//! it into concrete positions, velocities and masses using a generator seeded
//! from the spec alone, so the same spec always yields the same group no
//! matter what else has been spawned before it.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::math::{scale_and_offset, UP};

/// Smallest mass a sampled particle can receive.
pub const MIN_MASS: f64 = 0.1;
/// Largest mass a sampled particle can receive.
pub const MAX_MASS: f64 = 100.0;

/// Declarative parameters for procedurally generating one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnSpec {
    pub number_of_particles: usize,
    pub center: DVec3,
    pub radius: f64,
    /// Per-axis stretch applied to the unit-sphere draw.
    pub shape_elipsoid: DVec3,
    pub turbulence_strength: f64,
    pub turbulence_elipsoid: DVec3,
    /// Scale of the `up x position` rotational velocity.
    pub angular_velocity: f64,
    pub seed: u64,
}

impl Default for SpawnSpec {
    fn default() -> Self {
        Self {
            number_of_particles: 1000,
            center: DVec3::ZERO,
            radius: 30.0,
            shape_elipsoid: DVec3::ONE,
            turbulence_strength: 0.0,
            turbulence_elipsoid: DVec3::ONE,
            angular_velocity: 0.004,
            seed: 0,
        }
    }
}

/// Concrete per-particle state produced from a [`SpawnSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledGroup {
    pub positions: Vec<DVec3>,
    pub velocities: Vec<DVec3>,
    pub masses: Vec<f64>,
}

impl SampledGroup {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate the initial state of every particle in `spec`.
///
/// Draw order per particle is fixed: position, turbulence, mass.
pub fn sample(spec: &SpawnSpec) -> SampledGroup {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let n = spec.number_of_particles;

    let mut group = SampledGroup {
        positions: Vec::with_capacity(n),
        velocities: Vec::with_capacity(n),
        masses: Vec::with_capacity(n),
    };

    for _ in 0..n {
        let position = ellipsoid_random(&mut rng, spec.shape_elipsoid, spec.center, spec.radius);

        // Raw position, not the offset from the group center.
        let spin = spec.angular_velocity * UP.cross(position);
        let turbulence = ellipsoid_random(
            &mut rng,
            spec.turbulence_elipsoid,
            DVec3::ZERO,
            spec.turbulence_strength,
        );

        let mass = rng.random_range(MIN_MASS..=MAX_MASS);

        group.positions.push(position);
        group.velocities.push(spin + turbulence);
        group.masses.push(mass);
    }

    group
}

/// Uniform point inside the unit sphere, by rejection from the enclosing cube.
pub fn inside_unit_sphere<R: Rng>(rng: &mut R) -> DVec3 {
    loop {
        let candidate = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}

/// Point inside the unit sphere, scaled by `radius`, stretched by `shape`
/// and moved to `center`.
pub fn ellipsoid_random<R: Rng>(
    rng: &mut R,
    shape: DVec3,
    center: DVec3,
    radius: f64,
) -> DVec3 {
    scale_and_offset(radius * inside_unit_sphere(rng), shape, center)
}
