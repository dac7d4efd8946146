//! Double-precision math utilities
//!
//! Re-exports glam with the helpers the sampler and kernel share

pub use glam::*;

/// Rotation axis used when imparting angular velocity to a spawned group.
pub const UP: DVec3 = DVec3::Y;

/// Component-wise scale followed by a translation.
///
/// Used to stretch a point drawn inside the unit sphere into an ellipsoid.
#[inline]
pub fn scale_and_offset(point: DVec3, scale: DVec3, offset: DVec3) -> DVec3 {
    point * scale + offset
}

/// Narrow a double-precision vector for single-precision consumers.
#[inline]
pub fn to_f32_array(v: DVec3) -> [f32; 3] {
    v.as_vec3().to_array()
}
