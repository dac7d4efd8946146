//! Single-precision particle vertices and the headless frame sink

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use nbody_core::math::to_f32_array;
use nbody_core::{FrameSink, FrameView};
use tracing::trace;

use crate::palette::{particle_color, Palette};

/// One particle as uploaded to a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Frame sink that builds the vertex snapshot every tick without drawing it.
///
/// Keeps the latest vertices and their bounding box so a headless run can
/// report what a renderer would have shown.
pub struct HeadlessSink {
    palette: Palette,
    vertices: Vec<ParticleVertex>,
    frames_presented: u64,
    last_tick: u64,
    bounds: Option<(Vec3, Vec3)>,
}

impl HeadlessSink {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            vertices: Vec::new(),
            frames_presented: 0,
            last_tick: 0,
            bounds: None,
        }
    }

    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// The vertex snapshot as raw bytes, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    /// Axis-aligned `(min, max)` of the last frame, `None` when it was empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }
}

impl FrameSink for HeadlessSink {
    fn present(&mut self, frame: &FrameView<'_>) {
        self.vertices.clear();
        self.vertices.extend(
            frame
                .positions
                .iter()
                .zip(frame.masses)
                .map(|(&position, &mass)| ParticleVertex {
                    position: to_f32_array(position),
                    color: particle_color(&self.palette, mass),
                }),
        );

        self.bounds = self.vertices.iter().fold(None, |bounds, vertex| {
            let p = Vec3::from_array(vertex.position);
            Some(match bounds {
                None => (p, p),
                Some((min, max)) => (min.min(p), max.max(p)),
            })
        });

        self.frames_presented += 1;
        self.last_tick = frame.tick;
        trace!(tick = frame.tick, vertices = self.vertices.len(), "frame presented");
    }
}
