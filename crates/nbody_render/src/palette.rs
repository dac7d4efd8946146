//! Piecewise-linear color palettes

use glam::Vec4;
use thiserror::Error;

/// Mass that maps to the top of the palette.
pub const MASS_COLOR_SCALE: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("a palette needs at least one color")]
    Empty,
}

/// Ordered list of RGBA stops, evenly spaced over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<Vec4>,
}

impl Palette {
    pub fn new(colors: &[[f32; 4]]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self {
            stops: colors.iter().map(|c| Vec4::from_array(*c)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Interpolated color at `value`, clamped to `[0, 1]`. Alpha is always 1.
    pub fn color_at(&self, value: f32) -> [f32; 4] {
        let last = self.stops.len() - 1;
        if last == 0 {
            return with_opaque_alpha(self.stops[0]);
        }

        let scaled = value.clamp(0.0, 1.0) * last as f32;
        let low = (scaled.floor() as usize).min(last - 1);
        let t = scaled - low as f32;
        with_opaque_alpha(self.stops[low].lerp(self.stops[low + 1], t))
    }
}

/// Display color of a particle: the palette color for `mass / 120`, halved and
/// lifted toward white.
pub fn particle_color(palette: &Palette, mass: f64) -> [f32; 4] {
    let base = Vec4::from_array(palette.color_at((mass / MASS_COLOR_SCALE) as f32));
    with_opaque_alpha(0.5 * base + Vec4::splat(0.5))
}

#[inline]
fn with_opaque_alpha(color: Vec4) -> [f32; 4] {
    color.truncate().extend(1.0).to_array()
}
