//! Detector-space to world-space landmark conversion.
//!
//! The detector reports landmarks as image fractions (origin top-left,
//! y growing downward). The renderer uses an orthographic frustum centered
//! on the viewport with y growing upward. The mapping here must stay
//! bit-compatible with the renderer's projection or the overlay misaligns.

use glam::Vec3;

/// World-space height the orthographic projection maps the full vertical
/// viewport extent onto. The renderer's camera is built from the same
/// constant (half-height `FRUSTUM_SIZE / 2`).
pub const FRUSTUM_SIZE: f32 = 2.0;

/// A single detector landmark: `x`/`y` as fractions of image width/height
/// in `[0, 1]`, `z` a relative depth in detector-defined units (0 when the
/// detector does not report depth).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<[f32; 3]> for Landmark {
    fn from(v: [f32; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

/// Render viewport dimensions in pixels. Both dimensions are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Create a viewport; returns `None` for zero dimensions.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Map a detector landmark into the renderer's world space.
///
/// `(0.5, 0.5)` maps to the viewport center; image y is flipped because
/// world y grows upward. Pure function, no failure modes.
pub fn normalize(landmark: Landmark, viewport: Viewport) -> Vec3 {
    let aspect = viewport.aspect();
    Vec3::new(
        (landmark.x - 0.5) * FRUSTUM_SIZE * aspect,
        -(landmark.y - 0.5) * FRUSTUM_SIZE,
        landmark.z,
    )
}

/// Inverse of [`normalize`]: recover detector-space fractions from a world
/// point and the viewport it was normalized against.
pub fn denormalize(point: Vec3, viewport: Viewport) -> Landmark {
    let aspect = viewport.aspect();
    Landmark {
        x: point.x / (FRUSTUM_SIZE * aspect) + 0.5,
        y: -point.y / FRUSTUM_SIZE + 0.5,
        z: point.z,
    }
}
