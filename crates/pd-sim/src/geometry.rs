//! Projection of the pendulum angle onto drawing coordinates.
//!
//! Pure geometry: nothing here touches the physics state.

/// Maps `(length, theta)` to coordinates with a pivot origin and a scale.
///
/// With `scale = 1` the output is in metres; renderers working in pixels pass
/// their pixels-per-metre factor instead of baking it into the model. The
/// y axis points up, so the bob hangs at `origin.1 - length` when `theta = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub origin: (f64, f64),
    pub scale: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            origin: (0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl Projection {
    pub fn new(origin_x: f64, origin_y: f64, scale: f64) -> Self {
        Self {
            origin: (origin_x, origin_y),
            scale,
        }
    }

    /// Bob position `(ox + s·l·sin θ, oy - s·l·cos θ)`.
    pub fn bob(&self, length: f64, theta: f64) -> (f64, f64) {
        let r = self.scale * length;
        (self.origin.0 + r * theta.sin(), self.origin.1 - r * theta.cos())
    }

    /// Pivot and bob, the two endpoints of the drawn rod.
    pub fn rod_segment(&self, length: f64, theta: f64) -> [(f64, f64); 2] {
        [self.origin, self.bob(length, theta)]
    }
}
