//! Slice Lines and Point-Line Duality
//!
//! A slice is an affine line L ⊂ ℝ² of non-negative slope. Restricting a
//! bipersistence module to L gives a one-parameter module whose barcode is
//! what the arrangement indexes.
//!
//! ```text
//!   primal:  L = { y = m·x − b }          dual:  (m, b)
//!   anchor (X, Y) on L   ⟺   b = X·m − Y
//! ```
//!
//! A point p is *pushed* onto L by moving it up (if on or below L) or right
//! (if above L) until it meets L. The one-parameter coordinate of the pushed
//! point is its arc length along L measured from the line x = 0, or its y
//! coordinate for vertical lines.

use serde::{Deserialize, Serialize};

/// A slice line of slope in [0, ∞].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SliceLine {
    /// y = slope·x + intercept
    Sloped { slope: f64, intercept: f64 },
    /// x = x
    Vertical { x: f64 },
}

impl SliceLine {
    /// Line through the dual point (m, b), i.e. y = m·x − b.
    pub fn from_dual(m: f64, b: f64) -> Self {
        SliceLine::Sloped { slope: m, intercept: -b }
    }

    /// Line with direction angle θ ∈ [0, π/2] (radians) at signed
    /// perpendicular distance `offset` from the origin.
    pub fn from_angle_offset(angle: f64, offset: f64) -> Self {
        let cos = angle.cos();
        if cos.abs() < 1e-12 {
            SliceLine::Vertical { x: -offset }
        } else {
            SliceLine::Sloped {
                slope: angle.tan(),
                intercept: offset / cos,
            }
        }
    }

    /// Dual coordinates (m, b); `None` for vertical lines.
    pub fn dual(&self) -> Option<(f64, f64)> {
        match *self {
            SliceLine::Sloped { slope, intercept } => Some((slope, -intercept)),
            SliceLine::Vertical { .. } => None,
        }
    }

    /// True when (x, y) lies strictly above the line, i.e. is pushed
    /// horizontally.
    pub fn is_above(&self, x: f64, y: f64) -> bool {
        match *self {
            SliceLine::Sloped { slope, intercept } => y > slope * x + intercept,
            SliceLine::Vertical { x: x0 } => x < x0,
        }
    }

    /// Least point of the line dominating (x, y), if any.
    pub fn push(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match *self {
            SliceLine::Sloped { slope, intercept } => {
                let on_line = slope * x + intercept;
                if y <= on_line {
                    Some((x, on_line))
                } else if slope > 0.0 {
                    Some(((y - intercept) / slope, y))
                } else {
                    None
                }
            }
            SliceLine::Vertical { x: x0 } => (x <= x0).then_some((x0, y)),
        }
    }

    /// Horizontal position of the pushed point; orders pushes along the line.
    pub fn push_key(&self, x: f64, y: f64) -> Option<f64> {
        self.push(x, y).map(|(u, v)| match self {
            SliceLine::Sloped { .. } => u,
            SliceLine::Vertical { .. } => v,
        })
    }

    /// One-parameter coordinate of the pushed point.
    pub fn coordinate(&self, x: f64, y: f64) -> Option<f64> {
        self.push(x, y).map(|(u, v)| match *self {
            SliceLine::Sloped { slope, .. } => u * (1.0 + slope * slope).sqrt(),
            SliceLine::Vertical { .. } => v,
        })
    }
}
