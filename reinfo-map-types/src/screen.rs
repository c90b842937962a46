//! Screen space primitives.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Position on the map canvas in pixels from the top-left corner.
pub type ScreenPoint = Point2<f64>;

/// Axis aligned rectangle in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Left edge.
    pub x_min: f64,
    /// Top edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_max: f64,
}

impl ScreenRect {
    /// Creates a rectangle from two opposite corners given in any order.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min: x_min.min(x_max),
            y_min: y_min.min(y_max),
            x_max: x_min.max(x_max),
            y_max: y_min.max(y_max),
        }
    }

    /// Square of `2 * half_size` pixels centered at `center`.
    pub fn around(center: ScreenPoint, half_size: f64) -> Self {
        Self::new(
            center.x - half_size,
            center.y - half_size,
            center.x + half_size,
            center.y + half_size,
        )
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns `true` if the point is inside the rectangle. Edges are inclusive.
    pub fn contains(&self, point: &ScreenPoint) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }
}
