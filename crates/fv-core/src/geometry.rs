//! Geometry primitives for pixel space and the millimeter world space

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Center point of the rectangle
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether width and height are both strictly positive
    pub fn has_positive_extent(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }
}

/// Placement of one full scanned image in millimeter world space
///
/// The viewer places the whole uncropped scan; `x`/`y` are the world
/// coordinates of the image origin and `width` its full width in millimeters.
/// `degrees` is the world-space rotation (the negated scan rotation).
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPlacement {
    /// URI of the source raster the viewer should tile
    pub tile_source: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub degrees: f64,
}

/// Aggregate extents over a set of placements, in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WorldBounds {
    /// An empty bounds value that any real extent will replace
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Extend the bounds to include the given extents
    pub fn include(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        self.min_x = self.min_x.min(min_x);
        self.max_x = self.max_x.max(max_x);
        self.min_y = self.min_y.min(min_y);
        self.max_y = self.max_y.max(max_y);
    }

    /// Grow the bounds by `margin` on all four sides
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether the bounds contain the given extents entirely
    pub fn contains(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
        self.min_x <= min_x && self.max_x >= max_x && self.min_y <= min_y && self.max_y >= max_y
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}
