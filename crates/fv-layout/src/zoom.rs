//! Zoom range derivation from world bounds

use fv_core::WorldBounds;

/// Zoom factor multipliers relative to the home fit of the padded bounds
const MIN_HOME_FACTOR: f64 = 0.5;
const MAX_OVER_MIN: f64 = 20.0;

/// Allowed zoom range for a spread.
///
/// The viewer's zoom scale is relative to world width: a zoom of
/// `1 / bounds.width()` shows the padded bounds exactly. The minimum allows
/// zooming out to half that, the maximum is twenty times the minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConstraints {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl ZoomConstraints {
    pub fn for_bounds(bounds: &WorldBounds) -> Self {
        let width = bounds.width();
        if !(width > 0.0) {
            // Degenerate bounds; leave the zoom effectively unconstrained.
            return Self {
                min_zoom: 0.0,
                max_zoom: f64::INFINITY,
            };
        }
        let home = 1.0 / width;
        let min_zoom = home * MIN_HOME_FACTOR;
        Self {
            min_zoom,
            max_zoom: min_zoom * MAX_OVER_MIN,
        }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
