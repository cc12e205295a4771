//! Layout engine configuration

/// Tunables of the layout engine
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Minimum crop rectangle side length in pixels; anything smaller is
    /// treated as corrupt scan metadata
    pub min_crop_px: f64,

    /// Margin added around the combined page extents, in millimeters
    pub padding_mm: f64,

    /// Whether recto pages get clipped to hide the scanned inner margin
    pub hide_inner_margins: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_crop_px: 10.0,
            padding_mm: 20.0,
            hide_inner_margins: true,
        }
    }
}
