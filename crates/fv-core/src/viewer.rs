//! Seams towards the external deep-zoom image viewer
//!
//! The core never depends on the viewer's tiling or rendering internals, only
//! on the placement contract below: add images at world coordinates, remove
//! them all, fit to bounds, get/set zoom, clip per image, destroy.

use async_trait::async_trait;
use thiserror::Error;

use crate::geometry::{PixelRect, WorldBounds, WorldPlacement};

/// Errors surfaced by the external viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("viewer failed to load image '{tile_source}': {message}")]
    ImageLoad { tile_source: String, message: String },

    #[error("viewer construction failed: {0}")]
    Construction(String),

    #[error("viewer teardown failed: {0}")]
    Teardown(String),
}

/// Configuration handed to the viewer on construction
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Mount point identifier in the host surface
    pub element_id: String,
    /// Whether the viewer should show its own navigation controls
    pub show_navigation_control: bool,
}

/// Placement contract of the external pan-zoom tile viewer.
///
/// `add_image` resolves when the viewer has finished loading the image (the
/// Rust rendition of the per-image completion callback); an error resolution
/// is the error callback. All other operations are synchronous requests the
/// viewer applies on its own schedule.
#[async_trait]
pub trait ImageViewer: Send + Sync {
    async fn add_image(&self, placement: &WorldPlacement) -> Result<(), ViewerError>;

    fn remove_all_images(&self);

    fn fit_bounds(&self, bounds: &WorldBounds);

    fn zoom(&self) -> f64;

    fn set_zoom(&self, zoom: f64);

    /// Restrict the visible part of one placed image, in its pixel space.
    /// `None` removes any clip.
    fn set_clip(&self, tile_source: &str, clip: Option<PixelRect>);

    /// Best-effort teardown; callers must tolerate failure
    fn destroy(&self) -> Result<(), ViewerError>;
}

/// Constructs viewer instances once the host surface is ready
#[async_trait]
pub trait ViewerFactory: Send + Sync {
    async fn create(&self, config: ViewerConfig) -> Result<Box<dyn ImageViewer>, ViewerError>;
}

/// Post-render settle hook of the host.
///
/// Viewer construction must wait until the mount point from the most recent
/// render exists; in a browser host this is the deferred-by-one-tick pattern,
/// here it is an explicit awaitable.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    async fn settled(&self);
}
