//! Page placement and combined bounds computation

use fv_core::{PagePosition, PageRecord, PixelRect, WorldBounds, WorldPlacement};

use crate::{LayoutConfig, LayoutError};

/// Converts page records into world-space placements.
///
/// The tile source handed to the viewer is the full uncropped scan, but the
/// alignment that matters is that of the crop rectangle (the page content).
/// The engine therefore decides where the crop must sit in world space and
/// back-solves the origin of the full image from it.
pub struct PageLayoutEngine {
    config: LayoutConfig,
}

impl PageLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute the world placement of one page.
    ///
    /// Verso pages anchor their right edge at world x = 0, recto pages their
    /// left edge, both with the top edge at world y = 0, so a verso/recto
    /// pair meets seamlessly at the spine.
    pub fn place_page(&self, page: &PageRecord) -> Result<WorldPlacement, LayoutError> {
        self.check_dimensions(page)?;

        let crop = &page.pixel.xywh;

        // Scale comes from the crop width: the physical size describes the
        // page content inside the crop, not the full scan.
        let mm_per_px = page.physical.width / crop.w;
        let full_width_mm = page.pixel.width * mm_per_px;

        let (crop_cx_px, crop_cy_px) = crop.center();
        let crop_center_mm = (crop_cx_px * mm_per_px, crop_cy_px * mm_per_px);

        let target_x = match page.position {
            PagePosition::Verso => -page.physical.width,
            PagePosition::Recto => 0.0,
        };
        let target_y = 0.0;

        let page_center_world = (
            target_x + page.physical.width / 2.0,
            target_y + page.physical.height / 2.0,
        );

        // Back-solve the full image origin so the crop lands on the target
        // slot; rotation is already accounted for because the physical size
        // is the post-rotation content size.
        let image_x = page_center_world.0 - crop_center_mm.0;
        let image_y = page_center_world.1 - crop_center_mm.1;

        Ok(WorldPlacement {
            tile_source: page.target.clone(),
            x: image_x,
            y: image_y,
            width: full_width_mm,
            // Scan rotation is clockwise-to-upright; world rotation flips it.
            degrees: -page.pixel.rotation,
        })
    }

    /// Combined extents of a set of placed pages, expanded by the configured
    /// padding on all sides.
    ///
    /// The vertical extent of each placement preserves the full image's
    /// aspect ratio, since the viewer only receives a width.
    pub fn world_bounds(&self, placed: &[(&PageRecord, &WorldPlacement)]) -> WorldBounds {
        let mut bounds = WorldBounds::empty();
        for (page, placement) in placed {
            let height = placement.width * (page.pixel.height / page.pixel.width);
            bounds.include(
                placement.x,
                placement.x + placement.width,
                placement.y,
                placement.y + height,
            );
        }
        if bounds.is_empty() {
            return bounds;
        }
        bounds.padded(self.config.padding_mm)
    }

    /// Clip rectangle hiding the scanned inner margin, in the page's full
    /// image pixel space.
    ///
    /// Only recto pages are clipped: they render on top and cover the verso
    /// inner margin, so clipping one side per pair avoids seam artifacts.
    pub fn clip_rect(&self, page: &PageRecord) -> Option<PixelRect> {
        if !self.config.hide_inner_margins {
            return None;
        }
        match page.position {
            PagePosition::Verso => None,
            PagePosition::Recto => Some(PixelRect::new(
                page.pixel.xywh.x,
                0.0,
                page.pixel.width - page.pixel.xywh.x,
                page.pixel.height,
            )),
        }
    }

    fn check_dimensions(&self, page: &PageRecord) -> Result<(), LayoutError> {
        let invalid = |reason: String| LayoutError::InvalidPageDimensions {
            target: page.target.clone(),
            reason,
        };

        let crop = &page.pixel.xywh;
        if crop.w < self.config.min_crop_px || crop.h < self.config.min_crop_px {
            return Err(invalid(format!(
                "crop {}x{} below minimum of {} px",
                crop.w, crop.h, self.config.min_crop_px
            )));
        }
        if page.pixel.width <= 0.0 || page.pixel.height <= 0.0 {
            return Err(invalid("non-positive image size".into()));
        }
        if page.physical.width <= 0.0 || page.physical.height <= 0.0 {
            return Err(invalid("non-positive physical size".into()));
        }
        Ok(())
    }
}

impl Default for PageLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
