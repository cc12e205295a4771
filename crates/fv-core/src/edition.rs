//! Edition data model
//!
//! Wire-format types for one digitized source: its scanned pages and the
//! writing-zone annotations attached to them. Loaded once per manifest id and
//! immutable afterwards; everything downstream shares the loaded document
//! through an `Arc`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::PixelRect;

/// Top-level edition document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    /// Human-facing label of the source, used in composite zone addresses
    pub source_label: String,
    /// Ordered page records; page numbers are 1-based indices into this list
    pub pages: Vec<PageRecord>,
}

impl Edition {
    /// Page record for a 1-based page number
    pub fn page(&self, number: usize) -> Option<&PageRecord> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// One scanned page of an edition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// URI of the source raster image (the full, uncropped scan)
    pub target: String,
    pub pixel: PagePixelInfo,
    pub physical: PhysicalSize,
    pub position: PagePosition,
    #[serde(default)]
    pub writing_zones: Vec<WritingZone>,
    /// Provenance labels for display grouping
    #[serde(default)]
    pub surface_doc: Option<String>,
    #[serde(default)]
    pub surface_label: Option<String>,
}

/// Pixel-space metadata of a scanned page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePixelInfo {
    /// Crop rectangle of the page content within the full scan
    pub xywh: PixelRect,
    /// Clockwise rotation (degrees) that makes the content upright
    #[serde(default)]
    pub rotation: f64,
    /// Full image width in pixels
    pub width: f64,
    /// Full image height in pixels
    pub height: f64,
}

/// Physical size of the page content area in millimeters (post-rotation)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: f64,
    pub height: f64,
}

/// Placement of a page within a spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePosition {
    /// Left-hand page
    Verso,
    /// Right-hand page
    Recto,
}

impl<'de> Deserialize<'de> for PagePosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "verso" | "left" => Ok(PagePosition::Verso),
            "recto" | "right" => Ok(PagePosition::Recto),
            other => Err(serde::de::Error::custom(format!(
                "unresolvable page position '{other}'"
            ))),
        }
    }
}

/// An annotated sub-region of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingZone {
    pub identifier: ZoneIdentifier,
    /// Short label, unique per page; zone addresses are built from it
    pub label: String,
    #[serde(default)]
    pub wz_props: ZoneProps,
    /// Descriptive metadata, opaque to navigation and layout
    #[serde(default)]
    pub sketch_props: serde_json::Value,
    #[serde(default)]
    pub work_relations: serde_json::Value,
}

/// Identifier bundle of a writing zone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneIdentifier {
    pub zone_id: String,
    /// Opaque cross-reference key linking zones across pages
    #[serde(default)]
    pub gen_desc_id: Option<String>,
    #[serde(default)]
    pub at_filename: Option<String>,
}

/// Writing-zone properties; only `pos` is interpreted, the rest is display data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneProps {
    /// Zone rectangle in pixels, relative to the page's crop rectangle
    #[serde(default)]
    pub pos: Option<PixelRect>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
