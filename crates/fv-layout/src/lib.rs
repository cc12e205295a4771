//! Spatial layout of scanned pages in millimeter world space
//!
//! Pure computation: converts per-page pixel metadata (crop box, rotation,
//! physical size) into world-space placements so that rotated, differently
//! sized verso/recto scans align into one continuous virtual book opening.
//! No I/O, no viewer access.

mod config;
mod engine;
mod zoom;

pub use config::LayoutConfig;
pub use engine::PageLayoutEngine;
pub use zoom::ZoomConstraints;

use thiserror::Error;

/// Errors from layout computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("page '{target}' has invalid dimensions: {reason}")]
    InvalidPageDimensions { target: String, reason: String },
}
