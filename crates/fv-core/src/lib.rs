//! Core functionality for the facsimile viewer
//!
//! This crate provides the shared data model, the geometry primitives for the
//! millimeter world space, and the seams towards the external collaborators
//! (deep-zoom image viewer, render surface, panel subscribers).

pub mod edition;
pub mod geometry;
pub mod intent;
pub mod subscriber;
pub mod viewer;

// Re-export commonly used types
pub use edition::{Edition, PagePixelInfo, PagePosition, PageRecord, PhysicalSize, WritingZone, ZoneIdentifier, ZoneProps};
pub use geometry::{PixelRect, WorldBounds, WorldPlacement};
pub use intent::{FilterSpec, NavigationIntent, PageSpec, ZoneSpec};
pub use subscriber::{NavTarget, RouterContext, RouterSubscriber, ViewPhase};
pub use viewer::{ImageViewer, RenderSurface, ViewerConfig, ViewerError, ViewerFactory};
