//! Panel view-models for the facsimile viewer
//!
//! Panels pull everything they show from the router's context snapshots and
//! produce plain render models; the host decides how to draw them. None of
//! this code touches the viewer or the history.

mod nav_buttons;
mod status;
mod thumbnails;
mod zone_list;

pub use nav_buttons::{NavButton, NavButtonsModel};
pub use status::{StatusView, StatusViewModel};
pub use thumbnails::{ThumbnailEntry, ThumbnailStrip};
pub use zone_list::{ZoneListEntry, ZoneListModel, ZonePreview};
