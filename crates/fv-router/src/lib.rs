//! URL-driven navigation for the facsimile viewer
//!
//! Turns path strings into navigation intents, reconciles them against the
//! current view state with the cheapest sufficient transition (zone update,
//! page swap, full reload), and fans state changes out to panels.

pub mod route;
pub mod router;
pub mod sequence;
pub mod viewport;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use route::{parse, Route};
pub use router::{HistoryPort, Router, RouterConfig, ZoneStep};
pub use viewport::{ApplyOutcome, ViewportController};

use fv_core::ViewerError;
use fv_data::RepositoryError;

/// Errors from applying a navigation intent
#[derive(Error, Debug)]
pub enum NavError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Viewer(#[from] ViewerError),
}
