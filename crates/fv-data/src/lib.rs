//! Edition data access for the facsimile viewer
//!
//! Fetches and caches edition documents through an injectable transport and
//! manifest registry, and builds the writing-zone index over a loaded edition.

pub mod registry;
pub mod repository;
pub mod transport;
pub mod zones;

use thiserror::Error;

// Re-exports
pub use registry::ManifestRegistry;
pub use repository::EditionRepository;
pub use transport::{EditionTransport, InMemoryTransport, TransportResponse};
pub use zones::{page_groups, ZoneIndex, ZoneLocation};

/// Errors that can occur when loading edition data
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Manifest id missing from the registry; no request is attempted
    #[error("unknown manifest id '{0}'")]
    NotFound(String),

    /// Non-success transport response
    #[error("edition fetch failed with status {status}")]
    FetchFailed { status: u16 },

    /// Transport-level failure before any status was produced
    #[error("edition transport error: {0}")]
    Transport(String),

    /// Response body did not contain the expected edition document
    #[error("malformed edition data: {0}")]
    MalformedData(String),
}
