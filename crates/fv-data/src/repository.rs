//! Edition loading and session caching

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use fv_core::Edition;

use crate::transport::EditionTransport;
use crate::{ManifestRegistry, RepositoryError};

/// Loads editions by manifest id and caches them for the session.
///
/// Editions are immutable after load; repeated loads of the same id return
/// the cached document without touching the transport. The cache lives as
/// long as the repository (a full page refresh in the original host).
pub struct EditionRepository {
    registry: ManifestRegistry,
    transport: Arc<dyn EditionTransport>,
    cache: RwLock<AHashMap<String, Arc<Edition>>>,
}

impl EditionRepository {
    pub fn new(registry: ManifestRegistry, transport: Arc<dyn EditionTransport>) -> Self {
        Self {
            registry,
            transport,
            cache: RwLock::new(AHashMap::new()),
        }
    }

    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    /// Whether a manifest id resolves without a fetch
    pub fn knows(&self, manifest_id: &str) -> bool {
        self.registry.contains(manifest_id)
    }

    pub async fn load(&self, manifest_id: &str) -> Result<Arc<Edition>, RepositoryError> {
        if let Some(cached) = self.cache.read().get(manifest_id) {
            debug!(manifest_id, "edition cache hit");
            return Ok(cached.clone());
        }

        let url = self
            .registry
            .url_for(manifest_id)
            .ok_or_else(|| RepositoryError::NotFound(manifest_id.to_owned()))?;

        let response = self.transport.fetch(url).await?;
        if !response.is_success() {
            return Err(RepositoryError::FetchFailed {
                status: response.status,
            });
        }

        let edition = Arc::new(unwrap_edition(&response.body)?);
        info!(
            manifest_id,
            pages = edition.page_count(),
            "edition loaded"
        );

        self.cache
            .write()
            .insert(manifest_id.to_owned(), edition.clone());
        Ok(edition)
    }
}

/// Extract the edition document from the transport wrapper.
///
/// The wire format is a sequence in which the document is buried: exactly one
/// element is a non-empty array, and that array's first element is the
/// edition. The surrounding elements are metadata headers to skip.
fn unwrap_edition(body: &str) -> Result<Edition, RepositoryError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| RepositoryError::MalformedData(format!("body is not JSON: {e}")))?;

    let elements = value
        .as_array()
        .ok_or_else(|| RepositoryError::MalformedData("body is not a sequence".into()))?;

    let document = elements
        .iter()
        .find_map(|el| el.as_array().and_then(|arr| arr.first()))
        .ok_or_else(|| {
            RepositoryError::MalformedData("no non-empty array element in response".into())
        })?;

    serde_json::from_value(document.clone())
        .map_err(|e| RepositoryError::MalformedData(format!("edition document: {e}")))
}
