//! Manifest id to source URL registry

use ahash::AHashMap;

/// Injectable mapping from manifest ids to edition source URLs.
///
/// The repository consults this before any network activity; an id that is
/// not registered never produces a request.
#[derive(Debug, Clone, Default)]
pub struct ManifestRegistry {
    sources: AHashMap<String, String>,
    default_manifest: Option<String>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manifest id; the first registered id becomes the default
    /// unless one is set explicitly
    pub fn register(mut self, id: impl Into<String>, url: impl Into<String>) -> Self {
        let id = id.into();
        if self.default_manifest.is_none() {
            self.default_manifest = Some(id.clone());
        }
        self.sources.insert(id, url.into());
        self
    }

    pub fn with_default(mut self, id: impl Into<String>) -> Self {
        self.default_manifest = Some(id.into());
        self
    }

    pub fn url_for(&self, id: &str) -> Option<&str> {
        self.sources.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Manifest the root path redirects to
    pub fn default_manifest(&self) -> Option<&str> {
        self.default_manifest.as_deref()
    }
}
