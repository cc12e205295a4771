//! Transport seam for edition fetches

use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::RepositoryError;

/// Raw transport response: status code plus body text
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches the document behind an edition source URL.
///
/// The data source is an external collaborator; this trait is its whole
/// surface. Implementations may be HTTP clients, file readers or fixtures.
#[async_trait]
pub trait EditionTransport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<TransportResponse, RepositoryError>;
}

/// Transport serving canned responses by URL; used by tests and the demo
/// binary. Unknown URLs answer with status 404.
#[derive(Default)]
pub struct InMemoryTransport {
    responses: RwLock<AHashMap<String, TransportResponse>>,
    fetch_count: RwLock<AHashMap<String, usize>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url: impl Into<String>, response: TransportResponse) -> Self {
        self.responses.write().insert(url.into(), response);
        self
    }

    /// How often a URL has been fetched; lets tests assert cache behavior
    pub fn fetches(&self, url: &str) -> usize {
        self.fetch_count.read().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl EditionTransport for InMemoryTransport {
    async fn fetch(&self, url: &str) -> Result<TransportResponse, RepositoryError> {
        *self.fetch_count.write().entry(url.to_owned()).or_insert(0) += 1;
        Ok(self
            .responses
            .read()
            .get(url)
            .cloned()
            .unwrap_or(TransportResponse {
                status: 404,
                body: String::new(),
            }))
    }
}
