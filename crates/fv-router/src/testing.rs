//! Shared fixtures and collaborator mocks for navigation tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;

use fv_core::{
    ImageViewer, PixelRect, RenderSurface, ViewerConfig, ViewerError, ViewerFactory,
    WorldBounds, WorldPlacement,
};
use fv_data::{
    EditionRepository, EditionTransport, InMemoryTransport, ManifestRegistry, RepositoryError,
    TransportResponse,
};
use fv_layout::LayoutConfig;

use crate::viewport::ViewportController;

pub type EventLog = Arc<RwLock<Vec<String>>>;

pub fn events_matching(log: &EventLog, prefix: &str) -> usize {
    log.read().iter().filter(|e| e.starts_with(prefix)).count()
}

/// Viewer that records every placement-contract call
pub struct MockViewer {
    events: EventLog,
    zoom: RwLock<f64>,
    fail_destroy: bool,
}

#[async_trait]
impl ImageViewer for MockViewer {
    async fn add_image(&self, placement: &WorldPlacement) -> Result<(), ViewerError> {
        self.events.write().push(format!("add:{}", placement.tile_source));
        Ok(())
    }

    fn remove_all_images(&self) {
        self.events.write().push("remove_all".into());
    }

    fn fit_bounds(&self, _bounds: &WorldBounds) {
        self.events.write().push("fit".into());
    }

    fn zoom(&self) -> f64 {
        *self.zoom.read()
    }

    fn set_zoom(&self, zoom: f64) {
        *self.zoom.write() = zoom;
    }

    fn set_clip(&self, tile_source: &str, clip: Option<PixelRect>) {
        let state = if clip.is_some() { "on" } else { "off" };
        self.events.write().push(format!("clip:{tile_source}:{state}"));
    }

    fn destroy(&self) -> Result<(), ViewerError> {
        self.events.write().push("destroy".into());
        if self.fail_destroy {
            Err(ViewerError::Teardown("mock refused to die".into()))
        } else {
            Ok(())
        }
    }
}

/// Factory producing [`MockViewer`]s that share one event log
pub struct MockFactory {
    pub events: EventLog,
    pub created: AtomicUsize,
    pub fail_destroy: bool,
}

impl MockFactory {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            created: AtomicUsize::new(0),
            fail_destroy: false,
        }
    }

    pub fn failing_destroy() -> Self {
        Self {
            fail_destroy: true,
            ..Self::new()
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ViewerFactory for MockFactory {
    async fn create(&self, _config: ViewerConfig) -> Result<Box<dyn ImageViewer>, ViewerError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.events.write().push("create".into());
        Ok(Box::new(MockViewer {
            events: self.events.clone(),
            zoom: RwLock::new(1.0),
            fail_destroy: self.fail_destroy,
        }))
    }
}

/// Surface whose mount point is always settled
pub struct ImmediateSurface;

#[async_trait]
impl RenderSurface for ImmediateSurface {
    async fn settled(&self) {}
}

/// Transport that blocks each URL on an explicit release, for racing
/// navigations against each other
#[derive(Default)]
pub struct GatedTransport {
    responses: AHashMap<String, TransportResponse>,
    gates: AHashMap<String, Arc<Notify>>,
}

impl GatedTransport {
    pub fn with_gated_response(
        mut self,
        url: impl Into<String>,
        response: TransportResponse,
    ) -> (Self, Arc<Notify>) {
        let url = url.into();
        let gate = Arc::new(Notify::new());
        self.responses.insert(url.clone(), response);
        self.gates.insert(url, gate.clone());
        (self, gate)
    }
}

#[async_trait]
impl EditionTransport for GatedTransport {
    async fn fetch(&self, url: &str) -> Result<TransportResponse, RepositoryError> {
        if let Some(gate) = self.gates.get(url) {
            gate.notified().await;
        }
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or(TransportResponse {
                status: 404,
                body: String::new(),
            }))
    }
}

/// Edition fixture: `total` pages, even pages verso, odd pages recto.
/// Page 1 carries zone 1, page 2 zones 5 and 7, page 3 zone 2.
pub fn fixture_edition(source_label: &str, total: usize) -> serde_json::Value {
    let zones_for = |n: usize| -> serde_json::Value {
        let zone = |label: &str, pos: serde_json::Value| {
            serde_json::json!({
                "identifier": {
                    "zoneId": format!("wz-{n}-{label}"),
                    "genDescId": format!("gd-{n}-{label}")
                },
                "label": label,
                "wzProps": { "pos": pos }
            })
        };
        match n {
            1 => serde_json::json!([zone("1", serde_json::json!({"x": 90.0, "y": 130.0, "w": 900.0, "h": 260.0}))]),
            2 => serde_json::json!([
                zone("5", serde_json::json!({"x": 180.0, "y": 520.0, "w": 720.0, "h": 390.0})),
                zone("7", serde_json::json!(null)),
            ]),
            3 => serde_json::json!([zone("2", serde_json::json!({"x": 0.0, "y": 0.0, "w": 1800.0, "h": 2600.0}))]),
            _ => serde_json::json!([]),
        }
    };

    let pages: Vec<serde_json::Value> = (1..=total)
        .map(|n| {
            serde_json::json!({
                "target": format!("https://tiles.example/{source_label}/{n:03}.jpg"),
                "pixel": {
                    "xywh": { "x": 40.0, "y": 30.0, "w": 1800.0, "h": 2600.0 },
                    "rotation": 0.5,
                    "width": 2000.0,
                    "height": 2800.0
                },
                "physical": { "width": 225.0, "height": 325.0 },
                "position": if n % 2 == 0 { "verso" } else { "recto" },
                "surfaceLabel": format!("fol. {n}"),
                "writingZones": zones_for(n)
            })
        })
        .collect();

    serde_json::json!({ "sourceLabel": source_label, "pages": pages })
}

/// Wrap an edition document in the transport envelope
pub fn wrapped_body(edition: serde_json::Value) -> String {
    serde_json::json!([{ "responseHeader": { "status": 0 } }, [edition]]).to_string()
}

pub fn fixture_registry() -> ManifestRegistry {
    ManifestRegistry::new()
        .register("NK", "https://data.example/nk.json")
        .register("WAB", "https://data.example/wab.json")
}

/// Repository over an in-memory transport: "NK" with eleven pages, "WAB"
/// with six
pub fn fixture_repository() -> (Arc<EditionRepository>, Arc<InMemoryTransport>) {
    let transport = Arc::new(
        InMemoryTransport::new()
            .with_response(
                "https://data.example/nk.json",
                TransportResponse::ok(wrapped_body(fixture_edition("NK", 11))),
            )
            .with_response(
                "https://data.example/wab.json",
                TransportResponse::ok(wrapped_body(fixture_edition("WAB", 6))),
            ),
    );
    let repository = Arc::new(EditionRepository::new(fixture_registry(), transport.clone()));
    (repository, transport)
}

pub fn controller_with(
    repository: Arc<EditionRepository>,
    factory: Arc<MockFactory>,
) -> Arc<ViewportController> {
    Arc::new(ViewportController::new(
        repository,
        factory,
        Arc::new(ImmediateSurface),
        LayoutConfig::default(),
        ViewerConfig::default(),
    ))
}

pub fn fixture_controller() -> (Arc<ViewportController>, Arc<MockFactory>) {
    let (repository, _) = fixture_repository();
    let factory = Arc::new(MockFactory::new());
    (controller_with(repository, factory.clone()), factory)
}
