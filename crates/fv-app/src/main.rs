//! Demo binary: drives the router against an in-memory edition and a
//! logging stand-in for the deep-zoom viewer, printing the panel models a
//! host would render.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fv_core::{
    ImageViewer, PixelRect, RenderSurface, RouterContext, RouterSubscriber, ViewPhase,
    ViewerConfig, ViewerError, ViewerFactory, WorldBounds, WorldPlacement,
};
use fv_data::{EditionRepository, InMemoryTransport, ManifestRegistry, TransportResponse};
use fv_layout::LayoutConfig;
use fv_router::{HistoryPort, Router, RouterConfig, ViewportController, ZoneStep};
use fv_ui::{NavButtonsModel, StatusView, StatusViewModel, ThumbnailStrip, ZoneListModel};

/// Viewer stand-in that logs every placement request
struct LoggingViewer {
    zoom: RwLock<f64>,
}

#[async_trait]
impl ImageViewer for LoggingViewer {
    async fn add_image(&self, placement: &WorldPlacement) -> Result<(), ViewerError> {
        info!(
            tile = %placement.tile_source,
            x = placement.x,
            y = placement.y,
            width_mm = placement.width,
            degrees = placement.degrees,
            "viewer: add image"
        );
        Ok(())
    }

    fn remove_all_images(&self) {
        info!("viewer: remove all images");
    }

    fn fit_bounds(&self, bounds: &WorldBounds) {
        info!(
            width_mm = bounds.width(),
            height_mm = bounds.height(),
            "viewer: fit bounds"
        );
    }

    fn zoom(&self) -> f64 {
        *self.zoom.read()
    }

    fn set_zoom(&self, zoom: f64) {
        *self.zoom.write() = zoom;
    }

    fn set_clip(&self, tile_source: &str, clip: Option<PixelRect>) {
        info!(tile = %tile_source, clipped = clip.is_some(), "viewer: set clip");
    }

    fn destroy(&self) -> Result<(), ViewerError> {
        info!("viewer: destroy");
        Ok(())
    }
}

struct LoggingViewerFactory;

#[async_trait]
impl ViewerFactory for LoggingViewerFactory {
    async fn create(&self, config: ViewerConfig) -> Result<Box<dyn ImageViewer>, ViewerError> {
        info!(element_id = %config.element_id, "viewer: create");
        Ok(Box::new(LoggingViewer {
            zoom: RwLock::new(1.0),
        }))
    }
}

/// The demo has no render loop; the mount point always exists.
struct ReadySurface;

#[async_trait]
impl RenderSurface for ReadySurface {
    async fn settled(&self) {}
}

/// History stand-in holding a single current path
struct DemoHistory {
    current: RwLock<String>,
}

impl HistoryPort for DemoHistory {
    fn push(&self, path: &str) {
        info!(path, "history: push");
        *self.current.write() = path.to_owned();
    }

    fn replace(&self, path: &str) {
        info!(path, "history: replace");
        *self.current.write() = path.to_owned();
    }

    fn current_path(&self) -> String {
        self.current.read().clone()
    }
}

/// Prints the panel models a browser host would render from each snapshot
struct ConsolePanels {
    controller: Arc<ViewportController>,
    base_path: String,
}

impl RouterSubscriber for ConsolePanels {
    fn on_view_change(&self, context: &RouterContext) {
        println!("== {} ({:?})", context.path, context.phase);

        let status = StatusViewModel::build(context, &self.base_path);
        if status.visible() {
            if let StatusView::NotFound { recovery_path, .. } = &status.view {
                println!("   not found; back to {recovery_path}");
            }
            return;
        }
        if context.phase != ViewPhase::Ready {
            return;
        }

        let buttons = NavButtonsModel::build(context);
        let describe = |b: &fv_ui::NavButton| {
            b.target
                .as_ref()
                .map(|t| t.path.clone())
                .unwrap_or_else(|| "-".to_owned())
        };
        println!(
            "   prev {}  next {}",
            describe(&buttons.prev),
            describe(&buttons.next)
        );

        let thumbs = ThumbnailStrip::build(context, &self.base_path);
        let active: Vec<usize> = thumbs
            .entries
            .iter()
            .filter(|t| t.active)
            .map(|t| t.page_number)
            .collect();
        println!("   {} thumbnails, active {active:?}", thumbs.entries.len());

        if let Some(index) = self.controller.zone_index() {
            let zones = ZoneListModel::build(context, &index);
            for entry in &zones.entries {
                let marker = if entry.highlighted { ">" } else { " " };
                println!("   {marker} zone {}", entry.address);
            }
        }
    }
}

/// Two facing pages of a small demo edition
fn demo_page(n: usize, zones: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "target": format!("https://tiles.example/demo/{n:03}.jpg"),
        "pixel": {
            "xywh": { "x": 40.0, "y": 30.0, "w": 1800.0, "h": 2600.0 },
            "rotation": 0.8,
            "width": 2000.0,
            "height": 2800.0
        },
        "physical": { "width": 225.0, "height": 325.0 },
        "position": if n % 2 == 0 { "verso" } else { "recto" },
        "surfaceLabel": format!("fol. {}{}", n.div_ceil(2), if n % 2 == 0 { "v" } else { "r" }),
        "writingZones": zones
    })
}

fn demo_zone(page: usize, label: &str, pos: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "identifier": {
            "zoneId": format!("wz-{page}-{label}"),
            "genDescId": format!("gd-{page}-{label}")
        },
        "label": label,
        "wzProps": { "pos": pos }
    })
}

fn demo_body() -> String {
    let pages: Vec<serde_json::Value> = (1..=6)
        .map(|n| {
            let zones = match n {
                2 => serde_json::json!([
                    demo_zone(2, "1", serde_json::json!({"x": 120.0, "y": 200.0, "w": 800.0, "h": 300.0})),
                    demo_zone(2, "3", serde_json::json!({"x": 150.0, "y": 900.0, "w": 600.0, "h": 250.0})),
                ]),
                3 => serde_json::json!([
                    demo_zone(3, "2", serde_json::json!({"x": 90.0, "y": 480.0, "w": 1100.0, "h": 420.0})),
                ]),
                _ => serde_json::json!([]),
            };
            demo_page(n, zones)
        })
        .collect();
    let edition = serde_json::json!({ "sourceLabel": "Demo", "pages": pages });
    serde_json::json!([{ "responseHeader": { "status": 0 } }, [edition]]).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("starting facsimile viewer demo");

    let registry = ManifestRegistry::new().register("demo", "https://data.example/demo.json");
    let transport = Arc::new(
        InMemoryTransport::new()
            .with_response("https://data.example/demo.json", TransportResponse::ok(demo_body())),
    );
    let repository = Arc::new(EditionRepository::new(registry, transport));

    let controller = Arc::new(ViewportController::new(
        repository,
        Arc::new(LoggingViewerFactory),
        Arc::new(ReadySurface),
        LayoutConfig::default(),
        ViewerConfig {
            element_id: "facsimile-viewer".into(),
            show_navigation_control: false,
        },
    ));

    let history = Arc::new(DemoHistory {
        current: RwLock::new("/facs/".to_owned()),
    });
    let router = Router::new(controller.clone(), history, RouterConfig::default());

    let panels = Arc::new(ConsolePanels {
        controller,
        base_path: router.base_path().to_owned(),
    });
    router.add_subscriber(panels.clone());

    // Resolve the start path, then walk through the edition the way a host
    // session would.
    router.start().await;
    router.navigate("/facs/demo/p2-3/").await;
    router.step_zone(ZoneStep::Next).await;
    router.step_zone(ZoneStep::Next).await;
    router.navigate_to_zone("gd-3-2").await;
    router.navigate("/facs/demo/p2-3/filter:allPages/").await;
    router.navigate("/facs/unknown/").await;

    Ok(())
}
