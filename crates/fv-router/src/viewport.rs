//! Viewer lifecycle and transition state machine
//!
//! The controller is the single owner of the image viewer instance. Every
//! viewer mutation funnels through [`ViewportController::apply`]; panels and
//! the router only read snapshots. Full viewer reconstruction is expensive
//! (tile fetch and decode), so same-manifest transitions avoid it whenever
//! the geometry does not change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use fv_core::{
    Edition, ImageViewer, NavigationIntent, RenderSurface, ViewerConfig, ViewerFactory,
    WorldPlacement,
};
use fv_data::{EditionRepository, ZoneIndex};
use fv_layout::{LayoutConfig, PageLayoutEngine, ZoomConstraints};

use crate::NavError;

/// Which transition an intent resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Same manifest and spread: only the zone highlight / filter changed,
    /// the viewer was not touched
    ZoneUpdate,
    /// Same manifest, different spread: images swapped inside the live
    /// viewer instance
    PageSwap,
    /// Manifest change or first navigation: viewer rebuilt from scratch
    FullReload,
    /// A newer navigation superseded this one while it was in flight; its
    /// outcome was discarded without touching visible state
    Stale,
}

enum ViewState {
    Empty,
    Loading { manifest_id: String },
    Ready(ReadyView),
}

struct ReadyView {
    manifest_id: String,
    edition: Arc<Edition>,
    zone_index: Arc<ZoneIndex>,
    viewer: Arc<dyn ImageViewer>,
    /// Resolved 1-based page numbers of the current spread
    pages: Vec<usize>,
    intent: NavigationIntent,
    zoom: ZoomConstraints,
}

/// Owns the viewer and decides, per intent, between zone update, page swap
/// and full reload
pub struct ViewportController {
    repository: Arc<EditionRepository>,
    factory: Arc<dyn ViewerFactory>,
    surface: Arc<dyn RenderSurface>,
    layout: PageLayoutEngine,
    viewer_config: ViewerConfig,
    state: RwLock<ViewState>,
    /// Monotonic navigation epoch; only the latest epoch may commit state
    epoch: AtomicU64,
}

impl ViewportController {
    pub fn new(
        repository: Arc<EditionRepository>,
        factory: Arc<dyn ViewerFactory>,
        surface: Arc<dyn RenderSurface>,
        layout_config: LayoutConfig,
        viewer_config: ViewerConfig,
    ) -> Self {
        Self {
            repository,
            factory,
            surface,
            layout: PageLayoutEngine::new(layout_config),
            viewer_config,
            state: RwLock::new(ViewState::Empty),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn repository(&self) -> &Arc<EditionRepository> {
        &self.repository
    }

    /// Apply a navigation intent with the cheapest sufficient transition.
    pub async fn apply(&self, intent: NavigationIntent) -> Result<ApplyOutcome, NavError> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        enum Plan {
            ZoneUpdate,
            PageSwap {
                viewer: Arc<dyn ImageViewer>,
                edition: Arc<Edition>,
                pages: Vec<usize>,
            },
            Reload,
        }

        let plan = {
            let state = self.state.read();
            match &*state {
                ViewState::Ready(view) if view.manifest_id == intent.manifest_id => {
                    let pages = resolve_pages(&intent, &view.edition);
                    if pages == view.pages {
                        Plan::ZoneUpdate
                    } else {
                        Plan::PageSwap {
                            viewer: view.viewer.clone(),
                            edition: view.edition.clone(),
                            pages,
                        }
                    }
                }
                _ => Plan::Reload,
            }
        };

        match plan {
            Plan::ZoneUpdate => {
                let mut state = self.state.write();
                if let ViewState::Ready(view) = &mut *state {
                    debug!(manifest_id = %intent.manifest_id, "zone/filter-only update");
                    view.intent = intent;
                }
                Ok(ApplyOutcome::ZoneUpdate)
            }
            Plan::PageSwap {
                viewer,
                edition,
                pages,
            } => self.page_swap(epoch, intent, viewer, edition, pages).await,
            Plan::Reload => self.full_reload(epoch, intent).await,
        }
    }

    async fn page_swap(
        &self,
        epoch: u64,
        intent: NavigationIntent,
        viewer: Arc<dyn ImageViewer>,
        edition: Arc<Edition>,
        pages: Vec<usize>,
    ) -> Result<ApplyOutcome, NavError> {
        debug!(manifest_id = %intent.manifest_id, ?pages, "page swap");
        viewer.remove_all_images();

        let Some(zoom) = self.place_pages(&viewer, &edition, &pages, epoch).await? else {
            return Ok(ApplyOutcome::Stale);
        };

        let mut state = self.state.write();
        if !self.epoch_is_current(epoch) {
            return Ok(ApplyOutcome::Stale);
        }
        if let ViewState::Ready(view) = &mut *state {
            view.pages = pages;
            view.intent = intent;
            view.zoom = zoom;
        }
        Ok(ApplyOutcome::PageSwap)
    }

    async fn full_reload(
        &self,
        epoch: u64,
        intent: NavigationIntent,
    ) -> Result<ApplyOutcome, NavError> {
        info!(manifest_id = %intent.manifest_id, "full viewer reload");
        {
            let mut state = self.state.write();
            let old = std::mem::replace(
                &mut *state,
                ViewState::Loading {
                    manifest_id: intent.manifest_id.clone(),
                },
            );
            if let ViewState::Ready(view) = old {
                destroy_quietly(&view.viewer);
            }
        }

        let edition = match self.repository.load(&intent.manifest_id).await {
            Ok(edition) => edition,
            Err(err) => {
                if self.epoch_is_current(epoch) {
                    *self.state.write() = ViewState::Empty;
                    return Err(err.into());
                }
                return Ok(ApplyOutcome::Stale);
            }
        };
        if !self.epoch_is_current(epoch) {
            debug!(manifest_id = %intent.manifest_id, "discarding stale edition fetch");
            return Ok(ApplyOutcome::Stale);
        }

        // The mount point must exist before the viewer can attach to it.
        self.surface.settled().await;

        let viewer: Arc<dyn ImageViewer> = match self.factory.create(self.viewer_config.clone()).await
        {
            Ok(viewer) => Arc::from(viewer),
            Err(err) => {
                if self.epoch_is_current(epoch) {
                    *self.state.write() = ViewState::Empty;
                    return Err(err.into());
                }
                return Ok(ApplyOutcome::Stale);
            }
        };
        if !self.epoch_is_current(epoch) {
            destroy_quietly(&viewer);
            return Ok(ApplyOutcome::Stale);
        }

        let pages = resolve_pages(&intent, &edition);
        let Some(zoom) = self.place_pages(&viewer, &edition, &pages, epoch).await? else {
            destroy_quietly(&viewer);
            return Ok(ApplyOutcome::Stale);
        };

        let zone_index = Arc::new(ZoneIndex::build(edition.clone()));

        let mut state = self.state.write();
        if !self.epoch_is_current(epoch) {
            destroy_quietly(&viewer);
            return Ok(ApplyOutcome::Stale);
        }
        *state = ViewState::Ready(ReadyView {
            manifest_id: intent.manifest_id.clone(),
            edition,
            zone_index,
            viewer,
            pages,
            intent,
            zoom,
        });
        Ok(ApplyOutcome::FullReload)
    }

    /// Place the given pages into the viewer and fit the viewport once all
    /// image loads have completed. Returns `None` when a newer navigation
    /// superseded this one mid-flight.
    async fn place_pages(
        &self,
        viewer: &Arc<dyn ImageViewer>,
        edition: &Arc<Edition>,
        pages: &[usize],
        epoch: u64,
    ) -> Result<Option<ZoomConstraints>, NavError> {
        let mut placed: Vec<(usize, WorldPlacement)> = Vec::with_capacity(pages.len());
        for &page_number in pages {
            let Some(page) = edition.page(page_number) else {
                continue;
            };
            match self.layout.place_page(page) {
                Ok(placement) => placed.push((page_number, placement)),
                // Corrupt scan metadata skips the page, not the navigation.
                Err(err) => warn!(page_number, %err, "skipping unplaceable page"),
            }
        }

        for (page_number, placement) in &placed {
            if let Err(err) = viewer.add_image(placement).await {
                warn!(page_number, %err, "image load failed");
                continue;
            }
            if let Some(page) = edition.page(*page_number) {
                viewer.set_clip(&placement.tile_source, self.layout.clip_rect(page));
            }
        }

        if !self.epoch_is_current(epoch) {
            return Ok(None);
        }

        let pairs: Vec<_> = placed
            .iter()
            .filter_map(|(n, p)| edition.page(*n).map(|page| (page, p)))
            .collect();
        let bounds = self.layout.world_bounds(&pairs);
        let zoom = ZoomConstraints::for_bounds(&bounds);
        if !bounds.is_empty() {
            // One fit per transition, after the last load completion.
            viewer.fit_bounds(&bounds);
            let current = viewer.zoom();
            let clamped = zoom.clamp(current);
            if clamped != current {
                viewer.set_zoom(clamped);
            }
        }
        Ok(Some(zoom))
    }

    /// Set the viewer zoom, clamped to the current spread's constraints
    pub fn set_zoom(&self, zoom: f64) {
        let state = self.state.read();
        if let ViewState::Ready(view) = &*state {
            view.viewer.set_zoom(view.zoom.clamp(zoom));
        }
    }

    pub fn zoom(&self) -> Option<f64> {
        let state = self.state.read();
        match &*state {
            ViewState::Ready(view) => Some(view.viewer.zoom()),
            _ => None,
        }
    }

    pub fn zoom_constraints(&self) -> Option<ZoomConstraints> {
        let state = self.state.read();
        match &*state {
            ViewState::Ready(view) => Some(view.zoom),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.read(), ViewState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(&*self.state.read(), ViewState::Loading { .. })
    }

    pub fn manifest_id(&self) -> Option<String> {
        match &*self.state.read() {
            ViewState::Ready(view) => Some(view.manifest_id.clone()),
            ViewState::Loading { manifest_id } => Some(manifest_id.clone()),
            ViewState::Empty => None,
        }
    }

    /// Resolved pages of the current spread, empty unless `Ready`
    pub fn pages(&self) -> Vec<usize> {
        match &*self.state.read() {
            ViewState::Ready(view) => view.pages.clone(),
            _ => Vec::new(),
        }
    }

    pub fn edition(&self) -> Option<Arc<Edition>> {
        match &*self.state.read() {
            ViewState::Ready(view) => Some(view.edition.clone()),
            _ => None,
        }
    }

    pub fn zone_index(&self) -> Option<Arc<ZoneIndex>> {
        match &*self.state.read() {
            ViewState::Ready(view) => Some(view.zone_index.clone()),
            _ => None,
        }
    }

    pub fn current_intent(&self) -> Option<NavigationIntent> {
        match &*self.state.read() {
            ViewState::Ready(view) => Some(view.intent.clone()),
            _ => None,
        }
    }

    fn epoch_is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }
}

/// Viewer teardown is best-effort and never propagates
fn destroy_quietly(viewer: &Arc<dyn ImageViewer>) {
    if let Err(err) = viewer.destroy() {
        warn!(%err, "viewer teardown failed");
    }
}

/// Resolve an intent's page spec against the edition. No spec means the
/// first page; out-of-range indices are filtered, and a spec that resolves
/// to nothing falls back to the first page.
fn resolve_pages(intent: &NavigationIntent, edition: &Edition) -> Vec<usize> {
    let total = edition.page_count();
    if total == 0 {
        return Vec::new();
    }
    match &intent.page_spec {
        None => vec![1],
        Some(spec) => {
            let pages = spec.resolve(total);
            if pages.is_empty() {
                warn!(?spec, total, "page spec out of range, showing first page");
                vec![1]
            } else {
                pages
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use fv_core::{PageSpec, ZoneSpec};
    use fv_data::{InMemoryTransport, TransportResponse};

    fn intent(page_spec: Option<PageSpec>) -> NavigationIntent {
        let mut intent = NavigationIntent::manifest("NK");
        intent.page_spec = page_spec;
        intent
    }

    #[tokio::test]
    async fn first_navigation_shows_page_one_alone() {
        let (controller, factory) = fixture_controller();

        let outcome = controller.apply(intent(None)).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::FullReload);
        assert_eq!(controller.pages(), vec![1]);
        assert!(controller.is_ready());
        assert_eq!(factory.created(), 1);
        assert_eq!(events_matching(&factory.events, "add:"), 1);
    }

    #[tokio::test]
    async fn page_swap_keeps_the_viewer_and_fits_once_after_both_loads() {
        let (controller, factory) = fixture_controller();
        controller.apply(intent(None)).await.unwrap();

        let before = factory.events.read().len();
        let outcome = controller
            .apply(intent(Some(PageSpec::Spread(8, 9))))
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::PageSwap);
        assert_eq!(controller.pages(), vec![8, 9]);

        // Viewer instance preserved: no new create, no destroy.
        assert_eq!(factory.created(), 1);
        assert_eq!(events_matching(&factory.events, "destroy"), 0);

        let swap: Vec<String> = factory.events.read()[before..].to_vec();
        assert_eq!(swap[0], "remove_all");
        let fit_position = swap.iter().position(|e| e == "fit").unwrap();
        let last_add = swap.iter().rposition(|e| e.starts_with("add:")).unwrap();
        assert_eq!(swap.iter().filter(|e| *e == "fit").count(), 1);
        // Fit happens only after the second page's load completed.
        assert!(fit_position > last_add);
        assert_eq!(
            swap.iter().filter(|e| e.starts_with("add:")).count(),
            2
        );
    }

    #[tokio::test]
    async fn recto_page_is_clipped_verso_is_not() {
        let (controller, factory) = fixture_controller();
        controller
            .apply(intent(Some(PageSpec::Spread(8, 9))))
            .await
            .unwrap();

        let events = factory.events.read().clone();
        // Page 8 is verso, page 9 recto in the fixture.
        assert!(events.contains(&"clip:https://tiles.example/NK/008.jpg:off".to_string()));
        assert!(events.contains(&"clip:https://tiles.example/NK/009.jpg:on".to_string()));
    }

    #[tokio::test]
    async fn zone_change_on_same_spread_touches_nothing() {
        let (controller, factory) = fixture_controller();

        let mut first = intent(Some(PageSpec::Single(2)));
        first.zone = Some(ZoneSpec::new(2, "5"));
        controller.apply(first).await.unwrap();

        let before = factory.events.read().len();
        let mut second = intent(Some(PageSpec::Single(2)));
        second.zone = Some(ZoneSpec::new(2, "7"));
        let outcome = controller.apply(second.clone()).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::ZoneUpdate);
        assert_eq!(factory.events.read().len(), before, "viewer was mutated");
        assert_eq!(factory.created(), 1);
        assert_eq!(
            controller.current_intent().unwrap().zone,
            Some(ZoneSpec::new(2, "7"))
        );

        // Idempotence: re-applying the same intent changes nothing either.
        let outcome = controller.apply(second).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::ZoneUpdate);
        assert_eq!(factory.events.read().len(), before);
    }

    #[tokio::test]
    async fn manifest_change_rebuilds_the_viewer() {
        let (controller, factory) = fixture_controller();
        controller.apply(intent(None)).await.unwrap();

        let outcome = controller
            .apply(NavigationIntent::manifest("WAB"))
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::FullReload);
        assert_eq!(factory.created(), 2);
        assert_eq!(events_matching(&factory.events, "destroy"), 1);
        assert_eq!(controller.manifest_id().as_deref(), Some("WAB"));
    }

    #[tokio::test]
    async fn teardown_failure_never_propagates() {
        let (repository, _) = fixture_repository();
        let factory = Arc::new(MockFactory::failing_destroy());
        let controller = controller_with(repository, factory.clone());

        controller.apply(intent(None)).await.unwrap();
        let outcome = controller
            .apply(NavigationIntent::manifest("WAB"))
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::FullReload);
        assert!(controller.is_ready());
    }

    #[tokio::test]
    async fn unknown_manifest_is_not_found_without_viewer() {
        let (controller, factory) = fixture_controller();
        let result = controller.apply(NavigationIntent::manifest("XX")).await;
        assert!(matches!(
            result,
            Err(NavError::Repository(fv_data::RepositoryError::NotFound(_)))
        ));
        assert!(!controller.is_ready());
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_the_controller_recoverable() {
        let transport = Arc::new(InMemoryTransport::new().with_response(
            "https://data.example/nk.json",
            TransportResponse {
                status: 502,
                body: String::new(),
            },
        ));
        let repository = Arc::new(fv_data::EditionRepository::new(
            fixture_registry(),
            transport,
        ));
        let factory = Arc::new(MockFactory::new());
        let controller = controller_with(repository, factory);

        let result = controller.apply(intent(None)).await;
        assert!(matches!(
            result,
            Err(NavError::Repository(
                fv_data::RepositoryError::FetchFailed { status: 502 }
            ))
        ));
        assert!(!controller.is_ready());
    }

    #[tokio::test]
    async fn out_of_range_spec_falls_back_to_first_page() {
        let (controller, _) = fixture_controller();
        controller
            .apply(intent(Some(PageSpec::Spread(98, 99))))
            .await
            .unwrap();
        assert_eq!(controller.pages(), vec![1]);
    }

    #[tokio::test]
    async fn stale_fetch_never_overwrites_a_newer_navigation() {
        let (transport, nk_gate) = GatedTransport::default().with_gated_response(
            "https://data.example/nk.json",
            TransportResponse::ok(wrapped_body(fixture_edition("NK", 11))),
        );
        let (transport, wab_gate) = transport.with_gated_response(
            "https://data.example/wab.json",
            TransportResponse::ok(wrapped_body(fixture_edition("WAB", 6))),
        );
        let repository = Arc::new(fv_data::EditionRepository::new(
            fixture_registry(),
            Arc::new(transport),
        ));
        let factory = Arc::new(MockFactory::new());
        let controller = controller_with(repository, factory.clone());

        let slow = tokio::spawn({
            let controller = controller.clone();
            async move { controller.apply(NavigationIntent::manifest("NK")).await }
        });
        // Give the slow navigation time to claim its epoch and block on the gate.
        tokio::task::yield_now().await;
        let fast = tokio::spawn({
            let controller = controller.clone();
            async move { controller.apply(NavigationIntent::manifest("WAB")).await }
        });

        wab_gate.notify_one();
        let fast_outcome = fast.await.unwrap().unwrap();
        assert_eq!(fast_outcome, ApplyOutcome::FullReload);

        nk_gate.notify_one();
        let slow_outcome = slow.await.unwrap().unwrap();
        assert_eq!(slow_outcome, ApplyOutcome::Stale);

        // The slow fetch resolved last but must not win.
        assert_eq!(controller.manifest_id().as_deref(), Some("WAB"));
        assert_eq!(controller.pages(), vec![1]);
    }
}
