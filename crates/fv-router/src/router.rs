//! Top-level navigation orchestration
//!
//! The router is the single writer of browser history. It turns intercepted
//! link clicks and history pops into parsed intents, hands them to the
//! viewport controller, and notifies panel subscribers with a state
//! snapshot. Panels read from those snapshots only.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, warn};

use fv_core::{
    NavTarget, NavigationIntent, RouterContext, RouterSubscriber, ViewPhase, ZoneSpec,
};
use fv_data::RepositoryError;

use crate::route::{build_path, parse, Route};
use crate::sequence;
use crate::viewport::{ApplyOutcome, ViewportController};
use crate::NavError;

/// Browser history seam: push/replace entries and read the current path.
/// Process-wide, single-writer; only the router calls `push`/`replace`.
pub trait HistoryPort: Send + Sync {
    fn push(&self, path: &str);
    fn replace(&self, path: &str);
    fn current_path(&self) -> String;
}

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Fixed prefix all in-app paths share
    pub base_path: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_path: "/facs".into(),
        }
    }
}

/// Direction of arrow-key zone stepping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneStep {
    Next,
    Previous,
}

enum HistoryMode {
    Push,
    Replace,
    Keep,
}

pub struct Router {
    controller: Arc<ViewportController>,
    history: Arc<dyn HistoryPort>,
    config: RouterConfig,
    subscribers: RwLock<Vec<Weak<dyn RouterSubscriber>>>,
    current: RwLock<Option<RouterContext>>,
}

impl Router {
    pub fn new(
        controller: Arc<ViewportController>,
        history: Arc<dyn HistoryPort>,
        config: RouterConfig,
    ) -> Self {
        Self {
            controller,
            history,
            config,
            subscribers: RwLock::new(Vec::new()),
            current: RwLock::new(None),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    pub fn controller(&self) -> &Arc<ViewportController> {
        &self.controller
    }

    /// Resolve the path the session starts on
    pub async fn start(&self) {
        let path = self.history.current_path();
        self.handle(&path, HistoryMode::Replace).await;
    }

    /// An intercepted in-app link click
    pub async fn navigate(&self, path: &str) {
        self.handle(path, HistoryMode::Push).await;
    }

    /// Browser back/forward changed the current path
    pub async fn on_pop(&self) {
        let path = self.history.current_path();
        self.handle(&path, HistoryMode::Keep).await;
    }

    /// Programmatic navigation; pushes the canonical path of the intent
    pub async fn navigate_to_intent(&self, intent: NavigationIntent) {
        self.run_intent(intent, HistoryMode::Push).await;
    }

    /// Arrow-key stepping through the currently rendered zone list, with
    /// wraparound at both ends. Returns false when there is nothing to step.
    pub async fn step_zone(&self, step: ZoneStep) -> bool {
        let Some(intent) = self.controller.current_intent() else {
            return false;
        };
        let Some(index) = self.controller.zone_index() else {
            return false;
        };

        let target = {
            let zones = if intent.filter.all_pages() {
                index.all_zones()
            } else {
                index.zones_for_pages(&self.controller.pages())
            };
            if zones.is_empty() {
                return false;
            }
            let current = intent.zone.as_ref().and_then(|z| {
                zones
                    .iter()
                    .position(|(p, zone)| *p as u32 == z.page_index && zone.label == z.label)
            });
            let len = zones.len();
            let next = match (step, current) {
                (ZoneStep::Next, Some(i)) => (i + 1) % len,
                (ZoneStep::Previous, Some(i)) => (i + len - 1) % len,
                (ZoneStep::Next, None) => 0,
                (ZoneStep::Previous, None) => len - 1,
            };
            let (page, zone) = &zones[next];
            ZoneSpec::new(*page as u32, zone.label.clone())
        };

        let mut next_intent = intent;
        next_intent.zone = Some(target);
        self.navigate_to_intent(next_intent).await;
        true
    }

    /// Follow a cross-page zone link by its opaque cross-reference key
    pub async fn navigate_to_zone(&self, gen_desc_id: &str) -> bool {
        let Some(intent) = self.controller.current_intent() else {
            return false;
        };
        let Some(index) = self.controller.zone_index() else {
            return false;
        };
        let Some((page_index, label)) = index
            .lookup(gen_desc_id)
            .map(|loc| (loc.page_index, loc.label.clone()))
        else {
            debug!(gen_desc_id, "zone link target not in this edition");
            return false;
        };

        let total = index.edition().page_count();
        let mut next_intent = intent;
        next_intent.page_spec = Some(sequence::group_spec_for_page(page_index, total));
        next_intent.zone = Some(ZoneSpec::new(page_index as u32, label));
        self.navigate_to_intent(next_intent).await;
        true
    }

    /// Latest snapshot handed to subscribers
    pub fn current_context(&self) -> Option<RouterContext> {
        self.current.read().clone()
    }

    pub fn add_subscriber(&self, subscriber: Arc<dyn RouterSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    async fn handle(&self, path: &str, mode: HistoryMode) {
        let relative = path
            .strip_prefix(&self.config.base_path)
            .unwrap_or(path);

        match parse(relative) {
            Route::DefaultRedirect => {
                let Some(default_id) = self
                    .controller
                    .repository()
                    .registry()
                    .default_manifest()
                    .map(str::to_owned)
                else {
                    warn!("no default manifest registered");
                    self.publish_failure(NavigationIntent::manifest(""), ViewPhase::NotFound, path);
                    return;
                };
                // The root path is never a history entry of its own.
                self.run_intent(NavigationIntent::manifest(default_id), HistoryMode::Replace)
                    .await;
            }
            Route::View(intent) => self.run_intent(intent, mode).await,
            Route::NotFound => {
                debug!(path, "unparseable path");
                self.publish_failure(NavigationIntent::manifest(""), ViewPhase::NotFound, path);
            }
        }
    }

    async fn run_intent(&self, intent: NavigationIntent, mode: HistoryMode) {
        let canonical = build_path(&intent, &self.config.base_path);

        // A reload shows its loading placeholder before the fetch resolves.
        if self.controller.manifest_id().as_deref() != Some(intent.manifest_id.as_str())
            || !self.controller.is_ready()
        {
            self.publish(self.snapshot(intent.clone(), ViewPhase::Loading, &canonical));
        }

        match self.controller.apply(intent.clone()).await {
            Ok(ApplyOutcome::Stale) => {
                // A newer navigation owns the visible state; drop this one.
                debug!(path = %canonical, "stale navigation discarded");
            }
            Ok(_) => {
                self.record_history(&canonical, mode);
                self.publish(self.snapshot(intent, ViewPhase::Ready, &canonical));
            }
            Err(NavError::Repository(RepositoryError::NotFound(id))) => {
                debug!(manifest_id = %id, "unknown manifest");
                self.record_history(&canonical, mode);
                self.publish_failure(intent, ViewPhase::NotFound, &canonical);
            }
            Err(err) => {
                warn!(%err, "navigation failed");
                self.record_history(&canonical, mode);
                self.publish_failure(intent, ViewPhase::Error(err.to_string()), &canonical);
            }
        }
    }

    fn record_history(&self, path: &str, mode: HistoryMode) {
        match mode {
            HistoryMode::Push => self.history.push(path),
            HistoryMode::Replace => self.history.replace(path),
            HistoryMode::Keep => {}
        }
    }

    fn snapshot(&self, intent: NavigationIntent, phase: ViewPhase, path: &str) -> RouterContext {
        let ready = phase == ViewPhase::Ready;
        let pages = if ready { self.controller.pages() } else { Vec::new() };
        let edition = if ready { self.controller.edition() } else { None };

        let (prev, next) = match &edition {
            Some(edition) => {
                let total = edition.page_count();
                let target = |spec| {
                    // Nav buttons keep the filter but drop the zone highlight.
                    let mut intent = intent.clone();
                    intent.page_spec = Some(spec);
                    intent.zone = None;
                    NavTarget {
                        page_spec: spec,
                        path: build_path(&intent, &self.config.base_path),
                    }
                };
                (
                    sequence::prev_spec(&pages, total).map(target),
                    sequence::next_spec(&pages, total).map(target),
                )
            }
            None => (None, None),
        };

        RouterContext {
            intent,
            pages,
            edition,
            phase,
            path: path.to_owned(),
            prev,
            next,
        }
    }

    fn publish_failure(&self, intent: NavigationIntent, phase: ViewPhase, path: &str) {
        self.publish(self.snapshot(intent, phase, path));
    }

    fn publish(&self, context: RouterContext) {
        *self.current.write() = Some(context.clone());

        let mut subscribers = self.subscribers.write();
        subscribers.retain(|weak| weak.strong_count() > 0);
        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_view_change(&context);
            }
        }
    }
}
