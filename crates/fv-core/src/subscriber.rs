//! Router subscriber trait and the context snapshot passed to panels

use std::sync::Arc;

use crate::edition::Edition;
use crate::intent::{NavigationIntent, PageSpec};

/// What the viewport is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    /// No manifest loaded yet
    Empty,
    /// Edition fetch in flight; hosts show a loading placeholder
    Loading,
    /// Viewer mounted and pages placed
    Ready,
    /// Unknown manifest or unparseable path; hosts show a 404 view with a
    /// recovery link to the base path
    NotFound,
    /// Recoverable failure; hosts show the message and a recovery link
    Error(String),
}

/// Snapshot of the current navigation state, passed to panels on every change
///
/// Panels read from this snapshot only; they never reach into the viewer or
/// the history directly.
#[derive(Clone)]
pub struct RouterContext {
    pub intent: NavigationIntent,
    /// Resolved 1-based page numbers of the current spread
    pub pages: Vec<usize>,
    /// Loaded edition, present from `Ready` onwards
    pub edition: Option<Arc<Edition>>,
    pub phase: ViewPhase,
    /// Canonical path of this state, usable as a history entry or link target
    pub path: String,
    /// Target of the "previous" navigation button, when one exists
    pub prev: Option<NavTarget>,
    /// Target of the "next" navigation button, when one exists
    pub next: Option<NavTarget>,
}

/// A ready-made navigation button target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTarget {
    pub page_spec: PageSpec,
    pub path: String,
}

/// Components that re-render when the routed view changes (zone list,
/// thumbnails, navigation buttons)
pub trait RouterSubscriber: Send + Sync {
    fn on_view_change(&self, context: &RouterContext);
}
