//! Loading / not-found / error status overlay

use fv_core::{RouterContext, ViewPhase};

/// What the overlay shows; `Hidden` while a view is ready (or before the
/// router has started)
#[derive(Debug, Clone, PartialEq)]
pub enum StatusView {
    Hidden,
    Loading {
        manifest_id: String,
    },
    NotFound {
        requested_path: String,
        recovery_path: String,
    },
    Error {
        message: String,
        recovery_path: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusViewModel {
    pub view: StatusView,
}

impl StatusViewModel {
    pub fn build(context: &RouterContext, base_path: &str) -> Self {
        let recovery = format!("{base_path}/");
        let view = match &context.phase {
            ViewPhase::Empty | ViewPhase::Ready => StatusView::Hidden,
            ViewPhase::Loading => StatusView::Loading {
                manifest_id: context.intent.manifest_id.clone(),
            },
            ViewPhase::NotFound => StatusView::NotFound {
                requested_path: context.path.clone(),
                recovery_path: recovery,
            },
            ViewPhase::Error(message) => StatusView::Error {
                message: message.clone(),
                recovery_path: recovery,
            },
        };
        Self { view }
    }

    pub fn visible(&self) -> bool {
        self.view != StatusView::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fv_core::NavigationIntent;

    fn context(phase: ViewPhase, path: &str) -> RouterContext {
        RouterContext {
            intent: NavigationIntent::manifest("NK"),
            pages: Vec::new(),
            edition: None,
            phase,
            path: path.into(),
            prev: None,
            next: None,
        }
    }

    #[test]
    fn ready_view_hides_the_overlay() {
        let model = StatusViewModel::build(&context(ViewPhase::Ready, "/facs/NK/"), "/facs");
        assert!(!model.visible());
    }

    #[test]
    fn not_found_offers_a_way_back() {
        let ctx = context(ViewPhase::NotFound, "/facs/NK/bogus/extra/");
        let model = StatusViewModel::build(&ctx, "/facs");
        assert_eq!(
            model.view,
            StatusView::NotFound {
                requested_path: "/facs/NK/bogus/extra/".into(),
                recovery_path: "/facs/".into(),
            }
        );
    }

    #[test]
    fn fetch_failures_surface_their_message() {
        let ctx = context(ViewPhase::Error("fetch failed with status 503".into()), "/facs/NK/");
        let model = StatusViewModel::build(&ctx, "/facs");
        match model.view {
            StatusView::Error { message, recovery_path } => {
                assert!(message.contains("503"));
                assert_eq!(recovery_path, "/facs/");
            }
            other => panic!("expected an error view, got {other:?}"),
        }
    }
}
