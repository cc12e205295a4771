//! Prev/next navigation button model

use fv_core::{NavTarget, RouterContext};

/// One navigation button; disabled buttons render greyed out
#[derive(Debug, Clone)]
pub struct NavButton {
    pub enabled: bool,
    pub target: Option<NavTarget>,
}

impl NavButton {
    fn from_target(target: Option<NavTarget>) -> Self {
        Self {
            enabled: target.is_some(),
            target,
        }
    }
}

/// Both spread-navigation buttons, straight from the router context
#[derive(Debug, Clone)]
pub struct NavButtonsModel {
    pub prev: NavButton,
    pub next: NavButton,
}

impl NavButtonsModel {
    pub fn build(context: &RouterContext) -> Self {
        Self {
            prev: NavButton::from_target(context.prev.clone()),
            next: NavButton::from_target(context.next.clone()),
        }
    }
}
