//! Thumbnail strip model

use fv_core::RouterContext;
use fv_router::route::build_path;
use fv_router::sequence::group_spec_for_page;

/// One thumbnail; clicking it navigates to the page's display group
#[derive(Debug, Clone)]
pub struct ThumbnailEntry {
    /// 1-based page number
    pub page_number: usize,
    pub image_uri: String,
    /// Provenance label when the edition has one, else the page number
    pub caption: String,
    /// Whether the page is part of the current spread
    pub active: bool,
    pub path: String,
}

/// All pages of the edition as thumbnails
#[derive(Debug, Clone, Default)]
pub struct ThumbnailStrip {
    pub entries: Vec<ThumbnailEntry>,
}

impl ThumbnailStrip {
    pub fn build(context: &RouterContext, base_path: &str) -> Self {
        let Some(edition) = &context.edition else {
            return Self::default();
        };
        let total = edition.page_count();

        let entries = edition
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let page_number = i + 1;
                let mut intent = context.intent.clone();
                intent.page_spec = Some(group_spec_for_page(page_number, total));
                intent.zone = None;
                ThumbnailEntry {
                    page_number,
                    image_uri: page.target.clone(),
                    caption: page
                        .surface_label
                        .clone()
                        .unwrap_or_else(|| format!("p. {page_number}")),
                    active: context.pages.contains(&page_number),
                    path: build_path(&intent, base_path),
                }
            })
            .collect();

        Self { entries }
    }
}
