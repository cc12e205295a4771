//! Zone list panel model

use tracing::warn;

use fv_core::{PageRecord, RouterContext, WritingZone};
use fv_data::ZoneIndex;

/// Zone rectangle as percentages of the page content box, for the position
/// preview next to a list entry
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePreview {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One row of the zone list
#[derive(Debug, Clone)]
pub struct ZoneListEntry {
    /// 1-based page the zone sits on
    pub page_index: usize,
    pub label: String,
    /// Composite address, `"<sourceLabel> <pageIndex>/<label>"`
    pub address: String,
    /// Cross-reference key for zone links, when the zone has one
    pub gen_desc_id: Option<String>,
    /// Whether this is the zone the current path highlights
    pub highlighted: bool,
    /// Position preview; absent when the zone's position data is corrupt
    pub preview: Option<ZonePreview>,
}

/// The rendered zone list: the current spread's zones, or the whole
/// edition's when the `allPages` filter is set
#[derive(Debug, Clone)]
pub struct ZoneListModel {
    pub entries: Vec<ZoneListEntry>,
    /// False when the `allPages` filter lifted the spread restriction
    pub restricted_to_spread: bool,
}

impl ZoneListModel {
    pub fn build(context: &RouterContext, index: &ZoneIndex) -> Self {
        let restricted = !context.intent.filter.all_pages();
        let zones = if restricted {
            index.zones_for_pages(&context.pages)
        } else {
            index.all_zones()
        };

        let entries = zones
            .into_iter()
            .map(|(page_number, zone)| {
                let highlighted = context.intent.zone.as_ref().is_some_and(|z| {
                    z.page_index as usize == page_number && z.label == zone.label
                });
                let preview = index
                    .edition()
                    .page(page_number)
                    .and_then(|page| normalize_position(page, zone, page_number));
                ZoneListEntry {
                    page_index: page_number,
                    label: zone.label.clone(),
                    address: index.address(page_number, &zone.label),
                    gen_desc_id: zone.identifier.gen_desc_id.clone(),
                    highlighted,
                    preview,
                }
            })
            .collect();

        Self {
            entries,
            restricted_to_spread: restricted,
        }
    }

    pub fn highlighted_entry(&self) -> Option<&ZoneListEntry> {
        self.entries.iter().find(|e| e.highlighted)
    }
}

/// Normalize a zone's crop-relative pixel position to a percentage box.
///
/// Anything outside 0–100% after normalization is corrupt data: the preview
/// is skipped with a warning, the entry itself stays in the list.
fn normalize_position(
    page: &PageRecord,
    zone: &WritingZone,
    page_number: usize,
) -> Option<ZonePreview> {
    let Some(pos) = &zone.wz_props.pos else {
        warn!(page_number, label = %zone.label, "zone has no position data");
        return None;
    };
    let crop = &page.pixel.xywh;
    if !crop.has_positive_extent() {
        warn!(page_number, label = %zone.label, "page crop is degenerate");
        return None;
    }

    let preview = ZonePreview {
        left: pos.x / crop.w * 100.0,
        top: pos.y / crop.h * 100.0,
        width: pos.w / crop.w * 100.0,
        height: pos.h / crop.h * 100.0,
    };

    let in_range = |v: f64| (0.0..=100.0).contains(&v);
    let valid = in_range(preview.left)
        && in_range(preview.top)
        && in_range(preview.left + preview.width)
        && in_range(preview.top + preview.height);
    if !valid {
        warn!(
            page_number,
            label = %zone.label,
            left = preview.left,
            top = preview.top,
            "zone position outside page bounds, skipping preview"
        );
        return None;
    }
    Some(preview)
}
