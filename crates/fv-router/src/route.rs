//! Path parsing and canonical path construction
//!
//! Grammar, relative to a fixed base path:
//!
//! ```text
//! /                                  redirect to the default manifest
//! /{manifestId}/                     first page
//! /{manifestId}/p{N}/                single page
//! /{manifestId}/p{L}-{R}/            spread
//! …/filter:{csv}/  …/wz{page}.{label}/   trailing, order-independent
//! ```

use fv_core::{FilterSpec, NavigationIntent, PageSpec, ZoneSpec};

const PAGE_MARKER: char = 'p';
const FILTER_MARKER: &str = "filter:";
const ZONE_MARKER: &str = "wz";

/// Outcome of parsing one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Empty path; the router redirects to the default manifest
    DefaultRedirect,
    View(NavigationIntent),
    /// Unknown segment pattern; rendered as a 404 view
    NotFound,
}

/// Parse a path (already stripped of the base path) into a route.
///
/// Pure function: no DOM, no network, no state.
pub fn parse(path: &str) -> Route {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let Some((manifest_id, rest)) = segments.split_first() else {
        return Route::DefaultRedirect;
    };

    let mut intent = NavigationIntent::manifest(*manifest_id);

    // Only the segment right after the manifest id may carry the page marker.
    let mut rest = rest;
    if let Some((first, tail)) = rest.split_first() {
        if let Some(spec) = first.strip_prefix(PAGE_MARKER) {
            match parse_page_spec(spec) {
                Some(spec) => {
                    intent.page_spec = Some(spec);
                    rest = tail;
                }
                None => return Route::NotFound,
            }
        }
    }

    // Remaining segments: at most one filter and one zone, in any order.
    for segment in rest {
        if let Some(csv) = segment.strip_prefix(FILTER_MARKER) {
            if !intent.filter.is_empty() {
                return Route::NotFound;
            }
            intent.filter = FilterSpec::from_csv(csv);
        } else if let Some(zone) = segment.strip_prefix(ZONE_MARKER) {
            if intent.zone.is_some() {
                return Route::NotFound;
            }
            match parse_zone_spec(zone) {
                Ok(zone) => intent.zone = Some(zone),
                Err(ZoneSpecError) => return Route::NotFound,
            }
        } else {
            return Route::NotFound;
        }
    }

    Route::View(intent)
}

fn parse_page_spec(spec: &str) -> Option<PageSpec> {
    match spec.split_once('-') {
        Some((l, r)) => {
            let l = l.parse().ok()?;
            let r = r.parse().ok()?;
            Some(PageSpec::Spread(l, r))
        }
        None => spec.parse().ok().map(PageSpec::Single),
    }
}

/// Malformed zone spec, e.g. a non-numeric page index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSpecError;

/// Decompose `"<pageIndex>.<label>"`. Malformed input is an error for the
/// caller to handle, never silently defaulted.
pub fn parse_zone_spec(spec: &str) -> Result<ZoneSpec, ZoneSpecError> {
    let (page, label) = spec.split_once('.').ok_or(ZoneSpecError)?;
    let page_index: u32 = page.parse().map_err(|_| ZoneSpecError)?;
    if label.is_empty() {
        return Err(ZoneSpecError);
    }
    Ok(ZoneSpec::new(page_index, label))
}

/// Canonical path of an intent, the inverse of [`parse`] up to
/// canonicalization. Used for history entries and link targets.
pub fn build_path(intent: &NavigationIntent, base_path: &str) -> String {
    let mut path = format!("{}/{}/", base_path, intent.manifest_id);
    if let Some(spec) = &intent.page_spec {
        path.push(PAGE_MARKER);
        path.push_str(&spec.to_path_fragment());
        path.push('/');
    }
    if !intent.filter.is_empty() {
        path.push_str(FILTER_MARKER);
        path.push_str(&intent.filter.to_csv());
        path.push('/');
    }
    if let Some(zone) = &intent.zone {
        path.push_str(ZONE_MARKER);
        path.push_str(&zone.to_path_fragment());
        path.push('/');
    }
    path
}
