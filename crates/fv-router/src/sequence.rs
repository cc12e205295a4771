//! Prev/next sequencing over page spreads
//!
//! Page 1 always stands alone; from page 2 on, pages group as left-right
//! pairs. A dangling final page is shown single.

use fv_core::PageSpec;
use fv_data::page_groups;

/// Target of the "previous" button for the currently resolved pages
pub fn prev_spec(current: &[usize], _total_pages: usize) -> Option<PageSpec> {
    match current {
        [l, _r] => {
            let l = *l as u32;
            if l > 2 {
                Some(PageSpec::Spread(l - 2, l - 1))
            } else if l == 2 {
                Some(PageSpec::Single(1))
            } else {
                None
            }
        }
        [p] => {
            let p = *p as u32;
            (p > 1).then(|| PageSpec::Single(p - 1))
        }
        _ => None,
    }
}

/// Target of the "next" button for the currently resolved pages
pub fn next_spec(current: &[usize], total_pages: usize) -> Option<PageSpec> {
    let total = total_pages as u32;
    match current {
        [_l, r] => {
            let r = *r as u32;
            if r < total.saturating_sub(1) {
                Some(PageSpec::Spread(r + 1, r + 2))
            } else if r == total.saturating_sub(1) {
                Some(PageSpec::Single(total))
            } else {
                None
            }
        }
        [1] => {
            // Page 1 hands over to the first pair, clamped for tiny editions.
            if total >= 3 {
                Some(PageSpec::Spread(2, 3))
            } else if total == 2 {
                Some(PageSpec::Single(2))
            } else {
                None
            }
        }
        [p] => {
            let p = *p as u32;
            (p < total).then(|| PageSpec::Single(p + 1))
        }
        _ => None,
    }
}

/// The display group a page belongs to: `[1]`, `[2,3]`, `[4,5]`, …
///
/// Delegates to [`page_groups`] so the grouping policy has a single home.
pub fn group_spec_for_page(page: usize, total_pages: usize) -> PageSpec {
    let group = page_groups(total_pages)
        .into_iter()
        .find(|group| group.contains(&page));
    match group.as_deref() {
        Some([l, r]) => PageSpec::Spread(*l as u32, *r as u32),
        Some([p]) => PageSpec::Single(*p as u32),
        _ => PageSpec::Single(1),
    }
}
