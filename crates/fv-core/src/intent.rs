//! Navigation intents derived from URL paths

use serde::{Deserialize, Serialize};

/// A materialized navigation request: which manifest, which spread, which
/// zone highlight and which display filters
///
/// Intents are transient; they are recomputed on every navigation and owned
/// by the current render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub manifest_id: String,
    /// Absent means "first page"
    pub page_spec: Option<PageSpec>,
    pub filter: FilterSpec,
    pub zone: Option<ZoneSpec>,
}

impl NavigationIntent {
    pub fn manifest(manifest_id: impl Into<String>) -> Self {
        Self {
            manifest_id: manifest_id.into(),
            page_spec: None,
            filter: FilterSpec::default(),
            zone: None,
        }
    }

    pub fn with_pages(mut self, spec: PageSpec) -> Self {
        self.page_spec = Some(spec);
        self
    }

    pub fn with_zone(mut self, zone: ZoneSpec) -> Self {
        self.zone = Some(zone);
        self
    }
}

/// A single page or a left-right spread, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSpec {
    Single(u32),
    Spread(u32, u32),
}

impl PageSpec {
    /// Resolve to concrete page numbers against an edition's page count.
    ///
    /// Out-of-range indices are filtered rather than rejected; callers decide
    /// what an empty result means.
    pub fn resolve(&self, total_pages: usize) -> Vec<usize> {
        let in_range = |n: u32| {
            let n = n as usize;
            (n >= 1 && n <= total_pages).then_some(n)
        };
        match self {
            PageSpec::Single(p) => in_range(*p).into_iter().collect(),
            PageSpec::Spread(l, r) => in_range(*l).into_iter().chain(in_range(*r)).collect(),
        }
    }

    /// Canonical text form, `"8"` or `"8-9"`
    pub fn to_path_fragment(&self) -> String {
        match self {
            PageSpec::Single(p) => p.to_string(),
            PageSpec::Spread(l, r) => format!("{l}-{r}"),
        }
    }
}

/// Set of named display toggles from the `filter:` path segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    toggles: Vec<String>,
}

impl FilterSpec {
    /// Toggle that lifts the "current spread only" zone restriction
    pub const ALL_PAGES: &'static str = "allPages";

    /// Parse a comma-separated toggle list, dropping empty entries and
    /// duplicates while preserving first-seen order
    pub fn from_csv(csv: &str) -> Self {
        let mut toggles = Vec::new();
        for part in csv.split(',') {
            let part = part.trim();
            if !part.is_empty() && !toggles.iter().any(|t| t == part) {
                toggles.push(part.to_owned());
            }
        }
        Self { toggles }
    }

    pub fn is_empty(&self) -> bool {
        self.toggles.is_empty()
    }

    pub fn contains(&self, toggle: &str) -> bool {
        self.toggles.iter().any(|t| t == toggle)
    }

    /// Whether the zone list should cover the whole edition instead of the
    /// current spread
    pub fn all_pages(&self) -> bool {
        self.contains(Self::ALL_PAGES)
    }

    pub fn to_csv(&self) -> String {
        self.toggles.join(",")
    }
}

/// Zone highlight request: `"<pageIndex>.<label>"` in the path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub page_index: u32,
    pub label: String,
}

impl ZoneSpec {
    pub fn new(page_index: u32, label: impl Into<String>) -> Self {
        Self {
            page_index,
            label: label.into(),
        }
    }

    pub fn to_path_fragment(&self) -> String {
        format!("{}.{}", self.page_index, self.label)
    }
}
