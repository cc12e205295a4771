//! Writing-zone index over a loaded edition

use std::sync::Arc;

use ahash::AHashMap;

use fv_core::{Edition, WritingZone};

/// Location of a zone within an edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLocation {
    /// 1-based page number
    pub page_index: usize,
    pub label: String,
}

/// Index from opaque cross-reference keys to zone locations.
///
/// Built once per edition load in O(total zone count); lookups are O(1).
/// The index shares the edition, so zone references stay valid as long as
/// the index lives.
pub struct ZoneIndex {
    edition: Arc<Edition>,
    by_gen_desc: AHashMap<String, ZoneLocation>,
}

impl ZoneIndex {
    pub fn build(edition: Arc<Edition>) -> Self {
        let mut by_gen_desc = AHashMap::new();
        for (i, page) in edition.pages.iter().enumerate() {
            for zone in &page.writing_zones {
                if let Some(gen_desc_id) = &zone.identifier.gen_desc_id {
                    by_gen_desc.insert(
                        gen_desc_id.clone(),
                        ZoneLocation {
                            page_index: i + 1,
                            label: zone.label.clone(),
                        },
                    );
                }
            }
        }
        Self {
            edition,
            by_gen_desc,
        }
    }

    pub fn edition(&self) -> &Arc<Edition> {
        &self.edition
    }

    /// Resolve a cross-reference key, e.g. a sketch continuing on a later page
    pub fn lookup(&self, gen_desc_id: &str) -> Option<&ZoneLocation> {
        self.by_gen_desc.get(gen_desc_id)
    }

    /// Zones of the given pages, sorted by numeric label ascending.
    ///
    /// Non-numeric labels sort after all numeric ones, in string order, so
    /// the ordering stays total on imperfect data.
    pub fn zones_for_pages(&self, pages: &[usize]) -> Vec<(usize, &WritingZone)> {
        let mut zones: Vec<(usize, &WritingZone)> = Vec::new();
        for &page_number in pages {
            if let Some(page) = self.edition.page(page_number) {
                zones.extend(page.writing_zones.iter().map(|z| (page_number, z)));
            }
        }
        zones.sort_by(|(pa, za), (pb, zb)| {
            label_sort_key(&za.label)
                .cmp(&label_sort_key(&zb.label))
                .then(pa.cmp(pb))
        });
        zones
    }

    /// Zones of every page, in the same ordering as `zones_for_pages`
    pub fn all_zones(&self) -> Vec<(usize, &WritingZone)> {
        let pages: Vec<usize> = (1..=self.edition.page_count()).collect();
        self.zones_for_pages(&pages)
    }

    /// Composite zone address, `"<sourceLabel> <pageIndex>/<label>"`
    pub fn address(&self, page_index: usize, label: &str) -> String {
        format!("{} {}/{}", self.edition.source_label, page_index, label)
    }
}

fn label_sort_key(label: &str) -> (u8, u64, String) {
    match label.parse::<u64>() {
        Ok(n) => (0, n, String::new()),
        Err(_) => (1, 0, label.to_owned()),
    }
}

/// Page grouping for display: page 1 stands alone, pages 2+ pair as (2,3),
/// (4,5), … regardless of parity; a dangling final page forms a singleton.
pub fn page_groups(total_pages: usize) -> Vec<Vec<usize>> {
    let mut groups = Vec::new();
    if total_pages == 0 {
        return groups;
    }
    groups.push(vec![1]);
    let mut left = 2;
    while left <= total_pages {
        if left + 1 <= total_pages {
            groups.push(vec![left, left + 1]);
        } else {
            groups.push(vec![left]);
        }
        left += 2;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use fv_core::{PagePixelInfo, PagePosition, PageRecord, PhysicalSize, PixelRect, ZoneIdentifier, ZoneProps};

    fn zone(label: &str, gen_desc_id: Option<&str>) -> WritingZone {
        WritingZone {
            identifier: ZoneIdentifier {
                zone_id: format!("wz-{label}"),
                gen_desc_id: gen_desc_id.map(str::to_owned),
                at_filename: None,
            },
            label: label.to_owned(),
            wz_props: ZoneProps::default(),
            sketch_props: serde_json::Value::Null,
            work_relations: serde_json::Value::Null,
        }
    }

    fn page(position: PagePosition, zones: Vec<WritingZone>) -> PageRecord {
        PageRecord {
            target: "https://tiles.example/p.jpg".into(),
            pixel: PagePixelInfo {
                xywh: PixelRect::new(0.0, 0.0, 1800.0, 2600.0),
                rotation: 0.0,
                width: 2000.0,
                height: 2800.0,
            },
            physical: PhysicalSize {
                width: 225.0,
                height: 325.0,
            },
            position,
            writing_zones: zones,
            surface_doc: None,
            surface_label: None,
        }
    }

    fn sample_edition() -> Arc<Edition> {
        Arc::new(Edition {
            source_label: "NK".into(),
            pages: vec![
                page(PagePosition::Recto, vec![zone("2", Some("gd-a"))]),
                page(
                    PagePosition::Verso,
                    vec![zone("10", None), zone("1", Some("gd-b")), zone("b", None)],
                ),
                page(PagePosition::Recto, vec![zone("3", Some("gd-c"))]),
            ],
        })
    }

    #[test]
    fn lookup_resolves_gen_desc_ids() {
        let index = ZoneIndex::build(sample_edition());
        let loc = index.lookup("gd-c").unwrap();
        assert_eq!(loc.page_index, 3);
        assert_eq!(loc.label, "3");
        assert!(index.lookup("gd-x").is_none());
    }

    #[test]
    fn zones_sort_by_numeric_label() {
        let index = ZoneIndex::build(sample_edition());
        let zones = index.zones_for_pages(&[2, 3]);
        let labels: Vec<&str> = zones.iter().map(|(_, z)| z.label.as_str()).collect();
        // Numeric ascending, non-numeric last.
        assert_eq!(labels, vec!["1", "3", "10", "b"]);
    }

    #[test]
    fn missing_pages_are_ignored() {
        let index = ZoneIndex::build(sample_edition());
        assert_eq!(index.zones_for_pages(&[99]).len(), 0);
    }

    #[test]
    fn address_is_composite() {
        let index = ZoneIndex::build(sample_edition());
        assert_eq!(index.address(2, "5"), "NK 2/5");
    }

    #[test]
    fn grouping_pairs_from_page_two() {
        assert_eq!(page_groups(0), Vec::<Vec<usize>>::new());
        assert_eq!(page_groups(1), vec![vec![1]]);
        assert_eq!(page_groups(5), vec![vec![1], vec![2, 3], vec![4, 5]]);
        // Even total: the last page dangles as a singleton.
        assert_eq!(
            page_groups(6),
            vec![vec![1], vec![2, 3], vec![4, 5], vec![6]]
        );
        assert_eq!(
            page_groups(11),
            vec![
                vec![1],
                vec![2, 3],
                vec![4, 5],
                vec![6, 7],
                vec![8, 9],
                vec![10, 11]
            ]
        );
    }
}
