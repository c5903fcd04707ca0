//! Catalog entities as the client sees them.
//!
//! The REST API is inconsistent about the `region` field of a billboard: some
//! endpoints embed the region object, others send its id, and unlinked
//! billboards send `null`. [`RegionRef`] accepts all of those on the wire and
//! [`BillboardRecord::normalize`] turns them into a single [`RegionLink`] shape
//! so nothing past the data-access boundary has to check again.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// Region reference exactly as the API sends it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RegionRef {
    Embedded {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
    Id(String),
}

/// Normalized region reference carried by every [`Billboard`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionLink {
    pub id: String,
    pub name: Option<String>,
}

impl From<RegionRef> for RegionLink {
    fn from(region_ref: RegionRef) -> Self {
        match region_ref {
            RegionRef::Embedded { id, name } => RegionLink {
                id,
                name: name.filter(|name| !name.trim().is_empty()),
            },
            RegionRef::Id(id) => RegionLink { id, name: None },
        }
    }
}

/// Billboard record as decoded from the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillboardRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub street_label: Option<String>,
    #[serde(default)]
    pub region: Option<RegionRef>,
}

impl BillboardRecord {
    pub fn normalize(self) -> Billboard {
        Billboard {
            id: self.id,
            code: self.code,
            street_label: self.street_label.filter(|label| !label.trim().is_empty()),
            // A blank id is how some records say "no region".
            region: self
                .region
                .map(RegionLink::from)
                .filter(|link| !link.id.trim().is_empty()),
        }
    }
}

/// A billboard ("placa") snapshot. The client never mutates these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Billboard {
    pub id: String,
    pub code: String,
    pub street_label: Option<String>,
    pub region: Option<RegionLink>,
}

impl Billboard {
    pub fn region_id(&self) -> Option<&str> {
        self.region.as_ref().map(|link| link.id.as_str())
    }

    /// Case-insensitive substring match over code and street label.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.code.to_lowercase().contains(needle_lower)
            || self
                .street_label
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(needle_lower))
    }
}

pub fn normalize_billboards(records: Vec<BillboardRecord>) -> Vec<Billboard> {
    records.into_iter().map(BillboardRecord::normalize).collect()
}

/// Effective query parameters for a billboard listing.
///
/// Doubles as the cache key, so two filters that would produce the same request
/// must compare equal. Use [`BillboardFilter::from_input`] to build one from raw
/// widget state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BillboardFilter {
    pub region_id: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl BillboardFilter {
    pub fn all(limit: usize) -> Self {
        Self {
            region_id: None,
            search: None,
            limit: Some(limit),
        }
    }

    /// `selected_region` uses the empty string for "all regions".
    pub fn from_input(selected_region: &str, search_text: &str, limit: usize) -> Self {
        let region_id = Some(selected_region.trim())
            .filter(|region| !region.is_empty())
            .map(str::to_string);
        let search = Some(search_text.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Self {
            region_id,
            search,
            limit: Some(limit),
        }
    }

    pub fn matches(&self, billboard: &Billboard) -> bool {
        if let Some(region_id) = &self.region_id {
            if billboard.region_id() != Some(region_id.as_str()) {
                return false;
            }
        }
        match &self.search {
            Some(search) => billboard.matches_search(&search.to_lowercase()),
            None => true,
        }
    }

    /// Server-side semantics of the listing endpoint: keep order, filter, cap.
    pub fn apply<'a>(&self, billboards: impl IntoIterator<Item = &'a Billboard>) -> Vec<Billboard> {
        let limit = self.limit.unwrap_or(usize::MAX);
        billboards
            .into_iter()
            .filter(|billboard| self.matches(billboard))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Query parameters in a stable order, values not yet URL-encoded.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(region_id) = &self.region_id {
            pairs.push(("region_id", region_id.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billboard(id: &str, code: &str, street: Option<&str>, region: Option<&str>) -> Billboard {
        Billboard {
            id: id.to_string(),
            code: code.to_string(),
            street_label: street.map(str::to_string),
            region: region.map(|id| RegionLink {
                id: id.to_string(),
                name: None,
            }),
        }
    }

    #[test]
    fn region_reference_shapes_normalize_to_one_link() {
        let json = r#"[
            {"id": "b1", "code": "P-001", "region": {"id": "r1", "name": "North"}},
            {"_id": "b2", "code": "P-002", "region": "r2", "streetLabel": "Av. Brasil"},
            {"id": "b3", "code": "P-003", "region": null},
            {"id": "b4", "code": "P-004"},
            {"id": "b5", "code": "P-005", "region": {"_id": "r5"}}
        ]"#;
        let records: Vec<BillboardRecord> = serde_json::from_str(json).unwrap();
        let billboards = normalize_billboards(records);

        assert_eq!(
            billboards[0].region,
            Some(RegionLink { id: "r1".into(), name: Some("North".into()) })
        );
        assert_eq!(billboards[1].id, "b2");
        assert_eq!(billboards[1].region, Some(RegionLink { id: "r2".into(), name: None }));
        assert_eq!(billboards[1].street_label.as_deref(), Some("Av. Brasil"));
        assert_eq!(billboards[2].region, None);
        assert_eq!(billboards[3].region, None);
        assert_eq!(billboards[4].region, Some(RegionLink { id: "r5".into(), name: None }));
    }

    #[test]
    fn blank_region_id_counts_as_unlinked() {
        let record = BillboardRecord {
            id: "b1".into(),
            code: "P-1".into(),
            street_label: Some("  ".into()),
            region: Some(RegionRef::Id(String::new())),
        };
        let billboard = record.normalize();
        assert_eq!(billboard.region, None);
        assert_eq!(billboard.street_label, None);
    }

    #[test]
    fn filter_from_input_treats_blank_as_absent() {
        let filter = BillboardFilter::from_input("", "   ", 1000);
        assert_eq!(filter, BillboardFilter::all(1000));

        let filter = BillboardFilter::from_input("r1", "  av ", 1000);
        assert_eq!(filter.region_id.as_deref(), Some("r1"));
        assert_eq!(filter.search.as_deref(), Some("av"));
    }

    #[test]
    fn apply_filters_by_region_and_search_keeping_order() {
        let billboards = vec![
            billboard("b1", "P-001", Some("Rua Augusta"), Some("r1")),
            billboard("b2", "P-002", Some("Av. Paulista"), Some("r2")),
            billboard("b3", "X-003", Some("Rua da Consolação"), Some("r1")),
            billboard("b4", "P-004", None, None),
        ];

        let by_region = BillboardFilter::from_input("r1", "", 10).apply(&billboards);
        let ids: Vec<_> = by_region.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b3"]);

        let by_search = BillboardFilter::from_input("", "RUA", 10).apply(&billboards);
        let ids: Vec<_> = by_search.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b3"]);

        let by_code = BillboardFilter::from_input("", "p-00", 2).apply(&billboards);
        let ids: Vec<_> = by_code.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2"]);
    }

    #[test]
    fn query_pairs_skip_absent_parameters() {
        let filter = BillboardFilter::from_input("r1", "", 1000);
        assert_eq!(
            filter.query_pairs(),
            vec![("region_id", "r1".to_string()), ("limit", "1000".to_string())]
        );
    }
}
