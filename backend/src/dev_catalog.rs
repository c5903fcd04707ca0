//! Development catalog: serves `/regions` and `/billboards` from a TOML fixture
//! so the picker can run without the real catalog service.

use shared::config::MAX_LISTING_LIMIT;
use shared::{Billboard, BillboardFilter, BillboardRecord, Region, RegionLink, RegionRef};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog fixture: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Debug, Default)]
struct CatalogFixture {
    #[serde(default)]
    regions: Vec<Region>,
    #[serde(default)]
    billboards: Vec<FixtureBillboard>,
}

#[derive(Deserialize, Debug)]
struct FixtureBillboard {
    id: String,
    code: String,
    #[serde(default)]
    street_label: Option<String>,
    /// Region id; may point at a region the fixture does not list.
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DevCatalog {
    regions: Vec<Region>,
    billboards: Vec<Billboard>,
}

/// Query string of `GET /billboards`.
#[derive(Deserialize, Debug, Default)]
pub struct BillboardQuery {
    pub region_id: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl BillboardQuery {
    pub fn into_filter(self) -> BillboardFilter {
        let limit = self.limit.unwrap_or(MAX_LISTING_LIMIT).min(MAX_LISTING_LIMIT);
        BillboardFilter::from_input(
            self.region_id.as_deref().unwrap_or_default(),
            self.search.as_deref().unwrap_or_default(),
            limit,
        )
    }
}

impl DevCatalog {
    pub fn from_toml_str(content: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = toml::from_str(content)?;
        let names: HashMap<&str, &str> = fixture
            .regions
            .iter()
            .map(|region| (region.id.as_str(), region.name.as_str()))
            .collect();

        let billboards = fixture
            .billboards
            .into_iter()
            .map(|billboard| {
                let region = billboard.region.map(|id| RegionLink {
                    name: names.get(id.as_str()).map(|name| name.to_string()),
                    id,
                });
                Billboard {
                    id: billboard.id,
                    code: billboard.code,
                    street_label: billboard.street_label,
                    region,
                }
            })
            .collect();

        Ok(Self {
            regions: fixture.regions,
            billboards,
        })
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn billboard_count(&self) -> usize {
        self.billboards.len()
    }

    /// Wire records for `filter`. Linked regions go out embedded, dangling
    /// ones as a bare id, the way the real API mixes both.
    pub fn listing(&self, filter: &BillboardFilter) -> Vec<BillboardRecord> {
        filter
            .apply(&self.billboards)
            .into_iter()
            .map(to_record)
            .collect()
    }
}

fn to_record(billboard: Billboard) -> BillboardRecord {
    BillboardRecord {
        id: billboard.id,
        code: billboard.code,
        street_label: billboard.street_label,
        region: billboard.region.map(|link| match link.name {
            Some(name) => RegionRef::Embedded {
                id: link.id,
                name: Some(name),
            },
            None => RegionRef::Id(link.id),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        [[regions]]
        id = "r1"
        name = "Centro"

        [[billboards]]
        id = "b1"
        code = "P-001"
        street_label = "Av. Paulista, 1000"
        region = "r1"

        [[billboards]]
        id = "b2"
        code = "P-002"

        [[billboards]]
        id = "b3"
        code = "P-003"
        street_label = "Rua Augusta, 50"
        region = "r9"
    "#;

    fn catalog() -> DevCatalog {
        DevCatalog::from_toml_str(FIXTURE).unwrap()
    }

    #[test]
    fn fixture_links_known_regions_by_name() {
        let catalog = catalog();
        assert_eq!(catalog.regions().len(), 1);
        assert_eq!(catalog.billboard_count(), 3);

        let records = catalog.listing(&BillboardFilter::all(10));
        assert_eq!(
            records[0].region,
            Some(RegionRef::Embedded {
                id: "r1".into(),
                name: Some("Centro".into()),
            })
        );
        assert_eq!(records[1].region, None);
        assert_eq!(records[2].region, Some(RegionRef::Id("r9".into())));
    }

    #[test]
    fn query_filters_by_region_and_search() {
        let catalog = catalog();
        let by_region = BillboardQuery {
            region_id: Some("r1".into()),
            ..BillboardQuery::default()
        };
        let ids: Vec<_> = catalog
            .listing(&by_region.into_filter())
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, ["b1"]);

        let by_street = BillboardQuery {
            search: Some("AUGUSTA".into()),
            ..BillboardQuery::default()
        };
        let ids: Vec<_> = catalog
            .listing(&by_street.into_filter())
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, ["b3"]);
    }

    #[test]
    fn limit_caps_the_listing_and_is_bounded() {
        let catalog = catalog();
        let query = BillboardQuery {
            limit: Some(2),
            ..BillboardQuery::default()
        };
        assert_eq!(catalog.listing(&query.into_filter()).len(), 2);

        let huge = BillboardQuery {
            limit: Some(usize::MAX),
            ..BillboardQuery::default()
        };
        assert_eq!(huge.into_filter().limit, Some(MAX_LISTING_LIMIT));
    }

    #[test]
    fn records_normalize_back_to_billboards() {
        let records = catalog().listing(&BillboardFilter::all(10));
        let billboards = shared::catalog::normalize_billboards(records);
        assert_eq!(billboards[0].region.as_ref().and_then(|link| link.name.as_deref()), Some("Centro"));
        assert_eq!(billboards[2].region_id(), Some("r9"));
    }

    #[test]
    fn broken_fixture_is_reported() {
        let error = DevCatalog::from_toml_str("[[billboards]]\nid = 1").unwrap_err();
        assert!(error.to_string().starts_with("invalid catalog fixture"));
    }
}
