//! Read-only views computed from fetched catalog lists and the current
//! selection. Everything here is pure so it can rerun on every keystroke.

use crate::catalog::{Billboard, Region};
use crate::selection::Selection;
use std::collections::HashMap;

/// Shown wherever a billboard's region cannot be named.
pub const NO_REGION_LABEL: &str = "No region";

/// Billboards from a filtered listing that are not selected yet, in listing order.
pub fn available_billboards(filtered: &[Billboard], selection: &Selection) -> Vec<Billboard> {
    filtered
        .iter()
        .filter(|billboard| !selection.contains(&billboard.id))
        .cloned()
        .collect()
}

/// Full objects for the selected ids, in selection order.
///
/// Looks ids up in the unfiltered listing so a selected billboard stays visible
/// whatever the current filter is. Ids with no match (deleted billboards still
/// referenced by an old proposal) are skipped.
pub fn selected_billboards(all: &[Billboard], selection: &Selection) -> Vec<Billboard> {
    let by_id: HashMap<&str, &Billboard> = all
        .iter()
        .map(|billboard| (billboard.id.as_str(), billboard))
        .collect();
    selection
        .ids()
        .iter()
        .filter_map(|id| by_id.get(id.as_str()).map(|billboard| (*billboard).clone()))
        .collect()
}

/// Display name of a billboard's region.
///
/// `regions` is `None` while the region list is still loading. The loaded list
/// wins; an embedded name from the API is used when the list has no match.
pub fn region_name(billboard: &Billboard, regions: Option<&[Region]>) -> String {
    let Some(link) = &billboard.region else {
        return NO_REGION_LABEL.to_string();
    };
    regions
        .and_then(|regions| regions.iter().find(|region| region.id == link.id))
        .map(|region| region.name.clone())
        .or_else(|| link.name.clone())
        .unwrap_or_else(|| NO_REGION_LABEL.to_string())
}
