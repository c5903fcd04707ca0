use crate::catalog::{Billboard, BillboardFilter};
use crate::loading::LoadState;
use std::collections::HashMap;

/// Filters remembered before older entries are dropped.
pub const MAX_REMEMBERED_FILTERS: usize = 32;

/// Filtered billboard listings keyed by the filter that produced them.
///
/// Every fetch writes only the entry for its own filter, and readers only look
/// at the entry for [`FilteredListings::current`]. A slow response for a filter
/// the user has already moved past lands in its own slot and stays invisible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredListings {
    current: BillboardFilter,
    results: HashMap<BillboardFilter, LoadState<Vec<Billboard>>>,
}

impl FilteredListings {
    pub fn current(&self) -> &BillboardFilter {
        &self.current
    }

    /// Makes `filter` current. Its entry shows `Loading` unless it already has
    /// data; stale data stays visible while the refresh runs.
    pub fn request(&mut self, filter: BillboardFilter) {
        let entry = self
            .results
            .entry(filter.clone())
            .or_insert(LoadState::Loading);
        if !entry.is_ready() {
            *entry = LoadState::Loading;
        }
        self.current = filter;
    }

    pub fn complete(&mut self, filter: BillboardFilter, state: LoadState<Vec<Billboard>>) {
        self.results.insert(filter, state);
        if self.results.len() > MAX_REMEMBERED_FILTERS {
            let current = self.current.clone();
            self.results.retain(|filter, _| *filter == current);
        }
    }

    pub fn current_state(&self) -> LoadState<Vec<Billboard>> {
        self.state_for(&self.current)
    }

    fn state_for(&self, filter: &BillboardFilter) -> LoadState<Vec<Billboard>> {
        self.results.get(filter).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billboard(id: &str) -> Billboard {
        Billboard {
            id: id.into(),
            code: id.to_uppercase(),
            street_label: None,
            region: None,
        }
    }

    #[test]
    fn late_response_for_an_old_filter_stays_hidden() {
        let north = BillboardFilter::from_input("r1", "", 1000);
        let south = BillboardFilter::from_input("r2", "", 1000);
        let mut listings = FilteredListings::default();

        listings.request(north.clone());
        listings.request(south.clone());
        listings.complete(south.clone(), LoadState::Ready(vec![billboard("b2")]));
        listings.complete(north.clone(), LoadState::Ready(vec![billboard("b1")]));

        assert_eq!(listings.current(), &south);
        assert_eq!(listings.current_state(), LoadState::Ready(vec![billboard("b2")]));
        assert_eq!(listings.state_for(&north), LoadState::Ready(vec![billboard("b1")]));
    }

    #[test]
    fn refreshing_keeps_ready_data_visible() {
        let filter = BillboardFilter::all(1000);
        let mut listings = FilteredListings::default();
        listings.request(filter.clone());
        assert!(listings.current_state().is_loading());

        listings.complete(filter.clone(), LoadState::Ready(vec![billboard("b1")]));
        listings.request(filter.clone());
        assert!(listings.current_state().is_ready());
    }

    #[test]
    fn retry_after_failure_shows_loading_again() {
        let filter = BillboardFilter::from_input("", "xyz", 1000);
        let mut listings = FilteredListings::default();
        listings.request(filter.clone());
        listings.complete(filter.clone(), LoadState::Failed("HTTP 500".into()));
        assert_eq!(listings.current_state().error(), Some("HTTP 500"));

        listings.request(filter);
        assert!(listings.current_state().is_loading());
    }

    #[test]
    fn old_entries_are_dropped_past_the_limit() {
        let mut listings = FilteredListings::default();
        for n in 0..=MAX_REMEMBERED_FILTERS {
            let filter = BillboardFilter::from_input("", &format!("q{n}"), 1000);
            listings.request(filter.clone());
            listings.complete(filter, LoadState::Ready(vec![]));
        }
        assert_eq!(listings.len(), 1);
        assert!(listings.current_state().is_ready());
    }
}
