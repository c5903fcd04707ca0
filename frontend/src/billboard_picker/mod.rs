//! Billboard picker domain.
//!
//! Owns the filter state (region + search), the three catalog listings and
//! the derived "available" / "selected" lists. The selection itself belongs to
//! the enclosing form and is reached through a [`SelectionHandle`].

mod view;

pub use view::billboard_picker_view;

use crate::dataflow::{Actor, Relay, discard_queued, relay};
use crate::debounce::Debounced;
use crate::debug_log;
use crate::debug_utils::{DEBUG_CATALOG, DEBUG_PICKER};
use crate::error_display::{ErrorAlert, log_error_console_only};
use futures::future::LocalBoxFuture;
use futures::{FutureExt, StreamExt, select, select_biased};
use shared::config::PickerSection;
use shared::{
    Billboard, BillboardFilter, CachedCatalog, CatalogError, FilteredListings, LoadState,
    PickerGate, Region, Selection, available_billboards, region_name, selected_billboards,
};
use std::rc::Rc;
use zoon::*;

/// Selection value plus the relays that change it.
#[derive(Clone)]
pub struct SelectionHandle {
    pub selection: Actor<Selection>,
    pub billboard_added_relay: Relay<String>,
    pub billboard_removed_relay: Relay<String>,
    pub selection_replaced_relay: Relay<Selection>,
}

impl SelectionHandle {
    pub fn new(initial: Selection) -> Self {
        let (billboard_added_relay, billboard_added_stream) = relay::<String>();
        let (billboard_removed_relay, billboard_removed_stream) = relay::<String>();
        let (selection_replaced_relay, selection_replaced_stream) = relay::<Selection>();

        let selection = Actor::new(initial, async move |state| {
            let mut billboard_added_stream = billboard_added_stream.fuse();
            let mut billboard_removed_stream = billboard_removed_stream.fuse();
            let mut selection_replaced_stream = selection_replaced_stream.fuse();

            loop {
                select! {
                    id = billboard_added_stream.next() => {
                        let Some(id) = id else { break };
                        // Re-adding is a no-op and must not notify.
                        if !state.lock_ref().contains(&id) {
                            state.lock_mut().add(id);
                        }
                    }
                    id = billboard_removed_stream.next() => {
                        let Some(id) = id else { break };
                        if state.lock_ref().contains(&id) {
                            state.lock_mut().remove(&id);
                        }
                    }
                    replacement = selection_replaced_stream.next() => {
                        let Some(replacement) = replacement else { break };
                        state.set_neq(replacement);
                    }
                }
            }
        });

        Self {
            selection,
            billboard_added_relay,
            billboard_removed_relay,
            selection_replaced_relay,
        }
    }

    pub fn signal(&self) -> impl Signal<Item = Selection> + use<> {
        self.selection.signal()
    }

    pub fn count_signal(&self) -> impl Signal<Item = usize> + use<> {
        self.selection.signal_ref(Selection::len)
    }
}

/// One rendered line of either list.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardRow {
    pub id: String,
    pub code: String,
    pub street_label: Option<String>,
    pub region_name: String,
}

impl BillboardRow {
    pub fn new(billboard: &Billboard, regions: Option<&[Region]>) -> Self {
        Self {
            id: billboard.id.clone(),
            code: billboard.code.clone(),
            street_label: billboard.street_label.clone(),
            region_name: region_name(billboard, regions),
        }
    }
}

fn rows(billboards: &[Billboard], regions: &LoadState<Vec<Region>>) -> Vec<BillboardRow> {
    let regions = regions.ready().map(Vec::as_slice);
    billboards
        .iter()
        .map(|billboard| BillboardRow::new(billboard, regions))
        .collect()
}

#[derive(Clone)]
pub struct BillboardPicker {
    pub selected_region: Actor<String>,
    pub search_text: Actor<String>,
    pub search: Debounced<String>,

    pub regions: Actor<LoadState<Vec<Region>>>,
    pub all_billboards: Actor<LoadState<Vec<Billboard>>>,
    pub filtered_listings: Actor<FilteredListings>,

    pub selection: SelectionHandle,

    pub region_selected_relay: Relay<String>,
    pub search_text_changed_relay: Relay<String>,
    /// Clears region and search at once, including any pending debounce.
    pub reset_requested_relay: Relay<()>,
    /// Drops cached listings and fetches them again.
    pub retry_requested_relay: Relay<()>,
}

impl BillboardPicker {
    pub fn new(catalog: CachedCatalog, settings: &PickerSection, selection: SelectionHandle) -> Self {
        let search = Debounced::<String>::new(settings.search_debounce_ms);
        Self::with_search(catalog, settings, selection, search)
    }

    pub fn with_search(
        catalog: CachedCatalog,
        settings: &PickerSection,
        selection: SelectionHandle,
        search: Debounced<String>,
    ) -> Self {
        let (region_selected_relay, region_selected_stream) = relay::<String>();
        let (search_text_changed_relay, search_text_changed_stream) = relay::<String>();
        let reset_requested_relay = Relay::<()>::default();
        let retry_requested_relay = Relay::<()>::default();

        let selected_region = {
            let reset_requested_stream = reset_requested_relay.subscribe();
            Actor::new(String::new(), async move |state| {
                let mut region_selected_stream = region_selected_stream.fuse();
                let mut reset_requested_stream = reset_requested_stream.fuse();
                loop {
                    select_biased! {
                        reset = reset_requested_stream.next() => {
                            if reset.is_none() {
                                break;
                            }
                            discard_queued(&mut region_selected_stream);
                            state.set_neq(String::new());
                        }
                        region_id = region_selected_stream.next() => {
                            let Some(region_id) = region_id else { break };
                            state.set_neq(region_id);
                        }
                    }
                }
            })
        };

        let search_text = {
            let reset_requested_stream = reset_requested_relay.subscribe();
            let search_input_relay = search.input_changed_relay.clone();
            let search_reset_relay = search.reset_requested_relay.clone();
            Actor::new(String::new(), async move |state| {
                let mut search_text_changed_stream = search_text_changed_stream.fuse();
                let mut reset_requested_stream = reset_requested_stream.fuse();
                loop {
                    select_biased! {
                        reset = reset_requested_stream.next() => {
                            if reset.is_none() {
                                break;
                            }
                            discard_queued(&mut search_text_changed_stream);
                            state.set_neq(String::new());
                            search_reset_relay.send(());
                        }
                        text = search_text_changed_stream.next() => {
                            let Some(text) = text else { break };
                            state.set_neq(text.clone());
                            search_input_relay.send(text);
                        }
                    }
                }
            })
        };

        let regions = {
            let fetch_catalog = catalog.clone();
            let invalidate_catalog = catalog.clone();
            listing_actor(
                "regions",
                move || {
                    let catalog = fetch_catalog.clone();
                    async move { catalog.regions().await }.boxed_local()
                },
                move || invalidate_catalog.invalidate_regions(),
                retry_requested_relay.subscribe(),
            )
        };

        let all_billboards = {
            let all = BillboardFilter::all(settings.all_billboards_limit);
            let invalidated = all.clone();
            let fetch_catalog = catalog.clone();
            let invalidate_catalog = catalog.clone();
            listing_actor(
                "billboards",
                move || {
                    let catalog = fetch_catalog.clone();
                    let all = all.clone();
                    async move { catalog.billboards(all).await }.boxed_local()
                },
                move || invalidate_catalog.invalidate_billboards(&invalidated),
                retry_requested_relay.subscribe(),
            )
        };

        let filtered_listings = {
            let filtered_limit = settings.filtered_limit;
            let filter_stream = map_ref! {
                let region_id = selected_region.signal(),
                let search_text = search.value.signal() =>
                BillboardFilter::from_input(region_id, search_text, filtered_limit)
            }
            .dedupe_cloned()
            .to_stream();
            let retry_requested_stream = retry_requested_relay.subscribe();
            let (listing_loaded_relay, listing_loaded_stream) =
                relay::<(BillboardFilter, LoadState<Vec<Billboard>>)>();

            Actor::new(FilteredListings::default(), async move |state| {
                let mut filter_stream = filter_stream.fuse();
                let mut listing_loaded_stream = listing_loaded_stream.fuse();
                let mut retry_requested_stream = retry_requested_stream.fuse();
                loop {
                    select! {
                        filter = filter_stream.next() => {
                            let Some(filter) = filter else { break };
                            debug_log!(DEBUG_PICKER, "PICKER: filter changed to {:?}", filter);
                            state.lock_mut().request(filter.clone());
                            start_filtered_fetch(&catalog, filter, &listing_loaded_relay);
                        }
                        loaded = listing_loaded_stream.next() => {
                            let Some((filter, listing)) = loaded else { break };
                            debug_log!(DEBUG_PICKER, "PICKER: listing for {:?} finished", filter);
                            state.lock_mut().complete(filter, listing);
                        }
                        retry = retry_requested_stream.next() => {
                            if retry.is_none() {
                                break;
                            }
                            let filter = state.lock_ref().current().clone();
                            catalog.invalidate_billboards(&filter);
                            state.lock_mut().request(filter.clone());
                            start_filtered_fetch(&catalog, filter, &listing_loaded_relay);
                        }
                    }
                }
            })
        };

        Self {
            selected_region,
            search_text,
            search,
            regions,
            all_billboards,
            filtered_listings,
            selection,
            region_selected_relay,
            search_text_changed_relay,
            reset_requested_relay,
            retry_requested_relay,
        }
    }

    pub fn filtered_signal(&self) -> impl Signal<Item = LoadState<Vec<Billboard>>> + use<> {
        self.filtered_listings
            .signal_ref(FilteredListings::current_state)
            .dedupe_cloned()
    }

    /// Current filter results minus the selection, in server order.
    pub fn available_signal(&self) -> impl Signal<Item = Vec<Billboard>> + use<> {
        map_ref! {
            let filtered = self.filtered_signal(),
            let selection = self.selection.signal() =>
            available_billboards(filtered.items(), selection)
        }
    }

    /// Selected billboards in selection order, resolved against the unfiltered list.
    pub fn selected_signal(&self) -> impl Signal<Item = Vec<Billboard>> + use<> {
        map_ref! {
            let all_billboards = self.all_billboards.signal(),
            let selection = self.selection.signal() =>
            selected_billboards(all_billboards.items(), selection)
        }
    }

    pub fn available_rows_signal(&self) -> impl Signal<Item = Vec<BillboardRow>> + use<> {
        map_ref! {
            let available = self.available_signal(),
            let regions = self.regions.signal() =>
            rows(available, regions)
        }
    }

    pub fn selected_rows_signal(&self) -> impl Signal<Item = Vec<BillboardRow>> + use<> {
        map_ref! {
            let selected = self.selected_signal(),
            let regions = self.regions.signal() =>
            rows(selected, regions)
        }
    }

    pub fn gate_signal(&self) -> impl Signal<Item = PickerGate> + use<> {
        map_ref! {
            let regions = self.regions.signal(),
            let all_billboards = self.all_billboards.signal(),
            let filtered = self.filtered_signal() =>
            PickerGate::from_states(regions, all_billboards, filtered)
        }
        .dedupe_cloned()
    }
}

/// Actor for a listing that is fetched once and again on every retry.
fn listing_actor<T, F, I>(
    listing: &'static str,
    fetch: F,
    invalidate: I,
    retry_requested_stream: futures::channel::mpsc::UnboundedReceiver<()>,
) -> Actor<LoadState<Vec<T>>>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> LocalBoxFuture<'static, Result<Rc<Vec<T>>, CatalogError>> + 'static,
    I: Fn() + 'static,
{
    Actor::new(LoadState::Loading, async move |state| {
        let mut retry_requested_stream = retry_requested_stream;
        loop {
            debug_log!(DEBUG_CATALOG, "CATALOG: loading {}", listing);
            let result = fetch().await;
            if let Err(error) = &result {
                log_error_console_only(ErrorAlert::new_catalog_error(listing, error));
            }
            state.set(LoadState::from_result(result.map(Rc::unwrap_or_clone)));

            if retry_requested_stream.next().await.is_none() {
                break;
            }
            invalidate();
            state.set_neq(LoadState::Loading);
        }
    })
}

fn start_filtered_fetch(
    catalog: &CachedCatalog,
    filter: BillboardFilter,
    listing_loaded_relay: &Relay<(BillboardFilter, LoadState<Vec<Billboard>>)>,
) {
    let catalog = catalog.clone();
    let listing_loaded_relay = listing_loaded_relay.clone();
    Task::start(async move {
        debug_log!(DEBUG_CATALOG, "CATALOG: loading billboards for {:?}", filter);
        let result = catalog.billboards(filter.clone()).await;
        if let Err(error) = &result {
            log_error_console_only(ErrorAlert::new_catalog_error("search results", error));
        }
        let listing = LoadState::from_result(result.map(Rc::unwrap_or_clone));
        listing_loaded_relay.send((filter, listing));
    });
}
