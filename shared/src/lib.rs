use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod catalog_access;
pub mod config;
pub mod debounce;
pub mod derived;
pub mod listings;
pub mod loading;
pub mod proposal;
pub mod query_cache;
pub mod selection;

pub use catalog::{Billboard, BillboardFilter, BillboardRecord, Region, RegionLink, RegionRef};
pub use catalog_access::{CachedCatalog, CatalogError, CatalogSource, Clock};
pub use config::{AppConfig, ConfigError};
pub use debounce::{DebounceTicket, Debouncer};
pub use derived::{NO_REGION_LABEL, available_billboards, region_name, selected_billboards};
pub use listings::FilteredListings;
pub use loading::{LoadPhase, LoadState, PickerGate};
pub use proposal::{ProposalDetails, ProposalDraft, ProposalError};
pub use query_cache::QueryCache;
pub use selection::Selection;

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    LoadConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    ConfigLoaded(AppConfig),
    ConfigError(String),
}
