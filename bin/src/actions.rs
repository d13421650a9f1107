pub mod config;
pub mod explore;
pub mod history;
pub mod recent;
pub mod show;

use alloy::primitives::Address;
use av_utils::{
    av_log,
    disk_storage::DiskStorageInterface,
    network::{Network, NetworkStore},
    search::SearchQuery,
    search_history::{SearchHistoryEntry, SearchHistoryStore},
};

/// Adds a successful lookup to the search history. Failing to persist it
/// never fails the lookup itself.
pub fn remember(address: Address, query: &SearchQuery) {
    let entry = SearchHistoryEntry {
        address,
        ens_name: query.ens_name().map(str::to_string),
    };

    if let Err(error) = SearchHistoryStore::load().and_then(|mut store| store.add(entry)) {
        av_log!("Failed to record {address} in the search history: {error}");
    }
}

/// Network named on the command line, else the configured default.
pub fn select_network(
    networks: &NetworkStore,
    requested: Option<&str>,
    default_network: &str,
) -> crate::Result<Network> {
    let name = requested.unwrap_or(default_network);
    networks
        .get_by_name(name)
        .ok_or_else(|| crate::Error::NetworkNotFound(name.to_string()))
}
