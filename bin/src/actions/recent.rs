use av_utils::{disk_storage::DiskStorageInterface, search_history::SearchHistoryStore};
use console::style;

use crate::cli::RecentActions;

pub fn recent(action: Option<RecentActions>) -> crate::Result<()> {
    let mut store = SearchHistoryStore::load()?;

    match action {
        None => {
            if store.list().is_empty() {
                println!("{}", style("No recent searches.").dim());
            }
            for (index, entry) in store.list().iter().enumerate() {
                println!("{:>3}. {entry}", index + 1);
            }
        }
        Some(RecentActions::Remove { address }) => {
            if store.remove(&address)? {
                println!("Removed {address}.");
            } else {
                println!("{address} is not in the recent searches.");
            }
        }
        Some(RecentActions::Clear) => {
            store.clear()?;
            println!("Cleared recent searches.");
        }
    }

    Ok(())
}
