use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::disk_storage::{DiskStorageInterface, FileFormat};

/// Previously searched addresses, most recent first.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SearchHistoryStore {
    entries: Vec<SearchHistoryEntry>,
}

impl DiskStorageInterface for SearchHistoryStore {
    const FILE_NAME: &'static str = "search_history";
    const FORMAT: FileFormat = FileFormat::YAML;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchHistoryEntry {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
}

impl fmt::Display for SearchHistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ens_name {
            Some(name) => write!(f, "{} ({name})", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

impl SearchHistoryStore {
    /// Moves `entry` to the front, dropping an older entry for the same
    /// address. An ENS name seen before is kept when the new search was by
    /// plain address.
    pub fn record(&mut self, mut entry: SearchHistoryEntry) {
        if let Some(index) = self.position(&entry.address) {
            let previous = self.entries.remove(index);
            entry.ens_name = entry.ens_name.or(previous.ens_name);
        }
        self.entries.insert(0, entry);
    }

    pub fn add(&mut self, entry: SearchHistoryEntry) -> crate::Result<()> {
        self.record(entry);
        self.save()
    }

    /// Returns whether an entry was removed. The file is only written when
    /// something changed.
    pub fn remove(&mut self, address: &Address) -> crate::Result<bool> {
        match self.position(address) {
            Some(index) => {
                self.entries.remove(index);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear(&mut self) -> crate::Result<()> {
        self.entries.clear();
        self.save()
    }

    fn position(&self, address: &Address) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.address == address)
    }

    pub fn list(&self) -> &Vec<SearchHistoryEntry> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(byte: u8, ens_name: Option<&str>) -> SearchHistoryEntry {
        SearchHistoryEntry {
            address: Address::repeat_byte(byte),
            ens_name: ens_name.map(str::to_string),
        }
    }

    #[test]
    fn test_record_keeps_most_recent_first_without_duplicates() {
        let mut store = SearchHistoryStore::default();
        store.record(entry(1, None));
        store.record(entry(2, None));
        store.record(entry(3, None));
        store.record(entry(1, None));

        let addresses: Vec<Address> = store.list().iter().map(|e| e.address).collect();
        assert_eq!(
            addresses,
            vec![
                Address::repeat_byte(1),
                Address::repeat_byte(3),
                Address::repeat_byte(2)
            ]
        );
    }

    #[test]
    fn test_record_remembers_ens_name() {
        let mut store = SearchHistoryStore::default();
        store.record(entry(1, Some("vitalik.eth")));
        store.record(entry(1, None));
        assert_eq!(store.list()[0].ens_name.as_deref(), Some("vitalik.eth"));
        assert_eq!(
            store.list()[0].to_string(),
            format!("{} (vitalik.eth)", Address::repeat_byte(1))
        );

        store.record(entry(1, Some("other.eth")));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].ens_name.as_deref(), Some("other.eth"));
    }

    #[test]
    fn test_remove_missing_address_does_not_touch_disk() {
        let mut store = SearchHistoryStore::default();
        assert!(!store.remove(&Address::repeat_byte(9)).unwrap());
    }

    #[test]
    fn test_yaml_layout() {
        let mut store = SearchHistoryStore::default();
        store.record(entry(1, None));
        store.record(entry(2, Some("a.eth")));

        let content = store.to_file_content().unwrap();
        assert!(content.starts_with("entries:\n"));
        assert!(content.contains("ens_name: a.eth"));
        assert_eq!(SearchHistoryStore::parse(&content).unwrap(), store);
    }
}
