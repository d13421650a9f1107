use serde::{Deserialize, Serialize};

use crate::disk_storage::{DiskStorageInterface, FileFormat};

pub const DEFAULT_COVALENT_BASE_URL: &str = "https://api.covalenthq.com";
pub const DEFAULT_NETWORK: &str = "eth-mainnet";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Config {
    pub covalent_api_key: Option<String>,
    pub alchemy_api_key: Option<String>,
    #[serde(default = "default_covalent_base_url")]
    pub covalent_base_url: String,
    /// Covalent chain name used for the balance history.
    #[serde(default = "default_network")]
    pub default_network: String,
    #[serde(default = "default_history_days")]
    pub history_days: usize,
    #[serde(default = "default_history_top_n")]
    pub history_top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            covalent_api_key: None,
            alchemy_api_key: None,
            covalent_base_url: default_covalent_base_url(),
            default_network: default_network(),
            history_days: default_history_days(),
            history_top_n: default_history_top_n(),
        }
    }
}

fn default_covalent_base_url() -> String {
    DEFAULT_COVALENT_BASE_URL.to_string()
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_history_days() -> usize {
    crate::historic_balances::DEFAULT_WINDOW_SIZE_IN_DAYS
}

fn default_history_top_n() -> usize {
    crate::historic_balances::DEFAULT_TOP_N
}

impl DiskStorageInterface for Config {
    const FILE_NAME: &'static str = "config";
    const FORMAT: FileFormat = FileFormat::TOML;
}

impl Config {
    /// The key passed on the command line (or env) wins over the stored one.
    pub fn get_covalent_api_key(&self, overridden: Option<&str>) -> crate::Result<String> {
        let non_empty = |key: &str| !key.trim().is_empty();
        overridden
            .filter(|key| non_empty(key))
            .map(str::to_string)
            .or_else(|| self.covalent_api_key.clone().filter(|key| non_empty(key)))
            .ok_or(crate::Error::CovalentApiKeyNotSet)
    }

    pub fn set_covalent_api_key(covalent_api_key: String) -> crate::Result<()> {
        let mut config = Config::load()?;
        config.covalent_api_key = Some(covalent_api_key);
        config.save()
    }

    pub fn set_alchemy_api_key(alchemy_api_key: String) -> crate::Result<()> {
        let mut config = Config::load()?;
        config.alchemy_api_key = Some(alchemy_api_key);
        config.save()
    }
}
