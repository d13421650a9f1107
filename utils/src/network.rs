use std::{collections::HashMap, fmt::Display};

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
};
use serde::{Deserialize, Serialize};
use serde_with::{formats::PreferMany, serde_as, skip_serializing_none, OneOrMany};

use crate::disk_storage::{DiskStorageInterface, FileFormat};

#[skip_serializing_none]
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Network {
    pub name: String,
    /// Chain name understood by the Covalent API, e.g. `eth-mainnet`.
    pub name_covalent: Option<String>,
    pub name_alchemy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    pub name_aliases: Vec<String>,
    pub chain_id: u32,
    pub symbol: Option<String>,
    pub native_decimals: Option<u8>,
    pub rpc_url: Option<String>,
    pub rpc_alchemy: Option<String>,
    /// Address page template, `{}` is replaced by the address.
    pub explorer_url: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_testnet: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (chain_id: {})", self.name, self.chain_id)
    }
}

impl Network {
    pub fn matches_name(&self, network_name: &str) -> bool {
        self.name.eq_ignore_ascii_case(network_name)
            || self.name_covalent.as_deref() == Some(network_name)
            || self.name_alchemy.as_deref() == Some(network_name)
            || self.name_aliases.iter().any(|n| n == network_name)
    }

    /// A configured Alchemy key is preferred over the public endpoint since
    /// public endpoints rate limit aggressively.
    pub fn get_rpc(&self, alchemy_api_key: Option<&str>) -> crate::Result<String> {
        match (alchemy_api_key, &self.rpc_alchemy, &self.rpc_url) {
            (Some(key), Some(rpc_alchemy), _) => Ok(rpc_alchemy.replace("{}", key)),
            (_, _, Some(rpc_url)) => Ok(rpc_url.clone()),
            _ => Err(crate::Error::RpcUrlNotFound {
                network: self.name.clone(),
                chain_id: self.chain_id,
            }),
        }
    }

    pub fn get_provider(&self, alchemy_api_key: Option<&str>) -> crate::Result<impl Provider> {
        let rpc_url = self.get_rpc(alchemy_api_key)?;

        rpc_url
            .parse()
            .map_err(|e| crate::Error::UrlParsingFailed(rpc_url, e))
            .map(|rpc_url| ProviderBuilder::new().connect_http(rpc_url))
    }

    pub fn get_covalent_name(&self) -> crate::Result<&str> {
        self.name_covalent
            .as_deref()
            .ok_or_else(|| crate::Error::CovalentChainNameNotSet(self.name.clone()))
    }

    pub fn get_address_url(&self, address: &Address) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|explorer_url| explorer_url.replace("{}", &address.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct NetworkStore {
    pub networks: Vec<Network>,
}

impl DiskStorageInterface for NetworkStore {
    const FILE_NAME: &'static str = "networks";
    const FORMAT: FileFormat = FileFormat::YAML;
}

impl NetworkStore {
    /// Defaults overlaid with the networks stored on disk, persisted back so
    /// that users can see and edit the full list.
    pub fn load_and_update() -> crate::Result<Self> {
        let store_updated = Self::merge(default_networks(), NetworkStore::load()?.networks);
        store_updated.save()?;
        Ok(store_updated)
    }

    fn merge(defaults: Vec<Network>, user_defined: Vec<Network>) -> Self {
        let mut networks = HashMap::<u32, Network>::new();

        let mut insert = |new_entry: Network| {
            let existing = networks.remove(&new_entry.chain_id);
            // merge props from entry into existing
            let entry = if let Some(existing) = existing {
                let mut name_aliases = vec![];
                for n in new_entry
                    .name_aliases
                    .iter()
                    .chain(existing.name_aliases.iter())
                {
                    if !name_aliases.contains(n) {
                        name_aliases.push(n.clone());
                    }
                }
                Network {
                    name: new_entry.name,
                    name_covalent: new_entry.name_covalent.or(existing.name_covalent),
                    name_alchemy: new_entry.name_alchemy.or(existing.name_alchemy),
                    name_aliases,
                    chain_id: new_entry.chain_id,
                    symbol: new_entry.symbol.or(existing.symbol),
                    native_decimals: new_entry.native_decimals.or(existing.native_decimals),
                    rpc_url: new_entry.rpc_url.or(existing.rpc_url),
                    rpc_alchemy: new_entry.rpc_alchemy.or(existing.rpc_alchemy),
                    explorer_url: new_entry.explorer_url.or(existing.explorer_url),
                    is_testnet: new_entry.is_testnet,
                }
            } else {
                new_entry
            };

            networks.insert(entry.chain_id, entry);
        };

        // User defined networks go last so they override the defaults
        for network in defaults.into_iter().chain(user_defined) {
            insert(network);
        }

        // Sort by chain ID and keep testnets at the bottom
        let mut networks: Vec<Network> = networks.into_values().collect();
        networks.sort_by(|a, b| {
            a.is_testnet
                .cmp(&b.is_testnet)
                .then(a.chain_id.cmp(&b.chain_id))
        });

        NetworkStore { networks }
    }

    pub fn get_by_name(&self, network_name: &str) -> Option<Network> {
        self.networks
            .iter()
            .find(|n| n.matches_name(network_name))
            .cloned()
    }

    pub fn get_by_chain_id(&self, chain_id: u32) -> Option<Network> {
        self.networks
            .iter()
            .find(|n| n.chain_id == chain_id)
            .cloned()
    }

    pub fn get_iter(&self, testnet_mode: bool) -> impl Iterator<Item = &Network> {
        self.networks
            .iter()
            .filter(move |n| n.is_testnet == testnet_mode)
    }
}

fn mainnet(
    name: &str,
    name_covalent: &str,
    name_alchemy: &str,
    chain_id: u32,
    symbol: &str,
    rpc_url: &str,
    explorer_url: &str,
) -> Network {
    Network {
        name: name.to_string(),
        name_covalent: Some(name_covalent.to_string()),
        name_alchemy: Some(name_alchemy.to_string()),
        name_aliases: vec![],
        chain_id,
        symbol: Some(symbol.to_string()),
        native_decimals: Some(18),
        rpc_url: Some(rpc_url.to_string()),
        rpc_alchemy: Some(format!("https://{name_alchemy}.g.alchemy.com/v2/{{}}")),
        explorer_url: Some(explorer_url.to_string()),
        is_testnet: false,
    }
}

fn default_networks() -> Vec<Network> {
    let mut polygon = mainnet(
        "Polygon",
        "matic-mainnet",
        "polygon-mainnet",
        137,
        "POL",
        "https://polygon-bor-rpc.publicnode.com",
        "https://polygonscan.com/address/{}",
    );
    polygon.name_aliases = vec!["matic-mainnet".to_string()];

    vec![
        mainnet(
            "Mainnet",
            "eth-mainnet",
            "eth-mainnet",
            1,
            "ETH",
            "https://ethereum-rpc.publicnode.com",
            "https://etherscan.io/address/{}",
        ),
        mainnet(
            "Optimism",
            "optimism-mainnet",
            "opt-mainnet",
            10,
            "ETH",
            "https://optimism-rpc.publicnode.com",
            "https://optimistic.etherscan.io/address/{}",
        ),
        polygon,
        mainnet(
            "Base",
            "base-mainnet",
            "base-mainnet",
            8453,
            "ETH",
            "https://base-rpc.publicnode.com",
            "https://basescan.org/address/{}",
        ),
        mainnet(
            "Arbitrum",
            "arbitrum-mainnet",
            "arb-mainnet",
            42161,
            "ETH",
            "https://arbitrum-one-rpc.publicnode.com",
            "https://arbiscan.io/address/{}",
        ),
    ]
}
