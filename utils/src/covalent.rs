use alloy::primitives::{Address, U256};
use av_common::text_truncate::truncate_with_count;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    av_log,
    config::Config,
    historic_balances::{HistoricalBalanceItem, HistoricalBalanceProvider},
    Reqwest,
};

const ERROR_MESSAGE_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CovalentResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: bool,
    pub error_message: Option<String>,
    pub error_code: Option<u16>,
}

impl<T> CovalentResponse<T> {
    fn into_data(self, url: &str) -> crate::Result<T> {
        if self.error {
            return Err(crate::Error::CovalentResponse {
                url: url.to_string(),
                message: truncate_with_count(
                    self.error_message.as_deref().unwrap_or("unknown error"),
                    ERROR_MESSAGE_LIMIT,
                ),
            });
        }

        self.data
            .ok_or_else(|| crate::Error::CovalentNoData(url.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct BalancesData {
    pub address: Option<String>,
    pub chain_name: Option<String>,
    pub items: Option<Vec<BalanceItem>>,
}

// docs: https://goldrush.dev/docs/api/balances/get-token-balances-for-address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceItem {
    pub contract_ticker_symbol: Option<String>,
    pub contract_name: Option<String>,
    pub contract_address: Option<String>,
    pub contract_decimals: Option<u8>,
    /// Raw integer balance as a decimal string.
    pub balance: Option<String>,
    pub quote: Option<f64>,
    pub quote_rate: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl BalanceItem {
    pub fn symbol(&self) -> String {
        self.contract_ticker_symbol
            .clone()
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    pub fn raw_balance(&self) -> crate::Result<U256> {
        match self.balance.as_deref() {
            None => Ok(U256::ZERO),
            Some(balance) => U256::from_str_radix(balance, 10)
                .map_err(|_| crate::Error::InvalidTokenBalance(balance.to_string())),
        }
    }

    pub fn quote_usd(&self) -> f64 {
        self.quote.unwrap_or_default()
    }

    pub fn to_historical_item(&self) -> crate::Result<HistoricalBalanceItem> {
        Ok(HistoricalBalanceItem {
            symbol: self.symbol(),
            raw_balance: self.raw_balance()?,
            decimals: self.contract_decimals.unwrap_or(0),
            quote_usd: self.quote_usd(),
        })
    }
}

/// Client for the Covalent (GoldRush) balance API.
#[derive(Clone, Debug)]
pub struct Covalent {
    api_key: String,
    base_url: String,
}

impl Covalent {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config, overridden_api_key: Option<&str>) -> crate::Result<Self> {
        Ok(Self::new(
            config.get_covalent_api_key(overridden_api_key)?,
            config.covalent_base_url.clone(),
        ))
    }

    fn url(&self, chain_name: &str, address: Address, endpoint: &str) -> String {
        format!(
            "{}/v1/{chain_name}/address/{address}/{endpoint}/",
            self.base_url
        )
    }

    async fn get_balances(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> crate::Result<Vec<BalanceItem>> {
        let response = Reqwest::get(&url)?
            .bearer_auth(&self.api_key)
            .query(&query)
            .receive_json::<CovalentResponse<BalancesData>>()
            .await?;

        Ok(response.into_data(&url)?.items.unwrap_or_default())
    }

    /// Token balances of `address` at the end of `date`.
    pub async fn get_historical_balances(
        &self,
        chain_name: &str,
        address: Address,
        date: NaiveDate,
    ) -> crate::Result<Vec<BalanceItem>> {
        let url = self.url(chain_name, address, "historical_balances");
        self.get_balances(
            url,
            &[
                ("date", date.format("%Y-%m-%d").to_string()),
                ("nft", "false".to_string()),
                ("no-spam", "true".to_string()),
            ],
        )
        .await
    }

    /// Current token balances of `address`.
    pub async fn get_token_balances(
        &self,
        chain_name: &str,
        address: Address,
    ) -> crate::Result<Vec<BalanceItem>> {
        let url = self.url(chain_name, address, "balances_v2");
        self.get_balances(
            url,
            &[
                ("nft", "false".to_string()),
                ("no-spam", "true".to_string()),
            ],
        )
        .await
    }
}

impl HistoricalBalanceProvider for Covalent {
    async fn historical_balances(
        &self,
        network: &str,
        address: Address,
        date: NaiveDate,
    ) -> crate::Result<Vec<HistoricalBalanceItem>> {
        let items = self.get_historical_balances(network, address, date).await?;
        Ok(historical_items(&items))
    }
}

/// Items that cannot be read are logged and skipped so they never cost the
/// whole day.
fn historical_items(items: &[BalanceItem]) -> Vec<HistoricalBalanceItem> {
    items
        .iter()
        .filter_map(|item| match item.to_historical_item() {
            Ok(historical) => Some(historical),
            Err(error) => {
                av_log!("Skipping Covalent item {}: {error}", item.symbol());
                None
            }
        })
        .collect()
}
