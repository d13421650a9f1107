use std::fmt::{Display, Formatter};

use alloy::{
    primitives::{utils::format_units, Address, U256},
    providers::Provider,
};
use futures::future::join_all;

use crate::network::Network;

#[derive(Clone, Debug, PartialEq)]
pub struct NativeBalance {
    pub network: String,
    pub symbol: String,
    pub decimals: u8,
    pub value: U256,
}

impl NativeBalance {
    pub fn formatted_value(&self) -> crate::Result<f64> {
        Ok(format_units(self.value, self.decimals)?.parse::<f64>()?)
    }
}

impl Display for NativeBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match format_units(self.value, self.decimals) {
            Ok(formatted) => write!(f, "{formatted} {}", self.symbol),
            Err(_) => write!(f, "{} wei {}", self.value, self.symbol),
        }
    }
}

pub async fn get_native_balance(
    network: &Network,
    address: Address,
    alchemy_api_key: Option<&str>,
) -> crate::Result<NativeBalance> {
    let provider = network.get_provider(alchemy_api_key)?;

    let value = provider
        .get_balance(address)
        .await
        .map_err(|error| crate::Error::NativeBalanceFailed {
            network: network.name.clone(),
            error: Box::new(error),
        })?;

    Ok(NativeBalance {
        network: network.name.clone(),
        symbol: network.symbol.clone().unwrap_or("ETH".to_string()),
        decimals: network.native_decimals.unwrap_or(18),
        value,
    })
}

/// Queries every network at once. Results come back in the order of
/// `networks`, one failed network does not affect the others.
pub async fn get_native_balances<'a>(
    networks: impl IntoIterator<Item = &'a Network>,
    address: Address,
    alchemy_api_key: Option<&str>,
) -> Vec<(&'a Network, crate::Result<NativeBalance>)> {
    join_all(networks.into_iter().map(|network| async move {
        let balance = get_native_balance(network, address, alchemy_api_key).await;
        if let Err(error) = &balance {
            crate::av_log!("Native balance on {} failed: {error}", network.name);
        }
        (network, balance)
    }))
    .await
}
