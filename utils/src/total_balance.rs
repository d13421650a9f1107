use alloy::primitives::Address;
use futures::future::join_all;

use crate::{covalent::Covalent, network::Network};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TotalBalance {
    pub total_usd: f64,
    pub per_network: Vec<(String, f64)>,
    pub failed_networks: Vec<String>,
}

impl TotalBalance {
    fn from_results(results: Vec<(String, crate::Result<f64>)>) -> Self {
        let mut total = TotalBalance::default();

        for (network, result) in results {
            match result {
                Ok(usd) => {
                    total.total_usd += usd;
                    total.per_network.push((network, usd));
                }
                Err(error) => {
                    crate::av_log!("Total balance on {network} failed: {error}");
                    total.failed_networks.push(network);
                }
            }
        }

        total
    }
}

/// Current USD value of all tokens held by `address`, summed over every
/// network that has a Covalent chain name.
pub async fn get_total_balance<'a>(
    covalent: &Covalent,
    networks: impl IntoIterator<Item = &'a Network>,
    address: Address,
) -> TotalBalance {
    let results = join_all(networks.into_iter().map(|network| async move {
        let result = async {
            let chain_name = network.get_covalent_name()?;
            let items = covalent.get_token_balances(chain_name, address).await?;
            Ok::<_, crate::Error>(items.iter().map(|item| item.quote_usd()).sum::<f64>())
        }
        .await;
        (network.name.clone(), result)
    }))
    .await;

    TotalBalance::from_results(results)
}
