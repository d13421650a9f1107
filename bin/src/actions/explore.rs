use std::sync::Arc;

use av_utils::{
    config::Config, covalent::Covalent, disk_storage::DiskStorageInterface, ens,
    historic_balances::HistoryLoader, network::NetworkStore, search::SearchQuery,
};
use av_common::text_truncate::shorten_address;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::print_history;

/// Each line read from stdin starts a new lookup. Whatever was still loading
/// is cancelled, so a chart is only printed for the newest line.
pub async fn explore(network: Option<String>, covalent_api_key: Option<&str>) -> crate::Result<()> {
    let config = Config::load()?;
    let networks = NetworkStore::load_and_update()?;
    let network = super::select_network(&networks, network.as_deref(), &config.default_network)?;
    let chain_name = network.get_covalent_name()?.to_string();
    let covalent = Covalent::from_config(&config, covalent_api_key)?;
    let alchemy_api_key = config.alchemy_api_key.as_deref();

    let mut loader = HistoryLoader::new(
        Arc::new(covalent),
        chain_name,
        config.history_days,
        config.history_top_n,
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!(
        "{}",
        style(format!(
            "Enter an address or ENS name per line to chart it on {}.",
            network.name
        ))
        .dim()
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let resolved = match SearchQuery::parse(&line) {
                    Ok(query) => ens::resolve(&query, &networks, alchemy_api_key)
                        .await
                        .map(|address| (query, address)),
                    Err(error) => Err(error),
                };

                match resolved {
                    Ok((query, address)) => {
                        super::remember(address, &query);
                        let generation = loader.request(address);
                        eprintln!("{}", style(format!("#{generation} loading {query}...")).dim());
                    }
                    Err(error) => eprintln!("{} {error}", style("error:").red()),
                }
            }
            loaded = loader.recv(), if loader.is_loading() => {
                if let Some(loaded) = loaded {
                    let title = format!("#{} {}", loaded.generation, shorten_address(&loaded.address));
                    print_history(&loaded.history, &title)?;
                }
            }
        }
    }

    // stdin closed, finish the last lookup
    if let Some(loaded) = loader.recv().await {
        let title = format!("#{} {}", loaded.generation, shorten_address(&loaded.address));
        print_history(&loaded.history, &title)?;
    }

    Ok(())
}
