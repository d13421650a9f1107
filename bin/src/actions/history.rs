use av_utils::{
    config::Config, covalent::Covalent, disk_storage::DiskStorageInterface, ens,
    historic_balances::aggregate, network::NetworkStore, search::SearchQuery,
};
use console::style;

use crate::render::print_history;

#[derive(Debug, Default)]
pub struct HistoryArgs {
    pub days: Option<usize>,
    pub top: Option<usize>,
    pub network: Option<String>,
    pub json: bool,
}

pub async fn history(
    query: &str,
    args: HistoryArgs,
    covalent_api_key: Option<&str>,
) -> crate::Result<()> {
    let query = SearchQuery::parse(query)?;
    let config = Config::load()?;
    let networks = NetworkStore::load_and_update()?;
    let network = super::select_network(&networks, args.network.as_deref(), &config.default_network)?;
    let chain_name = network.get_covalent_name()?;
    let covalent = Covalent::from_config(&config, covalent_api_key)?;

    let address = ens::resolve(&query, &networks, config.alchemy_api_key.as_deref()).await?;
    super::remember(address, &query);

    let days = args.days.unwrap_or(config.history_days);
    let top = args.top.unwrap_or(config.history_top_n);

    if !args.json {
        eprintln!(
            "{}",
            style(format!("Fetching {days} days of balances on {}...", network.name)).dim()
        );
    }

    let history = aggregate(&covalent, chain_name, address, days, top).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        let title = format!("{query} on {} (last {days} days)", network.name);
        print_history(&history, &title)?;
    }

    Ok(())
}
