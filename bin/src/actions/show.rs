use alloy::primitives::Address;
use av_utils::{
    config::Config,
    covalent::Covalent,
    disk_storage::DiskStorageInterface,
    ens,
    native_balance::get_native_balances,
    network::NetworkStore,
    search::SearchQuery,
    total_balance::{get_total_balance, TotalBalance},
};
use console::style;
use qrcode::{render::unicode, QrCode};

use crate::render::heading;

pub async fn show(query: &str, covalent_api_key: Option<&str>) -> crate::Result<()> {
    let query = SearchQuery::parse(query)?;
    let config = Config::load()?;
    let networks = NetworkStore::load_and_update()?;
    let alchemy_api_key = config.alchemy_api_key.as_deref();

    let address = ens::resolve(&query, &networks, alchemy_api_key).await?;
    super::remember(address, &query);

    print_header(address, &query)?;

    println!("{}", heading("Explorers"));
    for network in networks.get_iter(false) {
        if let Some(url) = network.get_address_url(&address) {
            println!("  {:<10} {}", network.name, style(url).cyan());
        }
    }
    println!();

    let covalent = Covalent::from_config(&config, covalent_api_key);
    let (native_balances, total) = tokio::join!(
        get_native_balances(networks.get_iter(false), address, alchemy_api_key),
        async {
            match &covalent {
                Ok(covalent) => Some(get_total_balance(covalent, networks.get_iter(false), address).await),
                Err(_) => None,
            }
        }
    );

    println!("{}", heading("Native balances"));
    for (network, balance) in native_balances {
        let formatted = balance.and_then(|balance| {
            Ok(format!("{:.4} {}", balance.formatted_value()?, balance.symbol))
        });
        match formatted {
            Ok(formatted) => println!("  {:<10} {formatted}", network.name),
            Err(_) => println!("  {:<10} {}", network.name, style("unavailable").dim()),
        }
    }
    println!();

    match total {
        Some(total) => print_total(&total),
        None => println!(
            "{}",
            style("Set a Covalent API key to see the total USD balance.").dim()
        ),
    }

    Ok(())
}

fn print_header(address: Address, query: &SearchQuery) -> crate::Result<()> {
    let qr = QrCode::new(address.to_string())?;
    let qr_display = qr.render::<unicode::Dense1x2>().quiet_zone(false).build();

    println!("{qr_display}\n");
    match query.ens_name() {
        Some(name) => println!("{} {}", style(name).bold(), style(address).dim()),
        None => println!("{}", style(address).bold()),
    }
    println!();

    Ok(())
}

fn print_total(total: &TotalBalance) {
    println!(
        "{} {}",
        heading("Total balance"),
        style(format!("${:.2}", total.total_usd)).green().bold()
    );
    for (network, usd) in &total.per_network {
        if *usd > 0.0 {
            println!("  {network:<10} ${usd:.2}");
        }
    }
    if !total.failed_networks.is_empty() {
        println!(
            "  {}",
            style(format!(
                "not included: {}",
                total.failed_networks.join(", ")
            ))
            .dim()
        );
    }
}
