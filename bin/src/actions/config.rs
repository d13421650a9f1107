use av_utils::{config::Config, disk_storage::DiskStorageInterface};
use console::style;

use crate::cli::ConfigActions;

pub fn config(action: Option<ConfigActions>) -> crate::Result<()> {
    match action.unwrap_or(ConfigActions::Show) {
        ConfigActions::Show => {
            let config = Config::load()?;
            println!("{}", style(Config::path()?.display()).dim());
            println!("covalent_api_key  = {}", mask(config.covalent_api_key.as_deref()));
            println!("alchemy_api_key   = {}", mask(config.alchemy_api_key.as_deref()));
            println!("covalent_base_url = {}", config.covalent_base_url);
            println!("default_network   = {}", config.default_network);
            println!("history_days      = {}", config.history_days);
            println!("history_top_n     = {}", config.history_top_n);
        }
        ConfigActions::SetCovalentKey { key } => {
            Config::set_covalent_api_key(key)?;
            println!("Covalent API key saved.");
        }
        ConfigActions::SetAlchemyKey { key } => {
            Config::set_alchemy_api_key(key)?;
            println!("Alchemy API key saved.");
        }
    }

    Ok(())
}

/// Keeps the first four characters of a secret.
fn mask(secret: Option<&str>) -> String {
    match secret {
        None | Some("") => "(not set)".to_string(),
        Some(secret) => {
            let visible: String = secret.chars().take(4).collect();
            format!("{visible}****")
        }
    }
}
