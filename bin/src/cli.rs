use alloy::primitives::Address;
use av_utils::search::SearchQuery;
use clap::{CommandFactory, Parser, Subcommand};
use console::style;

use crate::actions;

#[derive(Parser, Debug)]
#[clap(version, subcommand_required = false, arg_required_else_help = false)]
#[command(
    name = "av",
    bin_name = "av",
    version,
    about = "Look up any Ethereum address or ENS name and chart its recent token balances"
)]
pub struct Cli {
    /// Covalent API key, takes precedence over the one in the config file
    #[arg(long, global = true, env = "COVALENT_API_KEY", hide_env_values = true)]
    pub covalent_api_key: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Address overview: QR code, explorer links, native and total balances
    Show { query: String },

    /// Chart the per-token USD balance over the last days
    #[command(alias = "h")]
    History {
        query: String,

        /// Number of days to look back, today included
        #[arg(long)]
        days: Option<usize>,

        /// Number of tokens to plot
        #[arg(long)]
        top: Option<usize>,

        /// Network name, Covalent chain name or alias
        #[arg(long)]
        network: Option<String>,

        /// Print the history as JSON instead of a chart
        #[arg(long)]
        json: bool,
    },

    /// Read addresses or ENS names from stdin, one per line, charting each.
    /// A new line supersedes a lookup that is still loading.
    Explore {
        #[arg(long)]
        network: Option<String>,
    },

    /// Recently searched addresses
    Recent {
        #[command(subcommand)]
        action: Option<RecentActions>,
    },

    /// View or change the config file
    Config {
        #[command(subcommand)]
        action: Option<ConfigActions>,
    },

    #[command(external_subcommand)]
    Wildcard(Vec<String>),
}

#[derive(Subcommand, Debug)]
pub enum RecentActions {
    /// Forget one address
    Remove { address: Address },

    /// Forget all addresses
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ConfigActions {
    Show,

    SetCovalentKey { key: String },

    SetAlchemyKey { key: String },
}

impl Commands {
    /// `av <address|ens>` is shorthand for `av show <address|ens>`.
    pub fn resolve_wildcard(self) -> Self {
        if let Commands::Wildcard(cmd) = self {
            match cmd.first() {
                Some(first) if cmd.len() == 1 && SearchQuery::parse(first).is_ok() => {
                    Commands::Show {
                        query: first.clone(),
                    }
                }
                _ => {
                    eprintln!(
                        "{} unrecognized subcommand '{}'\n",
                        style("error:").red(),
                        style(cmd.join(" ")).yellow(),
                    );
                    let _ = Cli::command().print_help();
                    std::process::exit(1);
                }
            }
        } else {
            self
        }
    }
}

impl Cli {
    pub async fn handle(self) -> crate::Result<()> {
        let Some(cmd) = self.cmd else {
            let _ = Cli::command().print_help();
            return Ok(());
        };
        let covalent_api_key = self.covalent_api_key.as_deref();

        match cmd.resolve_wildcard() {
            Commands::Show { query } => actions::show::show(&query, covalent_api_key).await,
            Commands::History {
                query,
                days,
                top,
                network,
                json,
            } => {
                actions::history::history(
                    &query,
                    actions::history::HistoryArgs {
                        days,
                        top,
                        network,
                        json,
                    },
                    covalent_api_key,
                )
                .await
            }
            Commands::Explore { network } => {
                actions::explore::explore(network, covalent_api_key).await
            }
            Commands::Recent { action } => actions::recent::recent(action),
            Commands::Config { action } => actions::config::config(action),
            Commands::Wildcard(_) => unreachable!("wildcard is resolved above"),
        }
    }
}
