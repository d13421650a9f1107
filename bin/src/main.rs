mod actions;
mod cli;
mod error;
mod panic_hook;
mod render;

use clap::Parser;
use console::style;

pub use error::{Error, Result};

#[tokio::main]
async fn main() {
    panic_hook::set();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.handle().await {
        eprintln!("{} {error}", style("error:").red());
        if error.is_connect() {
            eprintln!("{}", style("Please check your internet connection.").dim());
        }
        std::process::exit(1);
    }
}
