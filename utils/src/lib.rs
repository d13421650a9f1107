pub mod r#async;
pub mod config;
pub mod covalent;
pub mod disk_storage;
pub mod ens;
pub mod error;
pub mod historic_balances;
pub mod log;
pub mod native_balance;
pub mod network;
pub mod reqwest;
pub mod search;
pub mod search_history;
pub mod serde;
pub mod total_balance;

pub use error::{Result, UtilsError as Error};

pub use reqwest::Reqwest;

pub use chrono;
