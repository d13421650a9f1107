pub mod balance;
pub mod ens;
pub mod text_truncate;
