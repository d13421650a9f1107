pub mod balance_chart;

pub use balance_chart::BalanceChart;
