//! Balance types shared by the aggregator, the chart widget and the binary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One token balance within a day's snapshot. `normalized_balance` is always
/// strictly positive, zero balances never make it into a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub symbol: String,
    pub normalized_balance: f64,
    pub quote_usd: f64,
}

/// Holdings of one address on one calendar day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub date: NaiveDate,
    pub tokens: Vec<TokenHolding>,
    pub total_quote_usd: f64,
}

impl BalanceSnapshot {
    pub fn new(date: NaiveDate, tokens: Vec<TokenHolding>) -> Self {
        let total_quote_usd = tokens.iter().map(|t| t.quote_usd).sum();
        Self {
            date,
            tokens,
            total_quote_usd,
        }
    }
}

/// A day of the plotted series. Serializes as a flat record so that every
/// tracked symbol becomes its own field next to `date` and `totalUSD`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaySeriesPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub quotes: BTreeMap<String, f64>,
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
}

impl DaySeriesPoint {
    /// Field names of the flat record that a token symbol must not take.
    pub const RESERVED_FIELDS: [&'static str; 2] = ["date", "totalUSD"];

    pub fn is_reserved_field(symbol: &str) -> bool {
        Self::RESERVED_FIELDS.contains(&symbol)
    }

    pub fn quote(&self, symbol: &str) -> Option<f64> {
        self.quotes.get(symbol).copied()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceHistory {
    /// Most recent day first.
    pub series: Vec<DaySeriesPoint>,
    /// Descending by aggregate USD value over the window.
    pub tracked_tokens: Vec<String>,
}

impl BalanceHistory {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series points oldest first, the order a chart's x axis wants.
    pub fn chronological(&self) -> impl Iterator<Item = &DaySeriesPoint> {
        self.series.iter().rev()
    }

    pub fn max_total_usd(&self) -> f64 {
        self.series
            .iter()
            .map(|p| p.total_usd)
            .fold(0.0, f64::max)
    }

    pub fn max_token_quote(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|p| p.quotes.values().copied())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_snapshot_total() {
        let snapshot = BalanceSnapshot::new(
            date("2024-03-01"),
            vec![
                TokenHolding {
                    symbol: "USDC".to_string(),
                    normalized_balance: 10.0,
                    quote_usd: 10.0,
                },
                TokenHolding {
                    symbol: "WETH".to_string(),
                    normalized_balance: 0.5,
                    quote_usd: 1500.5,
                },
            ],
        );
        assert_eq!(snapshot.total_quote_usd, 1510.5);
    }

    #[test]
    fn test_day_series_point_serializes_flat() {
        let point = DaySeriesPoint {
            date: date("2024-03-01"),
            quotes: BTreeMap::from([("USDC".to_string(), 10.0), ("DAI".to_string(), 2.5)]),
            total_usd: 12.5,
        };

        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "date": "2024-03-01",
                "DAI": 2.5,
                "USDC": 10.0,
                "totalUSD": 12.5
            })
        );

        let back: DaySeriesPoint = serde_json::from_value(value).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_chronological_is_oldest_first() {
        let history = BalanceHistory {
            series: vec![
                DaySeriesPoint {
                    date: date("2024-03-02"),
                    quotes: BTreeMap::new(),
                    total_usd: 4.0,
                },
                DaySeriesPoint {
                    date: date("2024-03-01"),
                    quotes: BTreeMap::from([("A".to_string(), 7.0)]),
                    total_usd: 3.0,
                },
            ],
            tracked_tokens: vec!["A".to_string()],
        };

        let dates: Vec<_> = history.chronological().map(|p| p.date).collect();
        assert_eq!(dates, vec![date("2024-03-01"), date("2024-03-02")]);
        assert_eq!(history.max_total_usd(), 4.0);
        assert_eq!(history.max_token_quote(), 7.0);
    }

    #[test]
    fn test_reserved_fields() {
        assert!(DaySeriesPoint::is_reserved_field("date"));
        assert!(DaySeriesPoint::is_reserved_field("totalUSD"));
        assert!(!DaySeriesPoint::is_reserved_field("DATE"));
        assert!(!DaySeriesPoint::is_reserved_field("USDC"));
    }
}
