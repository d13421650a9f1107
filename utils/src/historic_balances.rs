//! Per-day token balances of an address over a trailing window, ranked and
//! narrowed to the top tokens so they can be plotted.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    future::Future,
    sync::Arc,
};

use alloy::primitives::{utils::format_units, Address, U256};
use av_common::balance::{BalanceHistory, BalanceSnapshot, DaySeriesPoint, TokenHolding};
use chrono::{Days, Local, NaiveDate};
use futures::future::join_all;

use crate::{
    av_log,
    r#async::{async_once_thread, AsyncOnce},
};

pub const DEFAULT_WINDOW_SIZE_IN_DAYS: usize = 6;
pub const DEFAULT_TOP_N: usize = 5;

/// One token balance as reported by a balance service for a given day.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalBalanceItem {
    pub symbol: String,
    pub raw_balance: U256,
    pub decimals: u8,
    pub quote_usd: f64,
}

/// Source of per-day token balances.
pub trait HistoricalBalanceProvider {
    fn historical_balances(
        &self,
        network: &str,
        address: Address,
        date: NaiveDate,
    ) -> impl Future<Output = crate::Result<Vec<HistoricalBalanceItem>>> + Send;
}

struct TokenRanking {
    symbol: String,
    aggregate_quote_usd: f64,
}

/// Aggregates the window ending today (local clock).
pub async fn aggregate<P: HistoricalBalanceProvider>(
    provider: &P,
    network: &str,
    address: Address,
    window_size_in_days: usize,
    top_n: usize,
) -> BalanceHistory {
    let today = Local::now().date_naive();
    aggregate_from(provider, network, address, today, window_size_in_days, top_n).await
}

/// Fetches `today` and the `window_size_in_days - 1` days before it all at
/// once, then ranks tokens by their summed quote across the days that came
/// back. Days that fail are logged and left out, so this never errors.
pub async fn aggregate_from<P: HistoricalBalanceProvider>(
    provider: &P,
    network: &str,
    address: Address,
    today: NaiveDate,
    window_size_in_days: usize,
    top_n: usize,
) -> BalanceHistory {
    let fetches: Vec<_> = (0..window_size_in_days)
        .filter_map(|i| today.checked_sub_days(Days::new(i as u64)))
        .map(|date| fetch_snapshot(provider, network, address, date))
        .collect();

    let snapshots: Vec<BalanceSnapshot> = join_all(fetches).await.into_iter().flatten().collect();

    let tracked_tokens = rank_tokens(&snapshots, top_n);
    let tracked: HashSet<&str> = tracked_tokens.iter().map(String::as_str).collect();

    let series = snapshots
        .iter()
        .map(|snapshot| project(snapshot, &tracked))
        .collect();

    BalanceHistory {
        series,
        tracked_tokens,
    }
}

async fn fetch_snapshot<P: HistoricalBalanceProvider>(
    provider: &P,
    network: &str,
    address: Address,
    date: NaiveDate,
) -> Option<BalanceSnapshot> {
    match provider.historical_balances(network, address, date).await {
        Ok(items) if items.is_empty() => {
            av_log!("No historical balances for {address} on {network} at {date}");
            None
        }
        Ok(items) => Some(build_snapshot(date, items)),
        Err(error) => {
            av_log!("Failed to fetch historical balances for {address} on {network} at {date}: {error}");
            None
        }
    }
}

/// Drops zero balances and scales the rest by their decimals. A holding
/// that cannot be scaled is logged and left out, the rest of the day stays.
pub fn build_snapshot(date: NaiveDate, items: Vec<HistoricalBalanceItem>) -> BalanceSnapshot {
    let tokens = items
        .into_iter()
        .filter(|item| !item.raw_balance.is_zero())
        .filter_map(|item| match normalize(&item) {
            Ok(normalized_balance) => Some(TokenHolding {
                symbol: item.symbol,
                normalized_balance,
                quote_usd: item.quote_usd,
            }),
            Err(error) => {
                av_log!("Skipping {} on {date}: {error}", item.symbol);
                None
            }
        })
        .collect();

    BalanceSnapshot::new(date, tokens)
}

fn normalize(item: &HistoricalBalanceItem) -> crate::Result<f64> {
    Ok(format_units(item.raw_balance, item.decimals)?.parse::<f64>()?)
}

/// Top `top_n` symbols by quote summed over all snapshots. Equal sums keep
/// the order in which the symbols were first seen. Symbols that would clash
/// with a series field are never tracked, they still count in the total.
fn rank_tokens(snapshots: &[BalanceSnapshot], top_n: usize) -> Vec<String> {
    let mut ranking: Vec<TokenRanking> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for holding in snapshots.iter().flat_map(|snapshot| &snapshot.tokens) {
        if DaySeriesPoint::is_reserved_field(&holding.symbol) {
            av_log!("Not tracking token named {}", holding.symbol);
            continue;
        }
        match positions.get(holding.symbol.as_str()) {
            Some(&position) => ranking[position].aggregate_quote_usd += holding.quote_usd,
            None => {
                positions.insert(&holding.symbol, ranking.len());
                ranking.push(TokenRanking {
                    symbol: holding.symbol.clone(),
                    aggregate_quote_usd: holding.quote_usd,
                });
            }
        }
    }

    // sort_by is stable
    ranking.sort_by(|a, b| b.aggregate_quote_usd.total_cmp(&a.aggregate_quote_usd));
    ranking.truncate(top_n);

    ranking.into_iter().map(|r| r.symbol).collect()
}

fn project(snapshot: &BalanceSnapshot, tracked: &HashSet<&str>) -> DaySeriesPoint {
    let mut quotes = BTreeMap::new();

    // Same symbol from two contracts on one day adds up, as in the ranking
    for holding in snapshot
        .tokens
        .iter()
        .filter(|holding| tracked.contains(holding.symbol.as_str()))
    {
        *quotes.entry(holding.symbol.clone()).or_insert(0.0) += holding.quote_usd;
    }

    DaySeriesPoint {
        date: snapshot.date,
        quotes,
        total_usd: snapshot.total_quote_usd,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedHistory {
    pub generation: u64,
    pub address: Address,
    pub history: BalanceHistory,
}

/// Runs aggregations in the background for an address that can change while
/// a previous aggregation is still in flight. Each `request` cancels the one
/// before it and only the newest request's result is ever handed out.
pub struct HistoryLoader<P> {
    provider: Arc<P>,
    network: String,
    window_size_in_days: usize,
    top_n: usize,
    generation: u64,
    current: Option<(u64, Address, AsyncOnce<BalanceHistory>)>,
}

impl<P> HistoryLoader<P>
where
    P: HistoricalBalanceProvider + Send + Sync + 'static,
{
    pub fn new(
        provider: Arc<P>,
        network: impl Into<String>,
        window_size_in_days: usize,
        top_n: usize,
    ) -> Self {
        Self {
            provider,
            network: network.into(),
            window_size_in_days,
            top_n,
            generation: 0,
            current: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.current.is_some()
    }

    /// Starts aggregating for `address`, superseding any earlier request.
    pub fn request(&mut self, address: Address) -> u64 {
        if let Some((_, _, job)) = self.current.take() {
            job.cancel();
        }

        self.generation += 1;

        let provider = Arc::clone(&self.provider);
        let network = self.network.clone();
        let window_size_in_days = self.window_size_in_days;
        let top_n = self.top_n;

        let job = async_once_thread(move || async move {
            aggregate(
                provider.as_ref(),
                &network,
                address,
                window_size_in_days,
                top_n,
            )
            .await
        });

        self.current = Some((self.generation, address, job));
        self.generation
    }

    /// Waits for the newest request to finish. Cancel safe: dropping the
    /// returned future leaves the request in flight.
    pub async fn recv(&mut self) -> Option<LoadedHistory> {
        let (_, _, job) = self.current.as_mut()?;
        let result = job.recv().await;

        let (generation, address, _) = self.current.take()?;
        let history = result.ok()?;

        (generation == self.generation).then_some(LoadedHistory {
            generation,
            address,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn item(symbol: &str, quote_usd: f64) -> HistoricalBalanceItem {
        HistoricalBalanceItem {
            symbol: symbol.to_string(),
            raw_balance: U256::from(2_000_000u64),
            decimals: 6,
            quote_usd,
        }
    }

    fn zero_item(symbol: &str) -> HistoricalBalanceItem {
        HistoricalBalanceItem {
            raw_balance: U256::ZERO,
            ..item(symbol, 0.0)
        }
    }

    #[derive(Default)]
    struct MockProvider {
        days: HashMap<NaiveDate, Vec<HistoricalBalanceItem>>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn with_day(mut self, day: &str, items: Vec<HistoricalBalanceItem>) -> Self {
            self.days.insert(date(day), items);
            self
        }
    }

    impl HistoricalBalanceProvider for MockProvider {
        async fn historical_balances(
            &self,
            _network: &str,
            _address: Address,
            date: NaiveDate,
        ) -> crate::Result<Vec<HistoricalBalanceItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.days
                .get(&date)
                .cloned()
                .ok_or_else(|| crate::Error::CovalentNoData(date.to_string()))
        }
    }

    /// Every address gets the same balances, but `slow` takes a while.
    struct DelayedProvider {
        slow: Address,
    }

    impl HistoricalBalanceProvider for DelayedProvider {
        async fn historical_balances(
            &self,
            _network: &str,
            address: Address,
            _date: NaiveDate,
        ) -> crate::Result<Vec<HistoricalBalanceItem>> {
            if address == self.slow {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            Ok(vec![item("A", 1.0)])
        }
    }

    #[tokio::test]
    async fn test_scenario_with_one_failed_day() {
        let provider = MockProvider::default()
            .with_day("2024-03-10", vec![item("A", 10.0), item("B", 5.0)])
            .with_day("2024-03-09", vec![item("A", 8.0), item("C", 20.0)]);

        let history = aggregate_from(
            &provider,
            "eth-mainnet",
            Address::ZERO,
            date("2024-03-10"),
            3,
            2,
        )
        .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(history.tracked_tokens, vec!["C", "A"]);
        assert_eq!(history.series.len(), 2);

        let day0 = &history.series[0];
        assert_eq!(day0.date, date("2024-03-10"));
        assert_eq!(day0.quotes, BTreeMap::from([("A".to_string(), 10.0)]));
        assert_eq!(day0.total_usd, 15.0);

        let day1 = &history.series[1];
        assert_eq!(day1.date, date("2024-03-09"));
        assert_eq!(
            day1.quotes,
            BTreeMap::from([("A".to_string(), 8.0), ("C".to_string(), 20.0)])
        );
        assert_eq!(day1.total_usd, 28.0);
    }

    #[tokio::test]
    async fn test_all_days_failing_gives_empty_history() {
        let provider = MockProvider::default();

        let history = aggregate_from(
            &provider,
            "eth-mainnet",
            Address::ZERO,
            date("2024-03-10"),
            DEFAULT_WINDOW_SIZE_IN_DAYS,
            DEFAULT_TOP_N,
        )
        .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
        assert!(history.is_empty());
        assert!(history.tracked_tokens.is_empty());
    }

    #[tokio::test]
    async fn test_empty_day_is_dropped_and_does_not_rank() {
        let provider = MockProvider::default()
            .with_day("2024-03-10", vec![item("A", 1.0)])
            .with_day("2024-03-09", vec![]);

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 2, 5).await;

        assert_eq!(history.series.len(), 1);
        assert_eq!(history.series[0].date, date("2024-03-10"));
        assert_eq!(history.tracked_tokens, vec!["A"]);
    }

    #[tokio::test]
    async fn test_zero_balances_never_appear() {
        let provider = MockProvider::default().with_day(
            "2024-03-10",
            vec![zero_item("DUST"), item("A", 3.0), zero_item("A")],
        );

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 1, 5).await;

        assert_eq!(history.tracked_tokens, vec!["A"]);
        assert_eq!(history.series[0].quote("A"), Some(3.0));
        assert_eq!(history.series[0].quote("DUST"), None);
    }

    #[tokio::test]
    async fn test_limits_and_monotonic_ranking() {
        let day: Vec<_> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .enumerate()
            .map(|(i, s)| item(s, (i as f64 + 1.0) * 3.0))
            .collect();
        let provider = ["2024-03-10", "2024-03-09", "2024-03-08", "2024-03-07"]
            .iter()
            .fold(MockProvider::default(), |p, d| p.with_day(d, day.clone()));

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 6, 5).await;

        assert!(history.series.len() <= 6);
        assert_eq!(history.series.len(), 4);
        assert_eq!(history.tracked_tokens, vec!["G", "F", "E", "D", "C"]);

        let aggregate_of = |symbol: &str| -> f64 {
            history
                .series
                .iter()
                .filter_map(|p| p.quote(symbol))
                .sum()
        };
        for pair in history.tracked_tokens.windows(2) {
            assert!(aggregate_of(&pair[0]) >= aggregate_of(&pair[1]));
        }
    }

    #[tokio::test]
    async fn test_ties_keep_first_seen_order() {
        let provider = MockProvider::default()
            .with_day("2024-03-10", vec![item("B", 5.0), item("A", 5.0)])
            .with_day("2024-03-09", vec![item("C", 5.0)]);

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 2, 3).await;

        assert_eq!(history.tracked_tokens, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_duplicate_symbols_on_a_day_are_summed() {
        let provider = MockProvider::default()
            .with_day("2024-03-10", vec![item("USDC", 5.0), item("USDC", 2.0)]);

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 1, 5).await;

        assert_eq!(history.tracked_tokens, vec!["USDC"]);
        assert_eq!(history.series[0].quote("USDC"), Some(7.0));
        assert_eq!(history.series[0].total_usd, 7.0);
    }

    #[tokio::test]
    async fn test_aggregate_is_idempotent() {
        let provider = MockProvider::default()
            .with_day("2024-03-10", vec![item("A", 10.0), item("B", 5.0)])
            .with_day("2024-03-08", vec![item("B", 50.0)]);

        let first = aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 3, 1).await;
        let second = aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 3, 1).await;

        assert_eq!(first, second);
        assert_eq!(first.tracked_tokens, vec!["B"]);
    }

    #[test]
    fn test_build_snapshot_normalizes_balances() {
        let snapshot = build_snapshot(
            date("2024-03-10"),
            vec![
                HistoricalBalanceItem {
                    symbol: "WETH".to_string(),
                    raw_balance: U256::from(1_250_000_000_000_000_000u64),
                    decimals: 18,
                    quote_usd: 3750.0,
                },
                item("USDC", 2.0),
            ],
        );

        assert_eq!(snapshot.tokens[0].normalized_balance, 1.25);
        assert_eq!(snapshot.tokens[1].normalized_balance, 2.0);
        assert_eq!(snapshot.total_quote_usd, 3752.0);
    }

    #[test]
    fn test_unscalable_holding_keeps_the_rest_of_the_day() {
        let snapshot = build_snapshot(
            date("2024-03-10"),
            vec![
                HistoricalBalanceItem {
                    symbol: "USDC".to_string(),
                    raw_balance: U256::from(5_000_000u64),
                    decimals: 6,
                    quote_usd: 5.0,
                },
                HistoricalBalanceItem {
                    symbol: "SPAM".to_string(),
                    raw_balance: U256::from(1u64),
                    decimals: 200,
                    quote_usd: 0.0,
                },
            ],
        );

        assert_eq!(snapshot.tokens.len(), 1);
        assert_eq!(snapshot.tokens[0].symbol, "USDC");
        assert_eq!(snapshot.tokens[0].normalized_balance, 5.0);
        assert_eq!(snapshot.total_quote_usd, 5.0);
    }

    #[tokio::test]
    async fn test_day_with_unscalable_holding_is_kept() {
        let spam = HistoricalBalanceItem {
            decimals: 200,
            ..item("SPAM", 0.0)
        };
        let provider = MockProvider::default()
            .with_day("2024-03-10", vec![item("USDC", 5.0), spam]);

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 1, 5).await;

        assert_eq!(history.series.len(), 1);
        assert_eq!(history.tracked_tokens, vec!["USDC"]);
        assert_eq!(history.series[0].quote("USDC"), Some(5.0));
    }

    #[tokio::test]
    async fn test_symbols_named_like_series_fields_are_not_tracked() {
        let provider = MockProvider::default().with_day(
            "2024-03-10",
            vec![item("date", 50.0), item("totalUSD", 40.0), item("A", 1.0)],
        );

        let history =
            aggregate_from(&provider, "n", Address::ZERO, date("2024-03-10"), 1, 5).await;

        assert_eq!(history.tracked_tokens, vec!["A"]);
        assert_eq!(history.series[0].total_usd, 91.0);

        let json = serde_json::to_string(&history.series[0]).unwrap();
        assert_eq!(json.matches("\"date\"").count(), 1);
        assert_eq!(json.matches("\"totalUSD\"").count(), 1);
    }

    #[tokio::test]
    async fn test_loader_discards_superseded_request() {
        let slow = Address::repeat_byte(0x11);
        let fast = Address::repeat_byte(0x22);
        let mut loader = HistoryLoader::new(Arc::new(DelayedProvider { slow }), "n", 2, 5);

        assert!(!loader.is_loading());
        assert_eq!(loader.request(slow), 1);
        assert_eq!(loader.request(fast), 2);

        let loaded = loader.recv().await.unwrap();
        assert_eq!(loaded.generation, 2);
        assert_eq!(loaded.address, fast);
        assert_eq!(loaded.history.tracked_tokens, vec!["A"]);

        // nothing from the slow request shows up afterwards
        assert!(!loader.is_loading());
        assert!(loader.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_loader_recv_is_cancel_safe() {
        let slow = Address::repeat_byte(0x11);
        let mut loader = HistoryLoader::new(Arc::new(DelayedProvider { slow }), "n", 1, 5);
        loader.request(slow);

        let timed_out = tokio::time::timeout(Duration::from_millis(10), loader.recv()).await;
        assert!(timed_out.is_err());
        assert!(loader.is_loading());

        let loaded = loader.recv().await.unwrap();
        assert_eq!(loaded.address, slow);
    }
}
