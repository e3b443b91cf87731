//! Candidate filter.
//!
//! First stage of the pipeline: turns the raw universe into a liquidity-ranked
//! list of optionable underlyings with volatility estimates attached.
//!
//! Per symbol:
//! 1. Price within the configured band
//! 2. Enough daily history for volatility estimates
//! 3. IV from the options chain, or HV x multiplier, within the IV band
//! 4. Fundamentals and sector, defaulted when unavailable

pub mod volatility;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::{CandidateFilterConfig, FetchConfig, PortfolioConstraints};
use crate::data::{with_timeout, Fundamentals, Interval, MarketDataPort};

// ============================================================================
// Candidate
// ============================================================================

/// Directional bias from price against its 50-day average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBias {
    /// Price at or above the 50-day SMA
    Bullish,
    /// Price below the 50-day SMA
    Bearish,
}

/// Where the implied volatility figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvSource {
    /// Quoted ATM implied volatility
    OptionsChain,
    /// Historical volatility scaled by the configured multiplier
    HvMultiplier,
}

/// An underlying that survived the candidate filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Ticker symbol
    pub symbol: String,
    /// Last price
    pub price: f64,
    /// Historical volatility (annualized %)
    pub hv: f64,
    /// Implied volatility (annualized %)
    pub iv: f64,
    /// Origin of `iv`
    pub iv_source: IvSource,
    /// IV rank proxy (0-100)
    pub iv_rank: f64,
    /// IV percentile proxy (0-100)
    pub iv_percentile: f64,
    /// Sector classification
    pub sector: String,
    /// Liquidity score (0-100)
    pub liquidity_score: f64,
    /// Average daily share volume
    pub avg_volume: f64,
    /// 50-day simple moving average
    pub sma_50: Option<f64>,
    /// Directional bias
    pub trend: TrendBias,
    /// Company fundamentals (defaulted when unavailable)
    pub fundamentals: Fundamentals,
}

impl Candidate {
    /// IV / HV ratio, 0 when HV is zero.
    pub fn iv_hv_ratio(&self) -> f64 {
        if self.hv > 0.0 {
            self.iv / self.hv
        } else {
            0.0
        }
    }
}

// ============================================================================
// Rejections
// ============================================================================

/// Why a symbol did not become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    QuoteUnavailable,
    PriceOutOfRange,
    BarsUnavailable,
    InsufficientHistory,
    IvOutOfRange,
    BelowLiquidityCut,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuoteUnavailable => "quote_unavailable",
            Self::PriceOutOfRange => "price_out_of_range",
            Self::BarsUnavailable => "bars_unavailable",
            Self::InsufficientHistory => "insufficient_history",
            Self::IvOutOfRange => "iv_out_of_range",
            Self::BelowLiquidityCut => "below_liquidity_cut",
        }
    }
}

/// Per-reason rejection counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts(BTreeMap<String, usize>);

impl RejectionCounts {
    pub fn record(&mut self, reason: &str) {
        *self.0.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn add(&mut self, reason: &str, count: usize) {
        if count > 0 {
            *self.0.entry(reason.to_string()).or_insert(0) += count;
        }
    }

    pub fn get(&self, reason: &str) -> usize {
        self.0.get(reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Candidates plus the bookkeeping for the symbols that fell out.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub candidates: Vec<Candidate>,
    pub rejections: RejectionCounts,
}

// ============================================================================
// Candidate Filter
// ============================================================================

/// Builds candidates from the universe.
pub struct CandidateFilter {
    constraints: PortfolioConstraints,
    config: CandidateFilterConfig,
    fetch: FetchConfig,
}

impl CandidateFilter {
    pub fn new(
        constraints: PortfolioConstraints,
        config: CandidateFilterConfig,
        fetch: FetchConfig,
    ) -> Self {
        Self {
            constraints,
            config,
            fetch,
        }
    }

    /// Evaluate every symbol and keep the most liquid `top_candidates`.
    ///
    /// Output order is liquidity descending, then symbol ascending, regardless
    /// of the order fetches complete in.
    pub async fn run(&self, port: &dyn MarketDataPort, universe: &[String]) -> CandidateSet {
        let results: Vec<(String, Result<Candidate, Rejection>)> = stream::iter(universe)
            .map(|symbol| async move { (symbol.clone(), self.evaluate(port, symbol).await) })
            .buffer_unordered(self.fetch.concurrency.max(1))
            .collect()
            .await;

        let mut set = CandidateSet::default();
        for (symbol, result) in results {
            match result {
                Ok(candidate) => set.candidates.push(candidate),
                Err(rejection) => {
                    debug!(symbol = %symbol, reason = rejection.as_str(), "Symbol rejected");
                    set.rejections.record(rejection.as_str());
                }
            }
        }

        sort_by_liquidity(&mut set.candidates);
        let cut = set
            .candidates
            .len()
            .saturating_sub(self.constraints.top_candidates);
        set.candidates.truncate(self.constraints.top_candidates);
        set.rejections
            .add(Rejection::BelowLiquidityCut.as_str(), cut);

        info!(
            universe = universe.len(),
            candidates = set.candidates.len(),
            rejected = set.rejections.total(),
            "Candidate filter complete"
        );
        set
    }

    /// Build a candidate for one symbol.
    pub async fn evaluate(
        &self,
        port: &dyn MarketDataPort,
        symbol: &str,
    ) -> Result<Candidate, Rejection> {
        let timeout = self.fetch.timeout();

        let quote = with_timeout(timeout, "get_quote", port.get_quote(symbol))
            .await
            .map_err(|_| Rejection::QuoteUnavailable)?;
        let price = quote.price;
        if !price.is_finite()
            || price < self.constraints.min_stock_price
            || price > self.constraints.max_stock_price
        {
            return Err(Rejection::PriceOutOfRange);
        }

        let bars = with_timeout(
            timeout,
            "get_bars",
            port.get_bars(symbol, Interval::Daily, self.fetch.bars_lookback),
        )
        .await
        .map_err(|_| Rejection::BarsUnavailable)?;
        if bars.len() < self.config.min_bars {
            return Err(Rejection::InsufficientHistory);
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let hv = volatility::historical_volatility(&closes, self.config.hv_periods)
            .unwrap_or(self.config.fallback_hv);

        let (iv, iv_source) = match with_timeout(
            timeout,
            "get_implied_volatility",
            port.get_implied_volatility(symbol),
        )
        .await
        {
            Ok(iv) if iv.is_finite() && iv > 0.0 => (iv, IvSource::OptionsChain),
            _ => (hv * self.config.iv_multiplier, IvSource::HvMultiplier),
        };
        if iv < self.constraints.min_iv || iv > self.constraints.max_iv {
            return Err(Rejection::IvOutOfRange);
        }

        let hv_series = volatility::rolling_hv_series(&closes, self.config.hv_periods);
        let iv_rank = volatility::rank_in_range(&hv_series);
        let iv_percentile = volatility::percentile_of_last(&hv_series);

        let mut avg_volume = volatility::average_volume(&bars, self.config.liquidity_window);
        if avg_volume <= 0.0 {
            avg_volume = quote.volume.unwrap_or(0.0);
        }
        let liquidity_score =
            volatility::liquidity_score(avg_volume, self.config.liquidity_full_volume);

        let sma_50 = volatility::sma(&closes, 50);
        let trend = match sma_50 {
            Some(avg) if price < avg => TrendBias::Bearish,
            _ => TrendBias::Bullish,
        };

        let (fundamentals, sector) = tokio::join!(
            with_timeout(timeout, "get_fundamentals", port.get_fundamentals(symbol)),
            with_timeout(timeout, "get_sector", port.get_sector(symbol)),
        );
        let fundamentals = fundamentals.unwrap_or_else(|e| {
            debug!(symbol, reason = e.reason(), error = %e, "Fundamentals unavailable, using defaults");
            Fundamentals::default()
        });
        let sector = sector.unwrap_or_else(|e| {
            debug!(symbol, reason = e.reason(), error = %e, "Sector unavailable");
            self.config.unknown_sector.clone()
        });

        Ok(Candidate {
            symbol: symbol.to_string(),
            price,
            hv,
            iv,
            iv_source,
            iv_rank,
            iv_percentile,
            sector,
            liquidity_score,
            avg_volume,
            sma_50,
            trend,
            fundamentals,
        })
    }
}

/// Liquidity descending, then symbol ascending.
pub fn sort_by_liquidity(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.liquidity_score
            .total_cmp(&a.liquidity_score)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::{Bar, DataUnavailable, MacroSnapshot, NewsItem, Quote};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use std::collections::HashMap;

    /// Candidate with sane defaults for stage tests.
    pub(crate) fn sample_candidate(symbol: &str) -> Candidate {
        Candidate {
            symbol: symbol.to_string(),
            price: 100.0,
            hv: 25.0,
            iv: 32.5,
            iv_source: IvSource::HvMultiplier,
            iv_rank: 50.0,
            iv_percentile: 50.0,
            sector: "Technology".to_string(),
            liquidity_score: 80.0,
            avg_volume: 8_000_000.0,
            sma_50: Some(95.0),
            trend: TrendBias::Bullish,
            fundamentals: Fundamentals::default(),
        }
    }

    struct FakePort {
        quotes: HashMap<String, f64>,
        bars: usize,
        volume: f64,
        iv: Option<f64>,
    }

    fn bars(n: usize, volume: f64) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = if i % 2 == 0 { 100.0 } else { 101.5 };
                Bar {
                    date: start + Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume,
                }
            })
            .collect()
    }

    #[async_trait]
    impl MarketDataPort for FakePort {
        fn name(&self) -> &str {
            "fake"
        }

        async fn get_quote(&self, symbol: &str) -> Result<Quote, DataUnavailable> {
            self.quotes
                .get(symbol)
                .map(|p| Quote {
                    symbol: symbol.to_string(),
                    price: *p,
                    bid: None,
                    ask: None,
                    volume: None,
                })
                .ok_or_else(|| DataUnavailable::missing(symbol, "quote"))
        }

        async fn get_bars(
            &self,
            _symbol: &str,
            _interval: Interval,
            count: usize,
        ) -> Result<Vec<Bar>, DataUnavailable> {
            Ok(bars(self.bars.min(count), self.volume))
        }

        async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataUnavailable> {
            Err(DataUnavailable::missing(symbol, "fundamentals"))
        }

        async fn get_sector(&self, symbol: &str) -> Result<String, DataUnavailable> {
            Err(DataUnavailable::missing(symbol, "sector"))
        }

        async fn get_recent_news(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<NewsItem>, DataUnavailable> {
            Ok(Vec::new())
        }

        async fn get_macro_indicators(&self) -> Result<MacroSnapshot, DataUnavailable> {
            Ok(MacroSnapshot::default())
        }

        async fn get_implied_volatility(&self, symbol: &str) -> Result<f64, DataUnavailable> {
            self.iv
                .ok_or_else(|| DataUnavailable::missing(symbol, "implied volatility"))
        }
    }

    fn filter() -> CandidateFilter {
        CandidateFilter::new(
            PortfolioConstraints::default(),
            CandidateFilterConfig::default(),
            FetchConfig::default(),
        )
    }

    fn port(quotes: &[(&str, f64)]) -> FakePort {
        FakePort {
            quotes: quotes.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
            bars: 120,
            volume: 4_000_000.0,
            iv: None,
        }
    }

    #[tokio::test]
    async fn test_candidate_defaults_when_fundamentals_missing() {
        let c = filter().evaluate(&port(&[("AAPL", 101.0)]), "AAPL").await.unwrap();
        assert_eq!(c.sector, "Unknown");
        assert_eq!(c.fundamentals, Fundamentals::default());
        assert_eq!(c.iv_source, IvSource::HvMultiplier);
        assert!((c.iv - c.hv * 1.3).abs() < 1e-9);
        assert!((c.liquidity_score - 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_chain_iv_preferred() {
        let mut p = port(&[("AAPL", 101.0)]);
        p.iv = Some(42.0);
        let c = filter().evaluate(&p, "AAPL").await.unwrap();
        assert_eq!(c.iv, 42.0);
        assert_eq!(c.iv_source, IvSource::OptionsChain);
    }

    #[tokio::test]
    async fn test_rejection_reasons() {
        let f = filter();
        let p = port(&[("PENNY", 3.0), ("AAPL", 101.0)]);
        assert_eq!(f.evaluate(&p, "PENNY").await, Err(Rejection::PriceOutOfRange));
        assert_eq!(f.evaluate(&p, "GONE").await, Err(Rejection::QuoteUnavailable));

        let mut short = port(&[("NEW", 50.0)]);
        short.bars = 30;
        assert_eq!(
            f.evaluate(&short, "NEW").await,
            Err(Rejection::InsufficientHistory)
        );

        let mut wild = port(&[("MEME", 50.0)]);
        wild.iv = Some(250.0);
        assert_eq!(f.evaluate(&wild, "MEME").await, Err(Rejection::IvOutOfRange));
    }

    #[tokio::test]
    async fn test_run_counts_and_orders() {
        let p = port(&[("MSFT", 101.0), ("AAPL", 101.0), ("PENNY", 2.0)]);
        let universe: Vec<String> = ["MSFT", "AAPL", "PENNY", "GONE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let set = filter().run(&p, &universe).await;

        let symbols: Vec<&str> = set.candidates.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(set.rejections.get("price_out_of_range"), 1);
        assert_eq!(set.rejections.get("quote_unavailable"), 1);
        assert_eq!(set.rejections.total(), 2);
    }

    #[tokio::test]
    async fn test_run_truncates_to_top_candidates() {
        let names: Vec<String> = (0..30).map(|i| format!("S{i:02}")).collect();
        let quotes: Vec<(&str, f64)> = names.iter().map(|s| (s.as_str(), 101.0)).collect();
        let set = filter().run(&port(&quotes), &names).await;
        assert_eq!(set.candidates.len(), 22);
        assert_eq!(set.rejections.get("below_liquidity_cut"), 8);
        assert_eq!(set.candidates[0].symbol, "S00");
    }

    #[test]
    fn test_sort_by_liquidity_tie_break() {
        let mut a = sample_candidate("ZZZ");
        a.liquidity_score = 90.0;
        let b = sample_candidate("BBB");
        let c = sample_candidate("AAA");
        let mut list = vec![b, a, c];
        sort_by_liquidity(&mut list);
        let order: Vec<&str> = list.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(order, vec!["ZZZ", "AAA", "BBB"]);
    }
}
