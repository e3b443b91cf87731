//! Snapshot-backed market data.
//!
//! Reads a single JSON document holding everything the pipeline needs for
//! one run and answers port calls from memory. Runs against the same
//! snapshot are fully reproducible.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{
    AnalystRecommendations, Bar, DataUnavailable, Fundamentals, InsiderActivity, Interval,
    MacroSnapshot, MarketDataPort, NewsItem, NewsSentiment, Quote,
};

// ============================================================================
// Snapshot Document
// ============================================================================

/// One run's worth of market data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Date the snapshot was taken; anchors the news lookback
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    /// Macro indicators
    #[serde(default, rename = "macro")]
    pub macro_indicators: Option<MacroSnapshot>,

    /// Per-symbol data, keyed by ticker
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolSnapshot>,
}

/// Everything known about one symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolSnapshot {
    pub quote: Option<Quote>,
    /// Daily bars, any order
    pub bars: Vec<Bar>,
    pub fundamentals: Option<Fundamentals>,
    pub sector: Option<String>,
    pub news: Vec<NewsItem>,
    /// ATM implied volatility (annualized %)
    pub implied_volatility: Option<f64>,
    pub recommendations: Option<AnalystRecommendations>,
    pub insider_activity: Option<InsiderActivity>,
    pub news_sentiment: Option<NewsSentiment>,
}

// ============================================================================
// Snapshot Provider
// ============================================================================

/// `MarketDataPort` over an in-memory [`MarketSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: MarketSnapshot,
}

impl SnapshotProvider {
    pub fn new(mut snapshot: MarketSnapshot) -> Self {
        for entry in snapshot.symbols.values_mut() {
            entry.bars.sort_by_key(|b| b.date);
            entry.news.sort_by(|a, b| b.published.cmp(&a.published));
        }
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: MarketSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            symbols = snapshot.symbols.len(),
            "Loaded market snapshot"
        );
        Ok(Self::new(snapshot))
    }

    /// Symbols present in the snapshot, sorted.
    pub fn symbols(&self) -> Vec<String> {
        self.snapshot.symbols.keys().cloned().collect()
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.snapshot.as_of
    }

    fn entry(&self, symbol: &str) -> Result<&SymbolSnapshot, DataUnavailable> {
        self.snapshot
            .symbols
            .get(symbol)
            .ok_or_else(|| DataUnavailable::missing(symbol, "symbol"))
    }
}

#[async_trait]
impl MarketDataPort for SnapshotProvider {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataUnavailable> {
        self.entry(symbol)?
            .quote
            .clone()
            .ok_or_else(|| DataUnavailable::missing(symbol, "quote"))
    }

    async fn get_bars(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<Bar>, DataUnavailable> {
        if interval != Interval::Daily {
            return Err(DataUnavailable::Unsupported);
        }
        let bars = &self.entry(symbol)?.bars;
        if bars.is_empty() {
            return Err(DataUnavailable::missing(symbol, "bars"));
        }
        let start = bars.len().saturating_sub(count);
        Ok(bars[start..].to_vec())
    }

    async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataUnavailable> {
        self.entry(symbol)?
            .fundamentals
            .clone()
            .ok_or_else(|| DataUnavailable::missing(symbol, "fundamentals"))
    }

    async fn get_sector(&self, symbol: &str) -> Result<String, DataUnavailable> {
        self.entry(symbol)?
            .sector
            .clone()
            .ok_or_else(|| DataUnavailable::missing(symbol, "sector"))
    }

    async fn get_recent_news(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<NewsItem>, DataUnavailable> {
        let news = &self.entry(symbol)?.news;
        let items = match self.snapshot.as_of {
            Some(as_of) => {
                let cutoff = as_of
                    .checked_sub_signed(Duration::days(i64::from(days)))
                    .ok_or_else(|| {
                        DataUnavailable::Source(format!("news lookback of {days} days out of range"))
                    })?;
                news.iter()
                    .filter(|n| n.published >= cutoff && n.published <= as_of)
                    .cloned()
                    .collect()
            }
            None => news.clone(),
        };
        Ok(items)
    }

    async fn get_macro_indicators(&self) -> Result<MacroSnapshot, DataUnavailable> {
        self.snapshot
            .macro_indicators
            .clone()
            .ok_or_else(|| DataUnavailable::missing("*", "macro indicators"))
    }

    async fn get_implied_volatility(&self, symbol: &str) -> Result<f64, DataUnavailable> {
        self.entry(symbol)?
            .implied_volatility
            .ok_or_else(|| DataUnavailable::missing(symbol, "implied volatility"))
    }

    async fn get_recommendations(
        &self,
        symbol: &str,
    ) -> Result<AnalystRecommendations, DataUnavailable> {
        self.entry(symbol)?
            .recommendations
            .clone()
            .ok_or_else(|| DataUnavailable::missing(symbol, "recommendations"))
    }

    async fn get_insider_activity(&self, symbol: &str) -> Result<InsiderActivity, DataUnavailable> {
        self.entry(symbol)?
            .insider_activity
            .clone()
            .ok_or_else(|| DataUnavailable::missing(symbol, "insider activity"))
    }

    async fn get_news_sentiment(&self, symbol: &str) -> Result<NewsSentiment, DataUnavailable> {
        self.entry(symbol)?
            .news_sentiment
            .clone()
            .ok_or_else(|| DataUnavailable::missing(symbol, "news sentiment"))
    }
}
