//! Market data for the selection pipeline.
//!
//! Provides the `MarketDataPort` abstraction every stage reads through, the
//! plain data records it returns, and a snapshot-backed adapter.
//!
//! # Adapters
//! - **SnapshotProvider**: answers every call from a JSON market snapshot on disk

mod fetch;
mod provider;
mod snapshot;

pub use fetch::with_timeout;
pub use provider::{DataUnavailable, MarketDataPort};
pub use snapshot::{MarketSnapshot, SnapshotProvider, SymbolSnapshot};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Data Types
// ============================================================================

/// Bar interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Daily bars
    Daily,
    /// Weekly bars
    Weekly,
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "D"),
            Self::Weekly => write!(f, "W"),
        }
    }
}

/// OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Session date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Share volume
    #[serde(default)]
    pub volume: f64,
}

/// Latest quote for an underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// Best bid
    #[serde(default)]
    pub bid: Option<f64>,
    /// Best ask
    #[serde(default)]
    pub ask: Option<f64>,
    /// Session volume
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Company fundamentals.
///
/// Ratios and margins are in percent (12.5 means 12.5%). Every field is
/// optional; a missing metric contributes nothing to the quality score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fundamentals {
    /// Trailing net income
    pub net_income: Option<f64>,
    /// Trailing operating cash flow
    pub operating_cash_flow: Option<f64>,
    /// Return on assets (%)
    pub roa: Option<f64>,
    /// Debt to equity (%)
    pub debt_to_equity: Option<f64>,
    /// Current ratio
    pub current_ratio: Option<f64>,
    /// Gross margin (%)
    pub gross_margin: Option<f64>,
    /// Operating margin (%)
    pub operating_margin: Option<f64>,
    /// Year-over-year revenue growth (%)
    pub revenue_growth: Option<f64>,
    /// Trailing price / earnings
    pub pe_ratio: Option<f64>,
    /// Beta against the broad market
    pub beta: Option<f64>,
    /// Last earnings surprise (%)
    pub earnings_surprise: Option<f64>,
}

/// A single headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline text
    pub headline: String,
    /// Publication date
    pub published: NaiveDate,
    /// Publisher, when known
    #[serde(default)]
    pub source: Option<String>,
    /// Article body or summary, when the feed carries one
    #[serde(default)]
    pub content: Option<String>,
}

/// Macro indicators used for regime classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSnapshot {
    /// CBOE volatility index
    pub vix: Option<f64>,
    /// Year-over-year CPI inflation (%)
    pub cpi: Option<f64>,
    /// Effective fed funds rate (%)
    pub fed_funds_rate: Option<f64>,
    /// Unemployment rate (%)
    pub unemployment_rate: Option<f64>,
    /// Consumer confidence index
    pub consumer_confidence: Option<f64>,
    /// 10-year treasury yield (%)
    pub treasury_10y: Option<f64>,
}

/// Analyst rating counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalystRecommendations {
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

/// Insider transaction counts over the provider's lookback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsiderActivity {
    pub buys: u32,
    pub sells: u32,
}

/// Aggregated news sentiment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSentiment {
    /// Article volume relative to the weekly average (1.0 = normal)
    pub buzz: Option<f64>,
    /// Share of bearish articles (%)
    pub bearish_pct: Option<f64>,
}
