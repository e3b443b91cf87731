//! Market data port.
//!
//! Defines the `MarketDataPort` trait that every data source implements.
//! The core calls are required; the signal calls default to
//! [`DataUnavailable::Unsupported`] so simple adapters stay small.

use async_trait::async_trait;
use thiserror::Error;

use super::{
    AnalystRecommendations, Bar, Fundamentals, InsiderActivity, Interval, MacroSnapshot,
    NewsItem, NewsSentiment, Quote,
};

// ============================================================================
// Data Errors
// ============================================================================

/// A single piece of market data could not be obtained.
///
/// Never fatal: the stage that sees it drops the symbol or falls back to a
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUnavailable {
    /// Source has no entry for this symbol / data kind
    #[error("{kind} not available for {symbol}")]
    Missing { symbol: String, kind: &'static str },

    /// Source does not offer this kind of data at all
    #[error("not supported by this data source")]
    Unsupported,

    /// Call exceeded the fetch timeout
    #[error("{operation} timed out")]
    Timeout { operation: String },

    /// Source-side failure (network, parse, rate limit)
    #[error("data source error: {0}")]
    Source(String),
}

impl DataUnavailable {
    /// Shorthand for a `Missing` error.
    pub fn missing(symbol: &str, kind: &'static str) -> Self {
        Self::Missing {
            symbol: symbol.to_string(),
            kind,
        }
    }

    /// Short reason label for rejection counters and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::Unsupported => "unsupported",
            Self::Timeout { .. } => "timeout",
            Self::Source(_) => "source_error",
        }
    }
}

// ============================================================================
// Market Data Port
// ============================================================================

/// Read-only market data access.
///
/// Implementations must be safe to call concurrently for different symbols.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Source name for logs
    fn name(&self) -> &str;

    /// Latest quote
    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataUnavailable>;

    /// Most recent `count` bars, oldest first
    async fn get_bars(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<Bar>, DataUnavailable>;

    /// Company fundamentals
    async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataUnavailable>;

    /// Sector classification
    async fn get_sector(&self, symbol: &str) -> Result<String, DataUnavailable>;

    /// Headlines from the last `days` days, newest first
    async fn get_recent_news(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<NewsItem>, DataUnavailable>;

    /// Current macro indicators
    async fn get_macro_indicators(&self) -> Result<MacroSnapshot, DataUnavailable>;

    /// At-the-money implied volatility from the options chain (annualized %)
    async fn get_implied_volatility(&self, _symbol: &str) -> Result<f64, DataUnavailable> {
        Err(DataUnavailable::Unsupported)
    }

    /// Analyst rating counts
    async fn get_recommendations(
        &self,
        _symbol: &str,
    ) -> Result<AnalystRecommendations, DataUnavailable> {
        Err(DataUnavailable::Unsupported)
    }

    /// Insider transaction counts
    async fn get_insider_activity(&self, _symbol: &str) -> Result<InsiderActivity, DataUnavailable> {
        Err(DataUnavailable::Unsupported)
    }

    /// News sentiment aggregates
    async fn get_news_sentiment(&self, _symbol: &str) -> Result<NewsSentiment, DataUnavailable> {
        Err(DataUnavailable::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reason_labels() {
        assert_eq!(DataUnavailable::missing("AAPL", "quote").reason(), "missing");
        assert_eq!(DataUnavailable::Unsupported.reason(), "unsupported");
        assert_eq!(
            DataUnavailable::Timeout {
                operation: "get_bars".into()
            }
            .reason(),
            "timeout"
        );
    }

    #[test]
    fn test_error_display() {
        let err = DataUnavailable::missing("MSFT", "fundamentals");
        assert_eq!(err.to_string(), "fundamentals not available for MSFT");
    }
}
