//! News gate.
//!
//! Scans the most recent headlines (and article bodies, when the feed has
//! them) for each shortlisted spread and flags event risk. A spread with a
//! red-flag headline is held back (`Wait`);
//! data failures fall back to a neutral review so the gate never blocks a
//! run.

use aho_corasick::{AhoCorasick, MatchKind};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::NewsGateConfig;
use crate::data::{with_timeout, MarketDataPort, NewsItem};
use crate::spread::CreditSpread;

// ============================================================================
// Review
// ============================================================================

/// What to do with a spread after the news check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsAction {
    /// No event risk found
    Trade,
    /// Event risk; hold until it clears
    Wait,
    /// Drop from the basket
    Skip,
}

impl std::fmt::Display for NewsAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trade => write!(f, "trade"),
            Self::Wait => write!(f, "wait"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Outcome of the news check for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsReview {
    /// Heat (0-10)
    pub heat: u8,
    pub action: NewsAction,
    /// Red-flag keywords found, lowercased and sorted
    pub red_flags: Vec<String>,
    /// Headlines inspected
    pub headlines: Vec<String>,
    /// False when the news fetch failed and the review is a default
    pub fetched: bool,
}

impl NewsReview {
    /// Neutral review used when headlines cannot be fetched.
    pub fn neutral(heat: u8) -> Self {
        Self {
            heat,
            action: NewsAction::Trade,
            red_flags: Vec::new(),
            headlines: Vec::new(),
            fetched: false,
        }
    }

    /// Short note appended to the spread thesis.
    pub fn note(&self) -> String {
        if !self.fetched {
            "news unavailable".to_string()
        } else if self.red_flags.is_empty() {
            "news clear".to_string()
        } else {
            format!("news: {} ({})", self.red_flags.join(", "), self.action)
        }
    }
}

// ============================================================================
// News Gate
// ============================================================================

/// Keyword red-flag gate over recent headlines.
pub struct NewsGate {
    config: NewsGateConfig,
    matcher: AhoCorasick,
    keywords: Vec<String>,
    timeout: Duration,
    concurrency: usize,
}

impl NewsGate {
    pub fn new(
        config: NewsGateConfig,
        timeout: Duration,
        concurrency: usize,
    ) -> spread_common::Result<Self> {
        let keywords: Vec<String> = config
            .red_flag_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&keywords)
            .map_err(|e| spread_common::Error::Config(format!("news keywords: {e}")))?;

        Ok(Self {
            config,
            matcher,
            keywords,
            timeout,
            concurrency: concurrency.max(1),
        })
    }

    /// Red-flag keywords present in the given headlines.
    pub fn scan<'a>(&self, headlines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let hits: BTreeSet<&str> = headlines
            .into_iter()
            .flat_map(|h| self.matcher.find_iter(h))
            .map(|m| self.keywords[m.pattern().as_usize()].as_str())
            .collect();
        hits.into_iter().map(str::to_string).collect()
    }

    fn action_for(&self, heat: u8) -> NewsAction {
        if heat >= self.config.skip_heat {
            NewsAction::Skip
        } else if heat > self.config.neutral_heat {
            NewsAction::Wait
        } else {
            NewsAction::Trade
        }
    }

    /// Review one symbol's recent headlines.
    pub async fn review(&self, port: &dyn MarketDataPort, symbol: &str) -> NewsReview {
        let news = with_timeout(
            self.timeout,
            "get_recent_news",
            port.get_recent_news(symbol, self.config.lookback_days),
        )
        .await;

        let items = match news {
            Ok(items) => items,
            Err(e) => {
                warn!(symbol, reason = e.reason(), error = %e, "News unavailable, using neutral review");
                return NewsReview::neutral(self.config.neutral_heat);
            }
        };

        let inspected: Vec<NewsItem> = items.into_iter().take(self.config.max_headlines).collect();
        let red_flags = self.scan(
            inspected
                .iter()
                .flat_map(|n| std::iter::once(n.headline.as_str()).chain(n.content.as_deref())),
        );
        let headlines: Vec<String> = inspected.into_iter().map(|n| n.headline).collect();
        let heat = if red_flags.is_empty() {
            self.config.neutral_heat
        } else {
            self.config.red_flag_heat
        };
        if !red_flags.is_empty() {
            debug!(symbol, flags = ?red_flags, heat, "Red-flag headlines");
        }

        NewsReview {
            heat,
            action: self.action_for(heat),
            red_flags,
            headlines,
            fetched: true,
        }
    }

    /// Attach reviews to every spread and drop the ones marked `Skip`.
    ///
    /// Input order is preserved.
    pub async fn run(
        &self,
        port: &dyn MarketDataPort,
        spreads: Vec<CreditSpread>,
    ) -> Vec<CreditSpread> {
        let input = spreads.len();
        let reviewed: Vec<CreditSpread> = stream::iter(spreads)
            .map(|spread| async move {
                let review = self.review(port, &spread.symbol).await;
                spread.with_review(review)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let waiting = reviewed
            .iter()
            .filter(|s| s.news_action == NewsAction::Wait)
            .count();
        let kept: Vec<CreditSpread> = reviewed
            .into_iter()
            .filter(|s| s.news_action != NewsAction::Skip)
            .collect();

        info!(
            input,
            kept = kept.len(),
            waiting,
            skipped = input - kept.len(),
            "News gate complete"
        );
        kept
    }
}
