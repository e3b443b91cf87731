//! Information edge from analysts, insiders, news flow and earnings.

use serde::{Deserialize, Serialize};

use super::InfoSignals;
use crate::candidate::Candidate;

/// Thresholds and point values for the information edge score.
///
/// Point values are magnitudes; bearish tiers subtract them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoEdgeConfig {
    /// Buy/sell analyst ratio for the strong bullish tier
    #[serde(default = "default_analyst_strong")]
    pub analyst_strong: f64,
    #[serde(default = "default_analyst_positive")]
    pub analyst_positive: f64,
    /// Below this ratio analysts lean bearish
    #[serde(default = "default_analyst_negative")]
    pub analyst_negative: f64,
    #[serde(default = "default_analyst_weak")]
    pub analyst_weak: f64,

    #[serde(default = "default_insider_strong")]
    pub insider_strong: f64,
    #[serde(default = "default_insider_positive")]
    pub insider_positive: f64,
    #[serde(default = "default_insider_negative")]
    pub insider_negative: f64,

    /// Article volume vs. weekly average that counts as elevated interest
    #[serde(default = "default_buzz_elevated")]
    pub buzz_elevated: f64,

    #[serde(default = "default_bearish_heavy")]
    pub bearish_heavy: f64,
    #[serde(default = "default_bearish_elevated")]
    pub bearish_elevated: f64,
    #[serde(default = "default_bearish_light")]
    pub bearish_light: f64,

    /// Earnings surprise (%) for the large-beat / large-miss tiers
    #[serde(default = "default_large_surprise")]
    pub large_surprise: f64,

    #[serde(default = "default_analyst_major_points")]
    pub analyst_major_points: f64,
    #[serde(default = "default_analyst_minor_points")]
    pub analyst_minor_points: f64,
    #[serde(default = "default_insider_major_points")]
    pub insider_major_points: f64,
    #[serde(default = "default_insider_minor_points")]
    pub insider_minor_points: f64,
    #[serde(default = "default_buzz_points")]
    pub buzz_points: f64,
    #[serde(default = "default_bearish_heavy_points")]
    pub bearish_heavy_points: f64,
    #[serde(default = "default_bearish_elevated_points")]
    pub bearish_elevated_points: f64,
    /// Added when bearish coverage is below `bearish_light`
    #[serde(default = "default_bearish_light_points")]
    pub bearish_light_points: f64,
    #[serde(default = "default_earnings_major_points")]
    pub earnings_major_points: f64,
    #[serde(default = "default_earnings_minor_points")]
    pub earnings_minor_points: f64,
}

impl Default for InfoEdgeConfig {
    fn default() -> Self {
        Self {
            analyst_strong: default_analyst_strong(),
            analyst_positive: default_analyst_positive(),
            analyst_negative: default_analyst_negative(),
            analyst_weak: default_analyst_weak(),
            insider_strong: default_insider_strong(),
            insider_positive: default_insider_positive(),
            insider_negative: default_insider_negative(),
            buzz_elevated: default_buzz_elevated(),
            bearish_heavy: default_bearish_heavy(),
            bearish_elevated: default_bearish_elevated(),
            bearish_light: default_bearish_light(),
            large_surprise: default_large_surprise(),
            analyst_major_points: default_analyst_major_points(),
            analyst_minor_points: default_analyst_minor_points(),
            insider_major_points: default_insider_major_points(),
            insider_minor_points: default_insider_minor_points(),
            buzz_points: default_buzz_points(),
            bearish_heavy_points: default_bearish_heavy_points(),
            bearish_elevated_points: default_bearish_elevated_points(),
            bearish_light_points: default_bearish_light_points(),
            earnings_major_points: default_earnings_major_points(),
            earnings_minor_points: default_earnings_minor_points(),
        }
    }
}

fn default_analyst_strong() -> f64 {
    3.0
}
fn default_analyst_positive() -> f64 {
    1.5
}
fn default_analyst_negative() -> f64 {
    0.5
}
fn default_analyst_weak() -> f64 {
    1.0
}
fn default_insider_strong() -> f64 {
    2.0
}
fn default_insider_positive() -> f64 {
    1.0
}
fn default_insider_negative() -> f64 {
    0.5
}
fn default_buzz_elevated() -> f64 {
    1.5
}
fn default_bearish_heavy() -> f64 {
    60.0
}
fn default_bearish_elevated() -> f64 {
    40.0
}
fn default_bearish_light() -> f64 {
    20.0
}
fn default_large_surprise() -> f64 {
    10.0
}
fn default_analyst_major_points() -> f64 {
    15.0
}
fn default_analyst_minor_points() -> f64 {
    8.0
}
fn default_insider_major_points() -> f64 {
    10.0
}
fn default_insider_minor_points() -> f64 {
    5.0
}
fn default_buzz_points() -> f64 {
    5.0
}
fn default_bearish_heavy_points() -> f64 {
    15.0
}
fn default_bearish_elevated_points() -> f64 {
    5.0
}
fn default_bearish_light_points() -> f64 {
    10.0
}
fn default_earnings_major_points() -> f64 {
    10.0
}
fn default_earnings_minor_points() -> f64 {
    5.0
}

/// Ratio of two counts. `None` when both are zero; infinite when only the
/// denominator is zero.
fn count_ratio(num: u32, den: u32) -> Option<f64> {
    match (num, den) {
        (0, 0) => None,
        (_, 0) => Some(f64::INFINITY),
        (n, d) => Some(f64::from(n) / f64::from(d)),
    }
}

fn analyst_delta(signals: &InfoSignals, config: &InfoEdgeConfig) -> f64 {
    let Some(r) = &signals.recommendations else {
        return 0.0;
    };
    match count_ratio(r.strong_buy + r.buy, r.sell + r.strong_sell) {
        Some(ratio) if ratio > config.analyst_strong => config.analyst_major_points,
        Some(ratio) if ratio > config.analyst_positive => config.analyst_minor_points,
        Some(ratio) if ratio < config.analyst_negative => -config.analyst_major_points,
        Some(ratio) if ratio < config.analyst_weak => -config.analyst_minor_points,
        _ => 0.0,
    }
}

fn insider_delta(signals: &InfoSignals, config: &InfoEdgeConfig) -> f64 {
    let Some(i) = &signals.insider_activity else {
        return 0.0;
    };
    match count_ratio(i.buys, i.sells) {
        Some(ratio) if ratio > config.insider_strong => config.insider_major_points,
        Some(ratio) if ratio > config.insider_positive => config.insider_minor_points,
        Some(ratio) if ratio < config.insider_negative => -config.insider_major_points,
        _ => 0.0,
    }
}

fn sentiment_delta(signals: &InfoSignals, config: &InfoEdgeConfig) -> f64 {
    let Some(s) = &signals.news_sentiment else {
        return 0.0;
    };
    let buzz = match s.buzz {
        Some(b) if b > config.buzz_elevated => config.buzz_points,
        _ => 0.0,
    };
    let bearish = match s.bearish_pct {
        Some(p) if p > config.bearish_heavy => -config.bearish_heavy_points,
        Some(p) if p > config.bearish_elevated => -config.bearish_elevated_points,
        Some(p) if p < config.bearish_light => config.bearish_light_points,
        _ => 0.0,
    };
    buzz + bearish
}

fn earnings_delta(candidate: &Candidate, config: &InfoEdgeConfig) -> f64 {
    match candidate.fundamentals.earnings_surprise {
        Some(s) if s > config.large_surprise => config.earnings_major_points,
        Some(s) if s > 0.0 => config.earnings_minor_points,
        Some(s) if s < -config.large_surprise => -config.earnings_major_points,
        Some(s) if s < 0.0 => -config.earnings_minor_points,
        _ => 0.0,
    }
}

/// Information edge score, 0-100. Starts neutral at 50.
pub fn score(candidate: &Candidate, signals: &InfoSignals, config: &InfoEdgeConfig) -> f64 {
    let raw = 50.0
        + analyst_delta(signals, config)
        + insider_delta(signals, config)
        + sentiment_delta(signals, config)
        + earnings_delta(candidate, config);
    raw.clamp(0.0, 100.0)
}
