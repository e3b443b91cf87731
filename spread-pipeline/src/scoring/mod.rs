//! Convergence scoring.
//!
//! Four independent 0-100 sub-scores per candidate:
//! - **vol_edge**: premium richness (IV vs. HV, IV rank and percentile)
//! - **quality**: fundamental checklist
//! - **regime**: macro regime fit by sector and beta
//! - **info_edge**: analysts, insiders, news flow, earnings
//!
//! A candidate passes the convergence gate when at least three sub-scores
//! exceed 50.

pub mod info_edge;
pub mod quality;
pub mod regime;
pub mod vol_edge;

pub use info_edge::InfoEdgeConfig;
pub use quality::QualityConfig;
pub use regime::{MarketRegime, RegimeConfig, RegimeContext};
pub use vol_edge::VolEdgeConfig;

use serde::{Deserialize, Serialize};
use spread_common::validation::{Validate, ValidationReport, ValidationResult};

use crate::candidate::Candidate;
use crate::data::{AnalystRecommendations, InsiderActivity, NewsSentiment};

/// Sub-score a component must exceed to count toward the gate.
pub const GATE_SCORE: f64 = 50.0;

/// Sub-scores above [`GATE_SCORE`] required to pass the gate.
pub const GATE_MIN_COUNT: usize = 3;

// ============================================================================
// Stock Scores
// ============================================================================

/// Sub-scores and gate outcome for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockScores {
    pub symbol: String,
    pub vol_edge: f64,
    pub quality: f64,
    pub regime: f64,
    pub info_edge: f64,
    /// Sum of sub-scores (0-400)
    pub total: f64,
    /// At least [`GATE_MIN_COUNT`] sub-scores above [`GATE_SCORE`]
    pub pass_gate: bool,
}

impl StockScores {
    /// Clamp each sub-score to [0, 100] and derive `total` and `pass_gate`.
    pub fn new(symbol: &str, vol_edge: f64, quality: f64, regime: f64, info_edge: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
        let (vol_edge, quality, regime, info_edge) =
            (clamp(vol_edge), clamp(quality), clamp(regime), clamp(info_edge));

        let above = [vol_edge, quality, regime, info_edge]
            .iter()
            .filter(|s| **s > GATE_SCORE)
            .count();

        Self {
            symbol: symbol.to_string(),
            vol_edge,
            quality,
            regime,
            info_edge,
            total: vol_edge + quality + regime + info_edge,
            pass_gate: above >= GATE_MIN_COUNT,
        }
    }
}

/// Optional per-symbol signals feeding the information edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoSignals {
    pub recommendations: Option<AnalystRecommendations>,
    pub insider_activity: Option<InsiderActivity>,
    pub news_sentiment: Option<NewsSentiment>,
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Thresholds for every sub-score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub vol_edge: VolEdgeConfig,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub regime: RegimeConfig,
    #[serde(default)]
    pub info_edge: InfoEdgeConfig,
}

impl Validate for ScoringConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        let v = &self.vol_edge;
        report.require(
            v.ratio_cheap <= v.ratio_fair
                && v.ratio_fair <= v.ratio_elevated
                && v.ratio_elevated <= v.ratio_rich,
            "scoring.vol_edge.ratio_*",
            "tiers must be ascending (cheap <= fair <= elevated <= rich)",
        );
        report.require(
            v.hv_band_low < v.hv_band_high,
            "scoring.vol_edge.hv_band_low",
            "must be below hv_band_high",
        );
        let r = &self.regime;
        report.require(
            r.calm_vix < r.stressed_vix,
            "scoring.regime.calm_vix",
            "must be below stressed_vix",
        );
        report.require(
            r.low_unemployment < r.high_unemployment,
            "scoring.regime.low_unemployment",
            "must be below high_unemployment",
        );
        report.require(
            r.beta_weights.windows(2).all(|w| w[0].below < w[1].below),
            "scoring.regime.beta_weights",
            "bands must be ascending",
        );
        report.require(
            r.beta_weights
                .iter()
                .map(|b| b.weight)
                .chain([r.beta_weight_ceiling])
                .all(|w| w.is_finite() && w >= 0.0),
            "scoring.regime.beta_weights",
            "weights must be finite and non-negative",
        );
        report.require(
            self.quality.cheap_pe <= self.quality.fair_pe,
            "scoring.quality.cheap_pe",
            "must not exceed fair_pe",
        );
        report.finish()
    }
}

// ============================================================================
// Scoring Engine
// ============================================================================

/// Pure scoring over candidates. Holds only immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Classify the macro regime for this run.
    pub fn regime_context(&self, snapshot: crate::data::MacroSnapshot) -> RegimeContext {
        RegimeContext::new(snapshot, &self.config.regime)
    }

    /// Score one candidate.
    pub fn score(
        &self,
        candidate: &Candidate,
        signals: &InfoSignals,
        context: &RegimeContext,
    ) -> StockScores {
        StockScores::new(
            &candidate.symbol,
            vol_edge::score(candidate, &self.config.vol_edge),
            quality::score(&candidate.fundamentals, &self.config.quality),
            regime::score(candidate, context, &self.config.regime),
            info_edge::score(candidate, signals, &self.config.info_edge),
        )
    }
}
