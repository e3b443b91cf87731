//! Selection pipeline orchestrator.
//!
//! Runs the stages strictly in order, each consuming the previous stage's
//! output:
//!
//! ```text
//! universe -> CandidateFilter -> ScoringEngine -> SpreadConstructor
//!          -> PortfolioSelector -> NewsGate -> FinalizationStage
//! ```
//!
//! Per-symbol data faults are absorbed by the stage that sees them. The only
//! fatal errors are configuration errors, raised before anything runs.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::candidate::{Candidate, CandidateFilter, RejectionCounts};
use crate::config::PipelineConfig;
use crate::data::{with_timeout, MarketDataPort};
use crate::finalize::{FinalizationStage, Recommendation};
use crate::news::NewsGate;
use crate::portfolio::PortfolioSelector;
use crate::scoring::{InfoSignals, MarketRegime, RegimeContext, ScoringEngine, StockScores};
use crate::spread::SpreadConstructor;
use spread_common::Validate;

// ============================================================================
// Funnel
// ============================================================================

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    CandidateFilter,
    Scoring,
    SpreadConstruction,
    PortfolioSelection,
    NewsGate,
    Finalization,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CandidateFilter => "Candidate filter",
            Self::Scoring => "Convergence gate",
            Self::SpreadConstruction => "Spread construction",
            Self::PortfolioSelection => "Portfolio selection",
            Self::NewsGate => "News gate",
            Self::Finalization => "Finalization",
        };
        write!(f, "{}", s)
    }
}

/// Counts in and out of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    /// Stage name
    pub stage: PipelineStage,
    /// Items entering the stage
    pub input: usize,
    /// Items that passed
    pub passed: usize,
    /// Items eliminated
    pub eliminated: usize,
    /// Elimination rate (%)
    pub elimination_rate: f64,
    /// Eliminations by reason
    pub rejections: RejectionCounts,
}

impl StageResult {
    pub fn new(stage: PipelineStage, input: usize, passed: usize) -> Self {
        let eliminated = input.saturating_sub(passed);
        let elimination_rate = if input > 0 {
            (eliminated as f64 / input as f64) * 100.0
        } else {
            0.0
        };

        Self {
            stage,
            input,
            passed,
            eliminated,
            elimination_rate,
            rejections: RejectionCounts::default(),
        }
    }

    pub fn with_rejections(mut self, rejections: RejectionCounts) -> Self {
        self.rejections = rejections;
        self
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub as_of: NaiveDate,
    pub regime: MarketRegime,
    pub funnel: Vec<StageResult>,
    /// Scores for every candidate, in candidate order
    pub scores: Vec<StockScores>,
    pub recommendation: Recommendation,
}

// ============================================================================
// Selection Pipeline
// ============================================================================

/// Wires the stages together over one market data port.
pub struct SelectionPipeline {
    config: PipelineConfig,
    port: Arc<dyn MarketDataPort>,
    filter: CandidateFilter,
    engine: ScoringEngine,
    constructor: SpreadConstructor,
    selector: PortfolioSelector,
    news: NewsGate,
    finalizer: FinalizationStage,
}

impl SelectionPipeline {
    /// Validate the configuration and build every stage.
    pub fn new(config: PipelineConfig, port: Arc<dyn MarketDataPort>) -> spread_common::Result<Self> {
        config.validate()?;

        let constraints = config.constraints.clone();
        let news = NewsGate::new(
            config.news.clone(),
            config.fetch.timeout(),
            config.fetch.concurrency,
        )
        .map_err(|e| e.with_context("building news gate"))?;

        Ok(Self {
            filter: CandidateFilter::new(
                constraints.clone(),
                config.candidate.clone(),
                config.fetch.clone(),
            ),
            engine: ScoringEngine::new(config.scoring.clone()),
            constructor: SpreadConstructor::new(constraints.clone(), config.pricing.clone()),
            selector: PortfolioSelector::new(constraints.clone()),
            finalizer: FinalizationStage::new(constraints),
            news,
            config,
            port,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch and classify the macro regime once for the run.
    async fn regime_context(&self) -> RegimeContext {
        match with_timeout(
            self.config.fetch.timeout(),
            "get_macro_indicators",
            self.port.get_macro_indicators(),
        )
        .await
        {
            Ok(snapshot) => self.engine.regime_context(snapshot),
            Err(e) => {
                warn!(reason = e.reason(), error = %e, "Macro indicators unavailable, assuming neutral regime");
                RegimeContext::neutral()
            }
        }
    }

    /// Optional information signals for one symbol; each degrades to `None`.
    async fn info_signals(&self, symbol: &str) -> InfoSignals {
        let timeout = self.config.fetch.timeout();
        let port = self.port.as_ref();
        let (recommendations, insider_activity, news_sentiment) = tokio::join!(
            with_timeout(timeout, "get_recommendations", port.get_recommendations(symbol)),
            with_timeout(timeout, "get_insider_activity", port.get_insider_activity(symbol)),
            with_timeout(timeout, "get_news_sentiment", port.get_news_sentiment(symbol)),
        );
        InfoSignals {
            recommendations: recommendations.ok(),
            insider_activity: insider_activity.ok(),
            news_sentiment: news_sentiment.ok(),
        }
    }

    /// Score every candidate against a shared regime context.
    async fn score_candidates(
        &self,
        candidates: &[Candidate],
        context: &RegimeContext,
    ) -> Vec<StockScores> {
        let signals: HashMap<String, InfoSignals> = stream::iter(candidates)
            .map(|c| async move { (c.symbol.clone(), self.info_signals(&c.symbol).await) })
            .buffer_unordered(self.config.fetch.concurrency.max(1))
            .collect()
            .await;

        candidates
            .iter()
            .map(|c| {
                let s = signals.get(&c.symbol).cloned().unwrap_or_default();
                self.engine.score(c, &s, context)
            })
            .collect()
    }

    /// Run every stage for `as_of`.
    pub async fn run(&self, universe: &[String], as_of: NaiveDate) -> PipelineOutcome {
        let port = self.port.as_ref();
        info!(
            universe = universe.len(),
            as_of = %as_of,
            source = port.name(),
            "Starting selection run"
        );
        let mut funnel = Vec::with_capacity(6);

        let context = self.regime_context().await;
        info!(regime = %context.regime, "Macro regime classified");

        // Candidates
        let candidate_set = self.filter.run(port, universe).await;
        funnel.push(
            StageResult::new(
                PipelineStage::CandidateFilter,
                universe.len(),
                candidate_set.candidates.len(),
            )
            .with_rejections(candidate_set.rejections),
        );
        let candidates = candidate_set.candidates;

        // Scoring and convergence gate
        let scores = self.score_candidates(&candidates, &context).await;
        let passers: Vec<(Candidate, StockScores)> = candidates
            .iter()
            .zip(&scores)
            .filter(|(_, s)| s.pass_gate)
            .map(|(c, s)| (c.clone(), s.clone()))
            .collect();
        let mut gate_rejections = RejectionCounts::default();
        gate_rejections.add("gate_failed", candidates.len() - passers.len());
        funnel.push(
            StageResult::new(PipelineStage::Scoring, candidates.len(), passers.len())
                .with_rejections(gate_rejections),
        );

        // Spreads
        let spread_set = self.constructor.run(&passers, as_of);
        funnel.push(
            StageResult::new(
                PipelineStage::SpreadConstruction,
                passers.len(),
                spread_set.spreads.len(),
            )
            .with_rejections(spread_set.rejections),
        );

        // Basket
        let built = spread_set.spreads.len();
        let selection = self.selector.select(spread_set.spreads);
        funnel.push(
            StageResult::new(
                PipelineStage::PortfolioSelection,
                built,
                selection.spreads.len(),
            )
            .with_rejections(selection.rejections),
        );

        // News
        let shortlisted = selection.spreads.len();
        let reviewed = self.news.run(port, selection.spreads).await;
        let mut news_rejections = RejectionCounts::default();
        news_rejections.add("news_skip", shortlisted - reviewed.len());
        funnel.push(
            StageResult::new(PipelineStage::NewsGate, shortlisted, reviewed.len())
                .with_rejections(news_rejections),
        );

        // Final basket
        let reviewed_count = reviewed.len();
        let recommendation = self.finalizer.finalize(reviewed);
        funnel.push(StageResult::new(
            PipelineStage::Finalization,
            reviewed_count,
            recommendation.trades().len(),
        ));

        info!(
            execute = recommendation.is_execute(),
            trades = recommendation.trades().len(),
            "Selection run complete"
        );

        PipelineOutcome {
            as_of,
            regime: context.regime,
            funnel,
            scores,
            recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_result_rates() {
        let r = StageResult::new(PipelineStage::CandidateFilter, 40, 10);
        assert_eq!(r.eliminated, 30);
        assert!((r.elimination_rate - 75.0).abs() < 1e-9);

        let empty = StageResult::new(PipelineStage::NewsGate, 0, 0);
        assert_eq!(empty.elimination_rate, 0.0);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = PipelineConfig::default();
        config.constraints.nav = -1.0;
        let port: Arc<dyn MarketDataPort> =
            Arc::new(crate::data::SnapshotProvider::new(Default::default()));
        let err = SelectionPipeline::new(config, port).err().unwrap();
        assert!(err.is_config());
    }
}
