//! Spread Pipeline Library
//!
//! Turns a stock universe into a small, risk-bounded basket of vertical
//! credit spreads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        SelectionPipeline                            │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  CandidateFilter -> ScoringEngine -> SpreadConstructor              │
//! │        -> PortfolioSelector -> NewsGate -> FinalizationStage        │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                     MarketDataPort (async)                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Convergence gate
//! - Four independent 0-100 sub-scores: vol edge, quality, regime, info edge
//! - A candidate proceeds only when at least three exceed 50
//!
//! ## Risk bounds
//! - Per-trade loss capped at a fraction of NAV
//! - Basket limits on sector concentration, net delta and net vega
//! - Too few qualifying trades means abstaining, not a thinner basket

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod candidate;
pub mod config;
pub mod data;
pub mod finalize;
pub mod news;
pub mod pipeline;
pub mod portfolio;
pub mod report;
pub mod scoring;
pub mod spread;

pub use candidate::{Candidate, CandidateFilter, TrendBias};
pub use config::{PipelineConfig, PortfolioConstraints};
pub use data::{DataUnavailable, MarketDataPort, SnapshotProvider};
pub use finalize::{FinalBasket, FinalizationStage, Recommendation};
pub use news::{NewsAction, NewsGate, NewsReview};
pub use pipeline::{PipelineOutcome, PipelineStage, SelectionPipeline, StageResult};
pub use portfolio::PortfolioSelector;
pub use report::ReportFormat;
pub use scoring::{ScoringEngine, StockScores};
pub use spread::{CreditSpread, OptionLeg, OptionType, SpreadConstructor, Strategy};
