//! Property-based tests for scoring, spread construction and basket selection.
//!
//! Invariants checked:
//! 1. Sub-scores are clamped to [0, 100] and the gate counts scores above 50
//! 2. Built spreads satisfy max_loss = width - credit > 0 and 0 <= pop <= 1
//! 3. Built spreads never exceed the per-trade loss budget
//! 4. Selection never breaks the sector, delta, vega or size limits

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use spread_pipeline::candidate::IvSource;
use spread_pipeline::config::PricingConfig;
use spread_pipeline::data::Fundamentals;
use spread_pipeline::{
    Candidate, CreditSpread, PortfolioConstraints, PortfolioSelector, SpreadConstructor,
    StockScores, TrendBias,
};

// ============================================================================
// Helpers
// ============================================================================

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn candidate(price: f64, iv: f64, trend: TrendBias) -> Candidate {
    Candidate {
        symbol: "PROP".to_string(),
        price,
        hv: iv / 1.3,
        iv,
        iv_source: IvSource::HvMultiplier,
        iv_rank: 50.0,
        iv_percentile: 50.0,
        sector: "Technology".to_string(),
        liquidity_score: 80.0,
        avg_volume: 8_000_000.0,
        sma_50: Some(price),
        trend,
        fundamentals: Fundamentals::default(),
    }
}

fn constructor() -> SpreadConstructor {
    SpreadConstructor::new(PortfolioConstraints::default(), PricingConfig::default())
}

fn base_spread() -> CreditSpread {
    let scores = StockScores::new("PROP", 60.0, 90.0, 65.0, 50.0);
    constructor()
        .build(&candidate(100.0, 32.5, TrendBias::Bullish), &scores, as_of())
        .unwrap()
}

fn check_well_formed(
    spread: &CreditSpread,
    constraints: &PortfolioConstraints,
) -> Result<(), TestCaseError> {
    prop_assert!(spread.max_loss > 0.0);
    prop_assert!(spread.credit > 0.0);
    prop_assert!((spread.max_loss - (spread.width() - spread.credit)).abs() < 1e-9);
    prop_assert!((0.0..=1.0).contains(&spread.pop));
    prop_assert!(spread.pop >= constraints.min_pop);
    prop_assert!(spread.roi >= constraints.min_roi && spread.roi <= constraints.max_roi);
    prop_assert!(spread.credit_loss_ratio() >= constraints.min_credit_loss_ratio);
    prop_assert!(spread.contracts >= 1);
    prop_assert!(spread.capital_at_risk() <= constraints.max_loss_per_trade() + 1e-9);
    prop_assert!(spread.dte >= constraints.min_dte && spread.dte <= constraints.max_dte);
    Ok(())
}

const SECTORS: [&str; 4] = ["Technology", "Energy", "Healthcare", "Financials"];

fn spread_strategy() -> impl Strategy<Value = (usize, f64, f64, f64)> {
    (0..SECTORS.len(), 0.0..400.0f64, -40.0..40.0f64, -30.0..0.0f64)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_scores_clamped_and_gate_consistent(
        v in -50.0..150.0f64,
        q in -50.0..150.0f64,
        r in -50.0..150.0f64,
        i in -50.0..150.0f64,
    ) {
        let s = StockScores::new("X", v, q, r, i);
        let subs = [s.vol_edge, s.quality, s.regime, s.info_edge];
        for sub in subs {
            prop_assert!((0.0..=100.0).contains(&sub));
        }
        prop_assert!((s.total - subs.iter().sum::<f64>()).abs() < 1e-9);
        let above = subs.iter().filter(|x| **x > 50.0).count();
        prop_assert_eq!(s.pass_gate, above >= 3);
    }

    #[test]
    fn prop_built_spreads_are_well_formed(
        price in 20.0..500.0f64,
        iv in 15.0..120.0f64,
        bullish in any::<bool>(),
    ) {
        let trend = if bullish { TrendBias::Bullish } else { TrendBias::Bearish };
        let scores = StockScores::new("PROP", 60.0, 60.0, 60.0, 60.0);

        // Rejection is a valid outcome; coverage of the accepted path comes
        // from test_reference_grid_builds_well_formed_spreads below.
        if let Ok(spread) = constructor().build(&candidate(price, iv, trend), &scores, as_of()) {
            check_well_formed(&spread, &PortfolioConstraints::default())?;
        }
    }

    #[test]
    fn prop_selection_respects_limits(
        specs in prop::collection::vec(spread_strategy(), 0..30),
    ) {
        let base = base_spread();
        let spreads: Vec<CreditSpread> = specs
            .iter()
            .enumerate()
            .map(|(n, (sector, score, delta, vega))| {
                let mut s = base.clone();
                s.symbol = format!("S{n:02}");
                s.sector = SECTORS[*sector].to_string();
                s.model_score = *score;
                s.net_delta = *delta;
                s.net_vega = *vega;
                s
            })
            .collect();

        let constraints = PortfolioConstraints::default();
        let selection = PortfolioSelector::new(constraints.clone()).select(spreads);

        prop_assert!(selection.spreads.len() <= constraints.top_trades);

        let mut per_sector: HashMap<&str, usize> = HashMap::new();
        for s in &selection.spreads {
            *per_sector.entry(s.sector.as_str()).or_insert(0) += 1;
        }
        prop_assert!(per_sector.values().all(|n| *n <= constraints.max_sector_trades));

        let delta: f64 = selection.spreads.iter().map(|s| s.net_delta).sum();
        let vega: f64 = selection.spreads.iter().map(|s| s.net_vega).sum();
        prop_assert!(delta.abs() <= constraints.max_basket_delta + 1e-9);
        prop_assert!(vega >= constraints.max_basket_vega - 1e-9);

        let scores: Vec<f64> = selection.spreads.iter().map(|s| s.model_score).collect();
        prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}

// ============================================================================
// Deterministic coverage
// ============================================================================

#[test]
fn test_reference_grid_builds_well_formed_spreads() {
    let constraints = PortfolioConstraints::default();
    let scores = StockScores::new("PROP", 60.0, 60.0, 60.0, 60.0);
    let mut built = 0;

    for price in [50.0, 75.0, 100.0, 150.0] {
        for iv in [25.0, 32.5, 45.0] {
            for trend in [TrendBias::Bullish, TrendBias::Bearish] {
                let c = candidate(price, iv, trend);
                if let Ok(spread) = constructor().build(&c, &scores, as_of()) {
                    check_well_formed(&spread, &constraints).unwrap();
                    built += 1;
                }
            }
        }
    }

    assert!(built >= 1, "no grid candidate produced a spread");
    // The reference candidate behind base_spread() must always build
    let reference = base_spread();
    check_well_formed(&reference, &constraints).unwrap();
    assert_eq!(reference.symbol, "PROP");
}
