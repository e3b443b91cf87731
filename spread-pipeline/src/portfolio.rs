//! Portfolio selection.
//!
//! Greedy, constraint-checked basket construction: walk spreads best-first
//! and accept each one that keeps the basket within sector, delta and vega
//! limits. Not an optimal packing; a better-scoring combination can exist
//! when an early pick blocks two later ones.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::candidate::RejectionCounts;
use crate::config::PortfolioConstraints;
use crate::spread::CreditSpread;

/// Running basket greeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketExposure {
    pub net_delta: f64,
    pub net_vega: f64,
}

impl BasketExposure {
    pub fn of(spreads: &[CreditSpread]) -> Self {
        spreads.iter().fold(Self::default(), |acc, s| Self {
            net_delta: acc.net_delta + s.net_delta,
            net_vega: acc.net_vega + s.net_vega,
        })
    }
}

/// Selected spreads plus counts of why the others were passed over.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub spreads: Vec<CreditSpread>,
    pub exposure: BasketExposure,
    pub rejections: RejectionCounts,
}

/// Best-first order: model score, then ROI, then symbol.
pub fn rank(spreads: &mut [CreditSpread]) {
    spreads.sort_by(|a, b| {
        b.model_score
            .total_cmp(&a.model_score)
            .then_with(|| b.roi.total_cmp(&a.roi))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}

/// Builds the shortlist under portfolio constraints.
pub struct PortfolioSelector {
    constraints: PortfolioConstraints,
}

impl PortfolioSelector {
    pub fn new(constraints: PortfolioConstraints) -> Self {
        Self { constraints }
    }

    pub fn select(&self, mut spreads: Vec<CreditSpread>) -> Selection {
        let c = &self.constraints;
        rank(&mut spreads);

        let mut selection = Selection::default();
        let mut per_sector: HashMap<String, usize> = HashMap::new();

        for spread in spreads {
            if selection.spreads.len() >= c.top_trades {
                selection.rejections.record("basket_full");
                continue;
            }

            let sector_count = per_sector.get(&spread.sector).copied().unwrap_or(0);
            if sector_count >= c.max_sector_trades {
                debug!(symbol = %spread.symbol, sector = %spread.sector, "Sector limit reached");
                selection.rejections.record("sector_limit");
                continue;
            }

            let delta = selection.exposure.net_delta + spread.net_delta;
            if delta.abs() > c.max_basket_delta {
                debug!(symbol = %spread.symbol, delta, "Basket delta limit");
                selection.rejections.record("delta_limit");
                continue;
            }

            let vega = selection.exposure.net_vega + spread.net_vega;
            if vega < c.max_basket_vega {
                debug!(symbol = %spread.symbol, vega, "Basket vega limit");
                selection.rejections.record("vega_limit");
                continue;
            }

            selection.exposure = BasketExposure {
                net_delta: delta,
                net_vega: vega,
            };
            *per_sector.entry(spread.sector.clone()).or_insert(0) += 1;
            selection.spreads.push(spread);
        }

        info!(
            selected = selection.spreads.len(),
            net_delta = selection.exposure.net_delta,
            net_vega = selection.exposure.net_vega,
            "Portfolio selection complete"
        );
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spread::tests::sample_spread;

    fn selector() -> PortfolioSelector {
        PortfolioSelector::new(PortfolioConstraints::default())
    }

    #[test]
    fn test_rank_order_and_tie_breaks() {
        let mut a = sample_spread("BBB", "Energy", 300.0);
        a.roi = 0.10;
        let mut b = sample_spread("AAA", "Energy", 300.0);
        b.roi = 0.10;
        let mut c = sample_spread("CCC", "Energy", 300.0);
        c.roi = 0.20;
        let d = sample_spread("DDD", "Energy", 320.0);
        let mut list = vec![a, b, c, d];
        rank(&mut list);
        let order: Vec<&str> = list.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["DDD", "CCC", "AAA", "BBB"]);
    }

    #[test]
    fn test_sector_cap() {
        let spreads: Vec<CreditSpread> = (0..25)
            .map(|i| sample_spread(&format!("T{i:02}"), "Technology", 300.0 - i as f64))
            .collect();
        let selection = selector().select(spreads);
        assert_eq!(selection.spreads.len(), 2);
        assert_eq!(selection.spreads[0].symbol, "T00");
        assert_eq!(selection.rejections.get("sector_limit"), 23);
    }

    #[test]
    fn test_top_trades_cap() {
        let sectors = [
            "Technology", "Energy", "Healthcare", "Utilities", "Financials", "Industrials",
        ];
        let spreads: Vec<CreditSpread> = (0..12)
            .map(|i| sample_spread(&format!("S{i:02}"), sectors[i % sectors.len()], 300.0))
            .collect();
        let selection = selector().select(spreads);
        assert_eq!(selection.spreads.len(), 9);
        assert_eq!(selection.rejections.get("basket_full"), 3);
    }

    #[test]
    fn test_delta_limit() {
        let mut big = sample_spread("BIG", "Energy", 400.0);
        big.net_delta = 95.0;
        let small = sample_spread("SMALL", "Utilities", 300.0);
        let mut short = sample_spread("SHORT", "Healthcare", 200.0);
        short.net_delta = -20.0;

        let selection = selector().select(vec![big, small, short]);
        let symbols: Vec<&str> = selection.spreads.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BIG", "SHORT"]);
        assert_eq!(selection.rejections.get("delta_limit"), 1);
        assert!((selection.exposure.net_delta - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_vega_floor() {
        let mut heavy = sample_spread("HEAVY", "Energy", 400.0);
        heavy.net_vega = -48.0;
        let light = sample_spread("LIGHT", "Utilities", 300.0);
        let selection = selector().select(vec![heavy, light]);
        assert_eq!(selection.spreads.len(), 1);
        assert_eq!(selection.rejections.get("vega_limit"), 1);
    }
}
