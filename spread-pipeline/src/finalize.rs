//! Finalization.
//!
//! Keeps tradeable spreads up to the final basket size. When too few remain
//! the run abstains rather than recommending a thin basket.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PortfolioConstraints;
use crate::news::NewsAction;
use crate::portfolio::BasketExposure;
use crate::spread::CreditSpread;

/// The final basket with its aggregate risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalBasket {
    pub trades: Vec<CreditSpread>,
    /// Sum of per-contract position deltas
    pub net_delta: f64,
    /// Sum of per-contract position vegas
    pub net_vega: f64,
    /// Loss budget per trade (NAV x max loss %)
    pub max_loss_per_trade: f64,
    /// Sum of sized dollar max losses
    pub capital_at_risk: f64,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Recommendation {
    Execute(FinalBasket),
    Abstain { message: String },
}

impl Recommendation {
    pub fn is_execute(&self) -> bool {
        matches!(self, Self::Execute(_))
    }

    pub fn trades(&self) -> &[CreditSpread] {
        match self {
            Self::Execute(basket) => &basket.trades,
            Self::Abstain { .. } => &[],
        }
    }
}

/// Message used when the basket cannot be filled.
pub fn abstain_message(final_trades: usize) -> String {
    format!("fewer than {} trades meet criteria, do not execute", final_trades)
}

/// Last stage: `Trade` spreads only, truncated to the final basket size.
pub struct FinalizationStage {
    constraints: PortfolioConstraints,
}

impl FinalizationStage {
    pub fn new(constraints: PortfolioConstraints) -> Self {
        Self { constraints }
    }

    pub fn finalize(&self, spreads: Vec<CreditSpread>) -> Recommendation {
        let wanted = self.constraints.final_trades;
        let mut trades: Vec<CreditSpread> = spreads
            .into_iter()
            .filter(|s| s.news_action == NewsAction::Trade)
            .collect();

        if trades.len() < wanted {
            warn!(available = trades.len(), wanted, "Not enough trades, abstaining");
            return Recommendation::Abstain {
                message: abstain_message(wanted),
            };
        }
        trades.truncate(wanted);

        let exposure = BasketExposure::of(&trades);
        let capital_at_risk = trades.iter().map(CreditSpread::capital_at_risk).sum();
        let basket = FinalBasket {
            net_delta: exposure.net_delta,
            net_vega: exposure.net_vega,
            max_loss_per_trade: self.constraints.max_loss_per_trade(),
            capital_at_risk,
            trades,
        };
        info!(
            trades = basket.trades.len(),
            capital_at_risk = basket.capital_at_risk,
            "Basket finalized"
        );
        Recommendation::Execute(basket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spread::tests::sample_spread;

    fn stage() -> FinalizationStage {
        FinalizationStage::new(PortfolioConstraints::default())
    }

    #[test]
    fn test_abstains_when_short() {
        let spreads = vec![
            sample_spread("A", "Energy", 300.0),
            sample_spread("B", "Utilities", 290.0),
            sample_spread("C", "Technology", 280.0),
        ];
        match stage().finalize(spreads) {
            Recommendation::Abstain { message } => {
                assert_eq!(message, "fewer than 5 trades meet criteria, do not execute")
            }
            other => panic!("expected abstain, got {:?}", other),
        }
    }

    #[test]
    fn test_waiting_spreads_do_not_count() {
        let spreads: Vec<CreditSpread> = (0..6)
            .map(|i| {
                let mut s = sample_spread(&format!("S{i}"), "Energy", 300.0);
                if i < 2 {
                    s.news_action = NewsAction::Wait;
                }
                s
            })
            .collect();
        assert!(!stage().finalize(spreads).is_execute());
    }

    #[test]
    fn test_execute_truncates_and_aggregates() {
        let spreads: Vec<CreditSpread> = (0..7)
            .map(|i| sample_spread(&format!("S{i}"), "Energy", 300.0 - i as f64))
            .collect();
        match stage().finalize(spreads) {
            Recommendation::Execute(basket) => {
                assert_eq!(basket.trades.len(), 5);
                assert_eq!(basket.trades[0].symbol, "S0");
                assert!((basket.net_delta - 40.0).abs() < 1e-9);
                assert!((basket.net_vega + 18.5).abs() < 1e-9);
                assert!((basket.max_loss_per_trade - 2000.0).abs() < 1e-9);
                assert!((basket.capital_at_risk - 5.0 * 1820.0).abs() < 1e-6);
            }
            other => panic!("expected execute, got {:?}", other),
        }
    }
}
