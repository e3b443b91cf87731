//! Vertical credit spreads.
//!
//! Types for option legs and credit spreads, Black-Scholes leg pricing,
//! and the constructor that turns scored candidates into sized spreads.

mod constructor;
pub mod pricing;

pub use constructor::{select_expiration, strike_increment, SpreadConstructor, SpreadRejection, SpreadSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::news::{NewsAction, NewsReview};

// ============================================================================
// Legs
// ============================================================================

/// Option right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn code(&self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

/// One option contract in a spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    pub option_type: OptionType,
    pub strike: f64,
    pub expiration: NaiveDate,
    pub bid: f64,
    pub ask: f64,
    /// Per share
    pub delta: f64,
    /// Per share per day
    pub theta: f64,
    /// Per share per volatility point
    pub vega: f64,
    /// Implied volatility used to price the leg (annualized %)
    pub iv: f64,
}

impl OptionLeg {
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Bid-ask width as a fraction of mid (infinite when mid is zero).
    pub fn spread_pct(&self) -> f64 {
        let mid = self.mid();
        if mid > 0.0 {
            (self.ask - self.bid) / mid
        } else {
            f64::INFINITY
        }
    }
}

// ============================================================================
// Credit Spread
// ============================================================================

/// Spread structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Sell a put, buy a lower put
    BullPut,
    /// Sell a call, buy a higher call
    BearCall,
}

impl Strategy {
    pub fn option_type(&self) -> OptionType {
        match self {
            Self::BullPut => OptionType::Put,
            Self::BearCall => OptionType::Call,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BullPut => write!(f, "Bull Put"),
            Self::BearCall => write!(f, "Bear Call"),
        }
    }
}

/// A priced, sized vertical credit spread.
///
/// `max_loss = width - credit > 0`, `roi = credit / max_loss`, `0 <= pop <= 1`.
/// Prices are per share; greeks are per contract (x100 multiplier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSpread {
    pub symbol: String,
    pub strategy: Strategy,
    pub short_leg: OptionLeg,
    pub long_leg: OptionLeg,
    pub credit: f64,
    pub max_loss: f64,
    pub pop: f64,
    pub roi: f64,
    /// Composite model score used for ranking (0-400)
    pub model_score: f64,
    pub sector: String,
    /// One-line rationale
    pub thesis: String,
    /// News heat (0-10)
    pub news_heat: u8,
    pub news_action: NewsAction,
    /// Contracts sized to the per-trade loss budget
    pub contracts: u32,
    /// Position delta per contract
    pub net_delta: f64,
    /// Position vega per contract
    pub net_vega: f64,
    /// Days to expiration
    pub dte: u32,
}

impl CreditSpread {
    pub fn width(&self) -> f64 {
        (self.short_leg.strike - self.long_leg.strike).abs()
    }

    pub fn credit_loss_ratio(&self) -> f64 {
        if self.max_loss > 0.0 {
            self.credit / self.max_loss
        } else {
            0.0
        }
    }

    /// Dollar loss if the spread expires fully in the money.
    pub fn capital_at_risk(&self) -> f64 {
        self.max_loss * 100.0 * f64::from(self.contracts)
    }

    pub fn expiration(&self) -> NaiveDate {
        self.short_leg.expiration
    }

    /// Compact leg description, e.g. `-90P/+85P 2024-04-19`.
    pub fn legs_label(&self) -> String {
        let code = self.short_leg.option_type.code();
        format!(
            "-{}{}/+{}{} {}",
            format_strike(self.short_leg.strike),
            code,
            format_strike(self.long_leg.strike),
            code,
            self.expiration()
        )
    }

    /// Attach a news review, consuming the spread.
    pub fn with_review(mut self, review: NewsReview) -> Self {
        self.news_heat = review.heat;
        self.news_action = review.action;
        self.thesis = format!("{}; {}", self.thesis, review.note());
        self
    }
}

fn format_strike(strike: f64) -> String {
    if (strike - strike.round()).abs() < 1e-9 {
        format!("{:.0}", strike)
    } else {
        format!("{:.1}", strike)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn leg(option_type: OptionType, strike: f64, mid: f64, delta: f64, vega: f64) -> OptionLeg {
        OptionLeg {
            option_type,
            strike,
            expiration: NaiveDate::from_ymd_opt(2024, 4, 19).unwrap(),
            bid: mid * 0.95,
            ask: mid * 1.05,
            delta,
            theta: -0.02,
            vega,
            iv: 30.0,
        }
    }

    /// Bull put spread with plausible numbers for stage tests.
    pub(crate) fn sample_spread(symbol: &str, sector: &str, model_score: f64) -> CreditSpread {
        let short_leg = leg(OptionType::Put, 90.0, 0.60, -0.12, 0.064);
        let long_leg = leg(OptionType::Put, 85.0, 0.15, -0.04, 0.027);
        CreditSpread {
            symbol: symbol.to_string(),
            strategy: Strategy::BullPut,
            short_leg,
            long_leg,
            credit: 0.45,
            max_loss: 4.55,
            pop: 0.87,
            roi: 0.45 / 4.55,
            model_score,
            sector: sector.to_string(),
            thesis: "Bull Put".to_string(),
            news_heat: 5,
            news_action: NewsAction::Trade,
            contracts: 4,
            net_delta: 8.0,
            net_vega: -3.7,
            dte: 35,
        }
    }

    #[test]
    fn test_legs_label() {
        let s = sample_spread("AAPL", "Technology", 250.0);
        assert_eq!(s.legs_label(), "-90P/+85P 2024-04-19");
        assert_eq!(s.width(), 5.0);
    }

    #[test]
    fn test_half_strike_label() {
        let mut s = sample_spread("F", "Consumer Cyclical", 200.0);
        s.short_leg.strike = 12.5;
        s.long_leg.strike = 12.0;
        assert_eq!(s.legs_label(), "-12.5P/+12P 2024-04-19");
    }

    #[test]
    fn test_capital_at_risk() {
        let s = sample_spread("AAPL", "Technology", 250.0);
        assert!((s.capital_at_risk() - 1820.0).abs() < 1e-9);
    }

    #[test]
    fn test_leg_spread_pct() {
        let l = leg(OptionType::Call, 110.0, 1.0, 0.2, 0.1);
        assert!((l.spread_pct() - 0.10).abs() < 1e-9);
    }
}
