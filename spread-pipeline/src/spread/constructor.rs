//! Spread construction.
//!
//! For each gate-passing candidate:
//! 1. Pick the side from trend (bull put when bullish, bear call otherwise)
//! 2. Pick the Friday expiration nearest the middle of the DTE window
//! 3. Place short and long strikes at fixed OTM distances on the strike grid
//! 4. Price both legs and derive credit, max loss, POP and ROI
//! 5. Size to the per-trade loss budget and apply the quality floors

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::{debug, info};

use super::pricing::{self, DAYS_PER_YEAR};
use super::{CreditSpread, OptionLeg, OptionType, Strategy};
use crate::candidate::{Candidate, RejectionCounts, TrendBias};
use crate::config::{PortfolioConstraints, PricingConfig};
use crate::news::NewsAction;
use crate::scoring::StockScores;

// ============================================================================
// Rejections
// ============================================================================

/// Why a candidate produced no spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadRejection {
    NoExpiration,
    PricingFailed,
    NonPositiveCredit,
    ShortPremiumTooLow,
    WideMarket,
    LowPop,
    RoiOutOfRange,
    CreditRatioTooLow,
    ExceedsLossBudget,
}

impl SpreadRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoExpiration => "no_expiration",
            Self::PricingFailed => "pricing_failed",
            Self::NonPositiveCredit => "non_positive_credit",
            Self::ShortPremiumTooLow => "short_premium_too_low",
            Self::WideMarket => "wide_market",
            Self::LowPop => "low_pop",
            Self::RoiOutOfRange => "roi_out_of_range",
            Self::CreditRatioTooLow => "credit_ratio_too_low",
            Self::ExceedsLossBudget => "exceeds_loss_budget",
        }
    }
}

/// Spreads that met every floor, plus counts for the ones that did not.
#[derive(Debug, Clone, Default)]
pub struct SpreadSet {
    pub spreads: Vec<CreditSpread>,
    pub rejections: RejectionCounts,
}

// ============================================================================
// Geometry
// ============================================================================

/// Listed strike spacing at a given price level.
pub fn strike_increment(level: f64) -> f64 {
    if level < 25.0 {
        0.5
    } else if level < 200.0 {
        1.0
    } else {
        5.0
    }
}

fn round_to_grid(level: f64) -> f64 {
    let inc = strike_increment(level);
    (level / inc).round() * inc
}

/// Friday within `[min_dte, max_dte]` days of `as_of` closest to the middle
/// of the window. Earlier Friday wins a tie.
///
/// Only the Fridays either side of the midpoint can win, so the window size
/// does not matter. Dates past the calendar range yield `None`.
pub fn select_expiration(as_of: NaiveDate, min_dte: u32, max_dte: u32) -> Option<NaiveDate> {
    if min_dte > max_dte {
        return None;
    }
    let (min, max) = (i64::from(min_dte), i64::from(max_dte));
    let target = (min + max) / 2;
    let mid = as_of.checked_add_signed(Duration::days(target))?;

    let to_friday = (i64::from(Weekday::Fri.num_days_from_monday())
        - i64::from(mid.weekday().num_days_from_monday()))
    .rem_euclid(7);

    [to_friday - 7, to_friday]
        .into_iter()
        .map(|offset| target + offset)
        .filter(|dte| (min..=max).contains(dte))
        .min_by_key(|dte| ((dte - target).abs(), *dte))
        .and_then(|dte| as_of.checked_add_signed(Duration::days(dte)))
}

/// Short and long strikes for a side, with the long strike pushed one grid
/// step further out if rounding collapsed the width.
fn strikes(strategy: Strategy, spot: f64, pricing: &PricingConfig) -> (f64, f64) {
    match strategy {
        Strategy::BullPut => {
            let short = round_to_grid(spot * (1.0 - pricing.short_otm_pct));
            let mut long = round_to_grid(spot * (1.0 - pricing.long_otm_pct));
            if long >= short {
                long = short - strike_increment(short);
            }
            (short, long)
        }
        Strategy::BearCall => {
            let short = round_to_grid(spot * (1.0 + pricing.short_otm_pct));
            let mut long = round_to_grid(spot * (1.0 + pricing.long_otm_pct));
            if long <= short {
                long = short + strike_increment(short);
            }
            (short, long)
        }
    }
}

// ============================================================================
// Spread Constructor
// ============================================================================

/// Prices and sizes one credit spread per candidate.
pub struct SpreadConstructor {
    constraints: PortfolioConstraints,
    pricing: PricingConfig,
}

impl SpreadConstructor {
    pub fn new(constraints: PortfolioConstraints, pricing: PricingConfig) -> Self {
        Self {
            constraints,
            pricing,
        }
    }

    /// Build spreads for every scored candidate; rejected ones are counted.
    pub fn run(&self, scored: &[(Candidate, StockScores)], as_of: NaiveDate) -> SpreadSet {
        let mut set = SpreadSet::default();
        for (candidate, scores) in scored {
            match self.build(candidate, scores, as_of) {
                Ok(spread) => set.spreads.push(spread),
                Err(rejection) => {
                    debug!(
                        symbol = %candidate.symbol,
                        reason = rejection.as_str(),
                        "Spread rejected"
                    );
                    set.rejections.record(rejection.as_str());
                }
            }
        }
        info!(
            input = scored.len(),
            spreads = set.spreads.len(),
            rejected = set.rejections.total(),
            "Spread construction complete"
        );
        set
    }

    fn price_leg(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        expiration: NaiveDate,
        t: f64,
        iv: f64,
    ) -> Result<OptionLeg, SpreadRejection> {
        let model = pricing::price(
            option_type,
            spot,
            strike,
            t,
            self.pricing.risk_free_rate,
            iv / 100.0,
        )
        .ok_or(SpreadRejection::PricingFailed)?;
        let half = self.pricing.quote_half_spread;
        Ok(OptionLeg {
            option_type,
            strike,
            expiration,
            bid: model.price * (1.0 - half),
            ask: model.price * (1.0 + half),
            delta: model.delta,
            theta: model.theta,
            vega: model.vega,
            iv,
        })
    }

    /// Build a spread for one candidate.
    pub fn build(
        &self,
        candidate: &Candidate,
        scores: &StockScores,
        as_of: NaiveDate,
    ) -> Result<CreditSpread, SpreadRejection> {
        let c = &self.constraints;
        let strategy = match candidate.trend {
            TrendBias::Bullish => Strategy::BullPut,
            TrendBias::Bearish => Strategy::BearCall,
        };
        let option_type = strategy.option_type();

        let expiration = select_expiration(as_of, c.min_dte, c.max_dte)
            .ok_or(SpreadRejection::NoExpiration)?;
        let dte = (expiration - as_of).num_days();
        let t = dte as f64 / DAYS_PER_YEAR;

        let spot = candidate.price;
        let (short_strike, long_strike) = strikes(strategy, spot, &self.pricing);
        if short_strike <= 0.0 || long_strike <= 0.0 {
            return Err(SpreadRejection::PricingFailed);
        }

        let short_leg =
            self.price_leg(option_type, spot, short_strike, expiration, t, candidate.iv)?;
        let long_leg =
            self.price_leg(option_type, spot, long_strike, expiration, t, candidate.iv)?;

        let width = (short_strike - long_strike).abs();
        let credit = short_leg.mid() - long_leg.mid();
        let max_loss = width - credit;
        if credit <= 0.0 || max_loss <= 0.0 {
            return Err(SpreadRejection::NonPositiveCredit);
        }
        if short_leg.mid() < c.min_option_price {
            return Err(SpreadRejection::ShortPremiumTooLow);
        }
        if short_leg.spread_pct() > c.max_spread_pct || long_leg.spread_pct() > c.max_spread_pct {
            return Err(SpreadRejection::WideMarket);
        }

        let breakeven = match strategy {
            Strategy::BullPut => short_strike - credit,
            Strategy::BearCall => short_strike + credit,
        };
        let pop = pricing::prob_beyond(
            option_type,
            spot,
            breakeven,
            t,
            self.pricing.risk_free_rate,
            candidate.iv / 100.0,
        )
        .ok_or(SpreadRejection::PricingFailed)?
        .clamp(0.0, 1.0);
        if pop < c.min_pop {
            return Err(SpreadRejection::LowPop);
        }

        let roi = credit / max_loss;
        if roi < c.min_roi || roi > c.max_roi {
            return Err(SpreadRejection::RoiOutOfRange);
        }

        let contracts = (c.max_loss_per_trade() / (max_loss * 100.0)).floor();
        if contracts < 1.0 {
            return Err(SpreadRejection::ExceedsLossBudget);
        }

        let net_delta = (long_leg.delta - short_leg.delta) * 100.0;
        let net_vega = (long_leg.vega - short_leg.vega) * 100.0;
        let thesis = format!(
            "{} {}: IV/HV {:.2}, score {:.0}",
            strategy,
            candidate.sector,
            candidate.iv_hv_ratio(),
            scores.total
        );

        let spread = CreditSpread {
            symbol: candidate.symbol.clone(),
            strategy,
            short_leg,
            long_leg,
            credit,
            max_loss,
            pop,
            roi,
            model_score: scores.total,
            sector: candidate.sector.clone(),
            thesis,
            news_heat: 0,
            news_action: NewsAction::Trade,
            contracts: contracts as u32,
            net_delta,
            net_vega,
            dte: dte as u32,
        };
        if spread.credit_loss_ratio() < c.min_credit_loss_ratio {
            return Err(SpreadRejection::CreditRatioTooLow);
        }
        Ok(spread)
    }
}
