//! Fundamental quality score.
//!
//! Additive checklist over profitability, leverage, liquidity, margins,
//! growth and valuation. Missing metrics earn nothing.

use serde::{Deserialize, Serialize};

use crate::data::Fundamentals;

/// Thresholds for the quality checklist. Percent units throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_strong_roa")]
    pub strong_roa: f64,
    #[serde(default = "default_max_debt_to_equity")]
    pub max_debt_to_equity: f64,
    #[serde(default = "default_low_debt_to_equity")]
    pub low_debt_to_equity: f64,
    #[serde(default = "default_min_current_ratio")]
    pub min_current_ratio: f64,
    #[serde(default = "default_strong_current_ratio")]
    pub strong_current_ratio: f64,
    #[serde(default = "default_min_gross_margin")]
    pub min_gross_margin: f64,
    #[serde(default = "default_min_operating_margin")]
    pub min_operating_margin: f64,
    #[serde(default = "default_growth")]
    pub growth: f64,
    #[serde(default = "default_strong_growth")]
    pub strong_growth: f64,
    /// P/E below this earns full valuation points
    #[serde(default = "default_cheap_pe")]
    pub cheap_pe: f64,
    /// P/E below this earns partial valuation points
    #[serde(default = "default_fair_pe")]
    pub fair_pe: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            strong_roa: default_strong_roa(),
            max_debt_to_equity: default_max_debt_to_equity(),
            low_debt_to_equity: default_low_debt_to_equity(),
            min_current_ratio: default_min_current_ratio(),
            strong_current_ratio: default_strong_current_ratio(),
            min_gross_margin: default_min_gross_margin(),
            min_operating_margin: default_min_operating_margin(),
            growth: default_growth(),
            strong_growth: default_strong_growth(),
            cheap_pe: default_cheap_pe(),
            fair_pe: default_fair_pe(),
        }
    }
}

fn default_strong_roa() -> f64 {
    10.0
}
fn default_max_debt_to_equity() -> f64 {
    100.0
}
fn default_low_debt_to_equity() -> f64 {
    50.0
}
fn default_min_current_ratio() -> f64 {
    1.0
}
fn default_strong_current_ratio() -> f64 {
    2.0
}
fn default_min_gross_margin() -> f64 {
    30.0
}
fn default_min_operating_margin() -> f64 {
    15.0
}
fn default_growth() -> f64 {
    10.0
}
fn default_strong_growth() -> f64 {
    20.0
}
fn default_cheap_pe() -> f64 {
    25.0
}
fn default_fair_pe() -> f64 {
    40.0
}

/// Points when `value` is present and `pred` holds.
fn points(value: Option<f64>, pred: impl Fn(f64) -> bool, pts: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && pred(v) => pts,
        _ => 0.0,
    }
}

/// Quality score, 0-100.
pub fn score(f: &Fundamentals, config: &QualityConfig) -> f64 {
    let mut total = 0.0;

    // Profitability
    total += points(f.net_income, |v| v > 0.0, 10.0);
    total += points(f.operating_cash_flow, |v| v > 0.0, 10.0);
    total += points(f.roa, |v| v > 0.0, 5.0);
    total += points(f.roa, |v| v > config.strong_roa, 5.0);

    // Balance sheet
    total += points(f.debt_to_equity, |v| v < config.max_debt_to_equity, 5.0);
    total += points(f.debt_to_equity, |v| v < config.low_debt_to_equity, 5.0);
    total += points(f.current_ratio, |v| v > config.min_current_ratio, 5.0);
    total += points(f.current_ratio, |v| v > config.strong_current_ratio, 5.0);

    // Margins
    total += points(f.gross_margin, |v| v > config.min_gross_margin, 10.0);
    total += points(f.operating_margin, |v| v > config.min_operating_margin, 10.0);

    // Growth
    total += points(f.revenue_growth, |v| v > config.growth, 5.0);
    total += points(f.revenue_growth, |v| v > config.strong_growth, 5.0);

    // Valuation
    total += match f.pe_ratio {
        Some(pe) if pe > 0.0 && pe < config.cheap_pe => 10.0,
        Some(pe) if pe > 0.0 && pe < config.fair_pe => 5.0,
        _ => 0.0,
    };

    total.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong() -> Fundamentals {
        Fundamentals {
            net_income: Some(9.0e10),
            operating_cash_flow: Some(1.1e11),
            roa: Some(25.0),
            debt_to_equity: Some(40.0),
            current_ratio: Some(2.5),
            gross_margin: Some(44.0),
            operating_margin: Some(30.0),
            revenue_growth: Some(22.0),
            pe_ratio: Some(18.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_fundamentals_score_zero() {
        assert_eq!(score(&Fundamentals::default(), &QualityConfig::default()), 0.0);
    }

    #[test]
    fn test_strong_company_scores_full_checklist() {
        assert_eq!(score(&strong(), &QualityConfig::default()), 90.0);
    }

    #[test]
    fn test_expensive_and_leveraged() {
        let f = Fundamentals {
            debt_to_equity: Some(180.0),
            pe_ratio: Some(35.0),
            ..strong()
        };
        // 90 - 10 (leverage) - 5 (pe tier)
        assert_eq!(score(&f, &QualityConfig::default()), 75.0);
    }

    #[test]
    fn test_negative_pe_earns_nothing() {
        let f = Fundamentals {
            pe_ratio: Some(-12.0),
            ..Default::default()
        };
        assert_eq!(score(&f, &QualityConfig::default()), 0.0);
    }
}
