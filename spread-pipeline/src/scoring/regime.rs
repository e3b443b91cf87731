//! Macro regime fit.
//!
//! The regime is classified once per run from the macro snapshot and then
//! applied to every candidate by sector and beta.
//!
//! Default adjustments from a base of 50 (each regime's row is a
//! [`RegimeTilt`] in [`RegimeConfig`]):
//!
//! | Regime      | Sector                                   | Beta               |
//! |-------------|------------------------------------------|--------------------|
//! | Goldilocks  | growth / cyclical +15, others +5         | > 1.2: +10         |
//! | Overheating | energy, materials, financials +15;       | > 1.2: -5          |
//! |             | technology, real estate, utilities -10   |                    |
//! | Contraction | defensive +20, others -15                | > 1.2: -15, < 0.8: +10 |
//! | Recovery    | financials, industrials, cyclical,       | > 1.0: +5          |
//! |             | materials +15; defensive staples -5      |                    |
//!
//! The adjusted score is then pulled toward 50 by a beta weight
//! (< 0.5: 0.3, < 0.8: 0.6, < 1.2: 1.0, else 1.2), also configurable.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::data::MacroSnapshot;

// ============================================================================
// Market Regime
// ============================================================================

/// Broad macro regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    /// Low volatility, healthy labor market and sentiment
    Goldilocks,
    /// Tight policy into a hot labor market
    Overheating,
    /// Stressed volatility or weak labor and sentiment
    Contraction,
    /// Everything else
    Recovery,
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Goldilocks => "Goldilocks",
            Self::Overheating => "Overheating",
            Self::Contraction => "Contraction",
            Self::Recovery => "Recovery",
        };
        write!(f, "{}", s)
    }
}

/// Classification thresholds and per-regime adjustment tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeConfig {
    #[serde(default = "default_stressed_vix")]
    pub stressed_vix: f64,
    #[serde(default = "default_calm_vix")]
    pub calm_vix: f64,
    #[serde(default = "default_high_unemployment")]
    pub high_unemployment: f64,
    #[serde(default = "default_low_unemployment")]
    pub low_unemployment: f64,
    #[serde(default = "default_weak_confidence")]
    pub weak_confidence: f64,
    #[serde(default = "default_tight_fed_funds")]
    pub tight_fed_funds: f64,

    #[serde(default = "default_goldilocks")]
    pub goldilocks: RegimeTilt,
    #[serde(default = "default_overheating")]
    pub overheating: RegimeTilt,
    #[serde(default = "default_contraction")]
    pub contraction: RegimeTilt,
    #[serde(default = "default_recovery")]
    pub recovery: RegimeTilt,

    /// Ascending beta bands; the first band whose `below` exceeds beta wins
    #[serde(default = "default_beta_weights")]
    pub beta_weights: Vec<BetaBand>,
    /// Weight for betas past the last band
    #[serde(default = "default_beta_weight_ceiling")]
    pub beta_weight_ceiling: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            stressed_vix: default_stressed_vix(),
            calm_vix: default_calm_vix(),
            high_unemployment: default_high_unemployment(),
            low_unemployment: default_low_unemployment(),
            weak_confidence: default_weak_confidence(),
            tight_fed_funds: default_tight_fed_funds(),
            goldilocks: default_goldilocks(),
            overheating: default_overheating(),
            contraction: default_contraction(),
            recovery: default_recovery(),
            beta_weights: default_beta_weights(),
            beta_weight_ceiling: default_beta_weight_ceiling(),
        }
    }
}

impl RegimeConfig {
    pub fn tilt(&self, regime: MarketRegime) -> &RegimeTilt {
        match regime {
            MarketRegime::Goldilocks => &self.goldilocks,
            MarketRegime::Overheating => &self.overheating,
            MarketRegime::Contraction => &self.contraction,
            MarketRegime::Recovery => &self.recovery,
        }
    }

    /// How strongly a stock expresses the regime view.
    pub fn beta_weight(&self, beta: f64) -> f64 {
        self.beta_weights
            .iter()
            .find(|band| beta < band.below)
            .map_or(self.beta_weight_ceiling, |band| band.weight)
    }
}

/// Score adjustments applied to every candidate under one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeTilt {
    #[serde(default)]
    pub favored: Vec<SectorGroup>,
    #[serde(default)]
    pub favored_points: f64,
    #[serde(default)]
    pub disfavored: Vec<SectorGroup>,
    #[serde(default)]
    pub disfavored_points: f64,
    /// Points for sectors in neither list
    #[serde(default)]
    pub other_points: f64,
    /// Applied when beta is strictly above the threshold
    #[serde(default)]
    pub high_beta: Option<BetaTilt>,
    /// Applied when beta is strictly below the threshold
    #[serde(default)]
    pub low_beta: Option<BetaTilt>,
}

impl RegimeTilt {
    fn sector_points(&self, group: SectorGroup) -> f64 {
        if self.favored.contains(&group) {
            self.favored_points
        } else if self.disfavored.contains(&group) {
            self.disfavored_points
        } else {
            self.other_points
        }
    }

    fn beta_points(&self, beta: f64) -> f64 {
        if let Some(t) = self.high_beta.filter(|t| beta > t.threshold) {
            t.points
        } else if let Some(t) = self.low_beta.filter(|t| beta < t.threshold) {
            t.points
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaTilt {
    pub threshold: f64,
    pub points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaBand {
    pub below: f64,
    pub weight: f64,
}

fn default_stressed_vix() -> f64 {
    30.0
}
fn default_calm_vix() -> f64 {
    18.0
}
fn default_high_unemployment() -> f64 {
    5.5
}
fn default_low_unemployment() -> f64 {
    4.2
}
fn default_weak_confidence() -> f64 {
    70.0
}
fn default_tight_fed_funds() -> f64 {
    4.5
}

fn default_goldilocks() -> RegimeTilt {
    use SectorGroup::*;
    RegimeTilt {
        favored: vec![Technology, Communication, ConsumerCyclical, Industrials],
        favored_points: 15.0,
        disfavored: Vec::new(),
        disfavored_points: 0.0,
        other_points: 5.0,
        high_beta: Some(BetaTilt { threshold: 1.2, points: 10.0 }),
        low_beta: None,
    }
}
fn default_overheating() -> RegimeTilt {
    use SectorGroup::*;
    RegimeTilt {
        favored: vec![Energy, Materials, Financials],
        favored_points: 15.0,
        disfavored: vec![Technology, RealEstate, Utilities],
        disfavored_points: -10.0,
        other_points: 0.0,
        high_beta: Some(BetaTilt { threshold: 1.2, points: -5.0 }),
        low_beta: None,
    }
}
fn default_contraction() -> RegimeTilt {
    use SectorGroup::*;
    RegimeTilt {
        favored: vec![Utilities, ConsumerDefensive, Healthcare],
        favored_points: 20.0,
        disfavored: Vec::new(),
        disfavored_points: 0.0,
        other_points: -15.0,
        high_beta: Some(BetaTilt { threshold: 1.2, points: -15.0 }),
        low_beta: Some(BetaTilt { threshold: 0.8, points: 10.0 }),
    }
}
fn default_recovery() -> RegimeTilt {
    use SectorGroup::*;
    RegimeTilt {
        favored: vec![Financials, Industrials, ConsumerCyclical, Materials],
        favored_points: 15.0,
        disfavored: vec![Utilities, ConsumerDefensive],
        disfavored_points: -5.0,
        other_points: 0.0,
        high_beta: Some(BetaTilt { threshold: 1.0, points: 5.0 }),
        low_beta: None,
    }
}
fn default_beta_weights() -> Vec<BetaBand> {
    vec![
        BetaBand { below: 0.5, weight: 0.3 },
        BetaBand { below: 0.8, weight: 0.6 },
        BetaBand { below: 1.2, weight: 1.0 },
    ]
}
fn default_beta_weight_ceiling() -> f64 {
    1.2
}

/// Classify the macro snapshot. Missing indicators never satisfy a rule.
pub fn classify(m: &MacroSnapshot, config: &RegimeConfig) -> MarketRegime {
    let above = |v: Option<f64>, t: f64| v.is_some_and(|v| v >= t);
    let below = |v: Option<f64>, t: f64| v.is_some_and(|v| v < t);

    if above(m.vix, config.stressed_vix)
        || (above(m.unemployment_rate, config.high_unemployment)
            && below(m.consumer_confidence, config.weak_confidence))
    {
        MarketRegime::Contraction
    } else if above(m.fed_funds_rate, config.tight_fed_funds)
        && below(m.unemployment_rate, config.low_unemployment)
    {
        MarketRegime::Overheating
    } else if below(m.vix, config.calm_vix)
        && below(m.unemployment_rate, config.high_unemployment)
        && above(m.consumer_confidence, config.weak_confidence)
    {
        MarketRegime::Goldilocks
    } else {
        MarketRegime::Recovery
    }
}

/// Macro snapshot plus its classification, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeContext {
    pub snapshot: MacroSnapshot,
    pub regime: MarketRegime,
}

impl RegimeContext {
    pub fn new(snapshot: MacroSnapshot, config: &RegimeConfig) -> Self {
        let regime = classify(&snapshot, config);
        Self { snapshot, regime }
    }

    /// Context used when macro data is unavailable.
    pub fn neutral() -> Self {
        Self {
            snapshot: MacroSnapshot::default(),
            regime: MarketRegime::Recovery,
        }
    }
}

// ============================================================================
// Sector Groups
// ============================================================================

/// Sector buckets the regime tables are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorGroup {
    Technology,
    Communication,
    ConsumerCyclical,
    ConsumerDefensive,
    Healthcare,
    Utilities,
    RealEstate,
    Energy,
    Materials,
    Financials,
    Industrials,
    Other,
}

pub fn sector_group(sector: &str) -> SectorGroup {
    match sector.trim().to_lowercase().as_str() {
        "technology" | "information technology" => SectorGroup::Technology,
        "communication services" | "communications" => SectorGroup::Communication,
        "consumer cyclical" | "consumer discretionary" => SectorGroup::ConsumerCyclical,
        "consumer defensive" | "consumer staples" => SectorGroup::ConsumerDefensive,
        "healthcare" | "health care" => SectorGroup::Healthcare,
        "utilities" => SectorGroup::Utilities,
        "real estate" => SectorGroup::RealEstate,
        "energy" => SectorGroup::Energy,
        "basic materials" | "materials" => SectorGroup::Materials,
        "financials" | "financial services" | "financial" => SectorGroup::Financials,
        "industrials" => SectorGroup::Industrials,
        _ => SectorGroup::Other,
    }
}

/// Regime fit score, 0-100.
pub fn score(candidate: &Candidate, context: &RegimeContext, config: &RegimeConfig) -> f64 {
    let beta = candidate
        .fundamentals
        .beta
        .filter(|b| b.is_finite())
        .unwrap_or(1.0);
    let tilt = config.tilt(context.regime);

    let adjusted =
        50.0 + tilt.sector_points(sector_group(&candidate.sector)) + tilt.beta_points(beta);
    (50.0 + (adjusted - 50.0) * config.beta_weight(beta)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::tests::sample_candidate;
    use test_case::test_case;

    fn snapshot(vix: f64, fed: f64, unemp: f64, conf: f64) -> MacroSnapshot {
        MacroSnapshot {
            vix: Some(vix),
            fed_funds_rate: Some(fed),
            unemployment_rate: Some(unemp),
            consumer_confidence: Some(conf),
            ..Default::default()
        }
    }

    #[test_case(35.0, 2.0, 4.0, 90.0, MarketRegime::Contraction ; "stressed vix")]
    #[test_case(20.0, 2.0, 6.0, 60.0, MarketRegime::Contraction ; "weak labor and sentiment")]
    #[test_case(20.0, 5.3, 3.8, 100.0, MarketRegime::Overheating ; "tight policy hot labor")]
    #[test_case(14.0, 3.0, 4.5, 100.0, MarketRegime::Goldilocks ; "calm")]
    #[test_case(22.0, 3.0, 5.0, 90.0, MarketRegime::Recovery ; "in between")]
    fn test_classify(vix: f64, fed: f64, unemp: f64, conf: f64, expected: MarketRegime) {
        assert_eq!(
            classify(&snapshot(vix, fed, unemp, conf), &RegimeConfig::default()),
            expected
        );
    }

    #[test]
    fn test_missing_macro_is_recovery() {
        assert_eq!(
            classify(&MacroSnapshot::default(), &RegimeConfig::default()),
            MarketRegime::Recovery
        );
    }

    #[test]
    fn test_tech_in_goldilocks() {
        let ctx = RegimeContext::new(snapshot(14.0, 3.0, 4.5, 100.0), &RegimeConfig::default());
        let mut c = sample_candidate("AAPL");
        c.fundamentals.beta = Some(1.25);
        // 50 + 15 + 10 = 75, weighted 1.2 -> 80
        assert!((score(&c, &ctx, &RegimeConfig::default()) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_utility_in_contraction_low_beta() {
        let ctx = RegimeContext::new(snapshot(35.0, 2.0, 4.0, 90.0), &RegimeConfig::default());
        let mut c = sample_candidate("DUK");
        c.sector = "Utilities".into();
        c.fundamentals.beta = Some(0.45);
        // 50 + 20 + 10 = 80, weighted 0.3 -> 59
        assert!((score(&c, &ctx, &RegimeConfig::default()) - 59.0).abs() < 1e-9);
    }

    #[test_case(0.3, 0.3 ; "very low beta")]
    #[test_case(0.5, 0.6 ; "band edge is exclusive")]
    #[test_case(1.0, 1.0 ; "market beta")]
    #[test_case(1.2, 1.2 ; "ceiling")]
    fn test_default_beta_weight(beta: f64, expected: f64) {
        assert_eq!(RegimeConfig::default().beta_weight(beta), expected);
    }

    #[test]
    fn test_overridden_tilt_changes_score() {
        let ctx = RegimeContext::new(snapshot(14.0, 3.0, 4.5, 100.0), &RegimeConfig::default());
        let mut config = RegimeConfig::default();
        config.goldilocks.favored_points = 25.0;
        config.goldilocks.high_beta = None;
        let mut c = sample_candidate("AAPL");
        c.fundamentals.beta = Some(1.0);
        // 50 + 25, weight 1.0
        assert!((score(&c, &ctx, &config) - 75.0).abs() < 1e-9);
        assert!((score(&c, &ctx, &RegimeConfig::default()) - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_parses_from_json() {
        let config: RegimeConfig = serde_json::from_str(
            r#"{"recovery": {"favored": ["energy"], "favored_points": 12, "low_beta": {"threshold": 0.9, "points": 3}}}"#,
        )
        .unwrap();
        assert_eq!(config.recovery.favored, vec![SectorGroup::Energy]);
        assert_eq!(config.recovery.other_points, 0.0);
        assert_eq!(config.recovery.high_beta, None);
        assert_eq!(config.goldilocks, RegimeConfig::default().goldilocks);

        let ctx = RegimeContext::neutral();
        let mut c = sample_candidate("XOM");
        c.sector = "Energy".into();
        c.fundamentals.beta = Some(0.85);
        // 50 + 12 + 3 = 65, weighted 1.0
        assert!((score(&c, &ctx, &config) - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_beta_defaults_to_market() {
        let ctx = RegimeContext::neutral();
        let mut c = sample_candidate("JPM");
        c.sector = "Financial Services".into();
        assert!((score(&c, &ctx, &RegimeConfig::default()) - 65.0).abs() < 1e-9);
    }
}
