//! Pipeline configuration.
//!
//! Every numeric threshold the stages use lives here (or in
//! [`crate::scoring::ScoringConfig`]). The configuration is loaded once,
//! validated, and then passed down by reference for the whole run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spread_common::config::env_override;
use spread_common::validation::{Validate, ValidationError, ValidationReport, ValidationResult};
use spread_common::ObservabilityConfig;
use std::path::{Path, PathBuf};

use crate::scoring::ScoringConfig;

/// Upper bound on `constraints.max_dte`.
pub const MAX_DTE: u32 = 730;

/// Upper bound on `news.lookback_days`.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

// ============================================================================
// Main Pipeline Configuration
// ============================================================================

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Symbols to screen
    #[serde(default)]
    pub universe: UniverseConfig,

    /// Market data source settings
    #[serde(default)]
    pub data: DataSourceConfig,

    /// Fetch timeouts and fan-out limits
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Volatility and liquidity estimation for candidates
    #[serde(default)]
    pub candidate: CandidateFilterConfig,

    /// Portfolio-level risk constraints
    #[serde(default)]
    pub constraints: PortfolioConstraints,

    /// Sub-score thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Spread geometry and leg pricing
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Headline red-flag policy
    #[serde(default)]
    pub news: NewsGateConfig,

    /// Output rendering
    #[serde(default)]
    pub report: ReportConfig,

    /// Run date; defaults to the snapshot date, then today
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl PipelineConfig {
    /// Load from the default location (`SPREAD_CONFIG` or `~/.spread-pipeline/config.json`),
    /// then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&spread_common::config_path())
    }

    /// Load from a specific path, then apply environment overrides.
    ///
    /// An unparseable `SPREAD_*` value fails the load.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config: Self = spread_common::load_json_config(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `SPREAD_*` environment overrides, reporting every malformed value.
    pub fn apply_env_overrides(&mut self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        report.check(self.constraints.apply_env_overrides());
        report.check(env_override("SPREAD_LOG_LEVEL", &mut self.observability.log_level));
        report.check(env_override("SPREAD_LOG_FORMAT", &mut self.observability.log_format));
        report.check(env_override("SPREAD_FETCH_TIMEOUT_MS", &mut self.fetch.timeout_ms));
        report.check(env_override("SPREAD_FETCH_CONCURRENCY", &mut self.fetch.concurrency));
        report.check(env_override("SPREAD_IV_MULTIPLIER", &mut self.candidate.iv_multiplier));
        report.check(env_override("SPREAD_RISK_FREE_RATE", &mut self.pricing.risk_free_rate));

        let mut as_of = self.as_of.unwrap_or(NaiveDate::MIN);
        if report.check(env_override("SPREAD_AS_OF", &mut as_of)) == Some(true) {
            self.as_of = Some(as_of);
        }

        let mut snapshot = self.data.snapshot_path.clone().unwrap_or_default();
        if report.check(env_override("SPREAD_SNAPSHOT_PATH", &mut snapshot)) == Some(true) {
            self.data.snapshot_path = Some(snapshot);
        }
        report.finish()
    }

    /// Resolve the universe: configured symbols plus the optional universe file.
    ///
    /// The file holds one symbol per line; blank lines and `#` comments are skipped.
    /// Duplicates are removed while keeping first-seen order.
    pub fn resolve_universe(&self) -> anyhow::Result<Vec<String>> {
        use anyhow::Context;

        let mut symbols: Vec<String> = self
            .universe
            .symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(file) = &self.universe.file {
            let path = spread_common::expand_path(file);
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read universe file {}", path.display()))?;
            symbols.extend(
                content
                    .lines()
                    .map(|l| l.split('#').next().unwrap_or("").trim().to_uppercase())
                    .filter(|l| !l.is_empty()),
            );
        }

        let mut seen = std::collections::HashSet::new();
        symbols.retain(|s| seen.insert(s.clone()));
        Ok(symbols)
    }

    /// Snapshot path with `~` expanded.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data
            .snapshot_path
            .as_deref()
            .map(spread_common::expand_path)
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        report.check(self.observability.validate());
        report.check(self.constraints.validate());
        report.check(self.fetch.validate());
        report.check(self.candidate.validate());
        report.check(self.pricing.validate());
        report.check(self.scoring.validate());
        report.require(
            !self.news.red_flag_keywords.iter().any(|k| k.trim().is_empty()),
            "news.red_flag_keywords",
            "keywords must not be blank",
        );
        report.require(
            self.news.neutral_heat <= 10 && self.news.red_flag_heat <= 10,
            "news.red_flag_heat",
            "heat is on a 0-10 scale",
        );
        if self.news.neutral_heat >= self.news.skip_heat {
            report.push(ValidationError::Conflict {
                reason: format!(
                    "news.neutral_heat ({}) must be below news.skip_heat ({})",
                    self.news.neutral_heat, self.news.skip_heat
                ),
            });
        }
        report.require(
            (1..=MAX_LOOKBACK_DAYS).contains(&self.news.lookback_days),
            "news.lookback_days",
            "must be between 1 and 365",
        );
        report.require(
            self.news.max_headlines > 0,
            "news.max_headlines",
            "must be greater than 0",
        );
        report.require(
            ["text", "json"].contains(&self.report.format.to_lowercase().as_str()),
            "report.format",
            "must be one of: text, json",
        );
        report.finish()
    }
}

// ============================================================================
// Portfolio Constraints
// ============================================================================

/// Risk constraints applied by every stage.
///
/// Read-only for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConstraints {
    /// Net asset value of the account
    #[serde(default = "default_nav")]
    pub nav: f64,

    /// Maximum loss per trade as a fraction of NAV
    #[serde(default = "default_max_loss_pct")]
    pub max_loss_pct: f64,

    /// Minimum probability of profit (0-1)
    #[serde(default = "default_min_pop")]
    pub min_pop: f64,

    /// Minimum credit / max loss
    #[serde(default = "default_min_credit_loss_ratio")]
    pub min_credit_loss_ratio: f64,

    /// Minimum return on risk
    #[serde(default = "default_min_roi")]
    pub min_roi: f64,

    /// Maximum return on risk (rich credits usually mean mispriced legs)
    #[serde(default = "default_max_roi")]
    pub max_roi: f64,

    /// Maximum accepted spreads per sector
    #[serde(default = "default_max_sector_trades")]
    pub max_sector_trades: usize,

    /// Basket net delta bound (absolute, per-contract share equivalents)
    #[serde(default = "default_max_basket_delta")]
    pub max_basket_delta: f64,

    /// Basket net vega floor (negative)
    #[serde(default = "default_max_basket_vega")]
    pub max_basket_vega: f64,

    /// Minimum underlying price
    #[serde(default = "default_min_stock_price")]
    pub min_stock_price: f64,

    /// Maximum underlying price
    #[serde(default = "default_max_stock_price")]
    pub max_stock_price: f64,

    /// Maximum leg bid-ask spread as a fraction of mid
    #[serde(default = "default_max_spread_pct")]
    pub max_spread_pct: f64,

    /// Minimum short-leg premium
    #[serde(default = "default_min_option_price")]
    pub min_option_price: f64,

    /// Minimum days to expiration
    #[serde(default = "default_min_dte")]
    pub min_dte: u32,

    /// Maximum days to expiration
    #[serde(default = "default_max_dte")]
    pub max_dte: u32,

    /// Minimum implied volatility (annualized %)
    #[serde(default = "default_min_iv")]
    pub min_iv: f64,

    /// Maximum implied volatility (annualized %)
    #[serde(default = "default_max_iv")]
    pub max_iv: f64,

    /// Candidates kept after the liquidity sort
    #[serde(default = "default_top_candidates")]
    pub top_candidates: usize,

    /// Spreads kept by the portfolio selector
    #[serde(default = "default_top_trades")]
    pub top_trades: usize,

    /// Spreads required for a recommendation
    #[serde(default = "default_final_trades")]
    pub final_trades: usize,
}

impl Default for PortfolioConstraints {
    fn default() -> Self {
        Self {
            nav: default_nav(),
            max_loss_pct: default_max_loss_pct(),
            min_pop: default_min_pop(),
            min_credit_loss_ratio: default_min_credit_loss_ratio(),
            min_roi: default_min_roi(),
            max_roi: default_max_roi(),
            max_sector_trades: default_max_sector_trades(),
            max_basket_delta: default_max_basket_delta(),
            max_basket_vega: default_max_basket_vega(),
            min_stock_price: default_min_stock_price(),
            max_stock_price: default_max_stock_price(),
            max_spread_pct: default_max_spread_pct(),
            min_option_price: default_min_option_price(),
            min_dte: default_min_dte(),
            max_dte: default_max_dte(),
            min_iv: default_min_iv(),
            max_iv: default_max_iv(),
            top_candidates: default_top_candidates(),
            top_trades: default_top_trades(),
            final_trades: default_final_trades(),
        }
    }
}

impl PortfolioConstraints {
    /// Dollar loss budget for a single trade.
    pub fn max_loss_per_trade(&self) -> f64 {
        self.nav * self.max_loss_pct
    }

    /// Apply `SPREAD_<FIELD>` environment overrides (e.g. `SPREAD_MIN_POP`).
    pub fn apply_env_overrides(&mut self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        report.check(env_override("SPREAD_NAV", &mut self.nav));
        report.check(env_override("SPREAD_MAX_LOSS_PCT", &mut self.max_loss_pct));
        report.check(env_override("SPREAD_MIN_POP", &mut self.min_pop));
        report.check(env_override("SPREAD_MIN_CREDIT_LOSS_RATIO", &mut self.min_credit_loss_ratio));
        report.check(env_override("SPREAD_MIN_ROI", &mut self.min_roi));
        report.check(env_override("SPREAD_MAX_ROI", &mut self.max_roi));
        report.check(env_override("SPREAD_MAX_SECTOR_TRADES", &mut self.max_sector_trades));
        report.check(env_override("SPREAD_MAX_BASKET_DELTA", &mut self.max_basket_delta));
        report.check(env_override("SPREAD_MAX_BASKET_VEGA", &mut self.max_basket_vega));
        report.check(env_override("SPREAD_MIN_STOCK_PRICE", &mut self.min_stock_price));
        report.check(env_override("SPREAD_MAX_STOCK_PRICE", &mut self.max_stock_price));
        report.check(env_override("SPREAD_MAX_SPREAD_PCT", &mut self.max_spread_pct));
        report.check(env_override("SPREAD_MIN_OPTION_PRICE", &mut self.min_option_price));
        report.check(env_override("SPREAD_MIN_DTE", &mut self.min_dte));
        report.check(env_override("SPREAD_MAX_DTE", &mut self.max_dte));
        report.check(env_override("SPREAD_MIN_IV", &mut self.min_iv));
        report.check(env_override("SPREAD_MAX_IV", &mut self.max_iv));
        report.check(env_override("SPREAD_TOP_CANDIDATES", &mut self.top_candidates));
        report.check(env_override("SPREAD_TOP_TRADES", &mut self.top_trades));
        report.check(env_override("SPREAD_FINAL_TRADES", &mut self.final_trades));
        report.finish()
    }
}

impl Validate for PortfolioConstraints {
    fn validate(&self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();

        report.require(
            self.nav.is_finite() && self.nav > 0.0,
            "constraints.nav",
            "must be a positive amount",
        );
        report.require(
            self.max_loss_pct > 0.0 && self.max_loss_pct <= 1.0,
            "constraints.max_loss_pct",
            "must be in (0, 1]",
        );
        report.require(
            (0.0..=1.0).contains(&self.min_pop),
            "constraints.min_pop",
            "must be in [0, 1]",
        );
        report.require(
            self.min_credit_loss_ratio >= 0.0,
            "constraints.min_credit_loss_ratio",
            "must not be negative",
        );
        report.require(
            self.min_roi >= 0.0 && self.min_roi <= self.max_roi,
            "constraints.min_roi",
            "must be non-negative and not above max_roi",
        );
        report.require(
            self.max_sector_trades > 0,
            "constraints.max_sector_trades",
            "must be greater than 0",
        );
        report.require(
            self.max_basket_delta > 0.0,
            "constraints.max_basket_delta",
            "must be positive",
        );
        report.require(
            self.max_basket_vega < 0.0,
            "constraints.max_basket_vega",
            "must be negative (short-vega floor)",
        );
        report.require(
            self.min_stock_price > 0.0 && self.min_stock_price < self.max_stock_price,
            "constraints.min_stock_price",
            "must be positive and below max_stock_price",
        );
        report.require(
            self.max_spread_pct > 0.0,
            "constraints.max_spread_pct",
            "must be positive",
        );
        report.require(
            self.min_option_price >= 0.0,
            "constraints.min_option_price",
            "must not be negative",
        );
        report.require(
            self.min_dte > 0 && self.min_dte <= self.max_dte,
            "constraints.min_dte",
            "must be positive and not above max_dte",
        );
        report.require(
            self.max_dte <= MAX_DTE,
            "constraints.max_dte",
            "must not exceed 730 days",
        );
        report.require(
            self.min_iv >= 0.0 && self.min_iv < self.max_iv,
            "constraints.min_iv",
            "must be non-negative and below max_iv",
        );
        report.require(
            self.top_candidates > 0,
            "constraints.top_candidates",
            "must be greater than 0",
        );
        report.require(
            self.final_trades > 0 && self.final_trades <= self.top_trades,
            "constraints.final_trades",
            "must be positive and not above top_trades",
        );

        report.finish()
    }
}

fn default_nav() -> f64 {
    100_000.0
}

fn default_max_loss_pct() -> f64 {
    0.02
}

fn default_min_pop() -> f64 {
    0.70
}

fn default_min_credit_loss_ratio() -> f64 {
    0.05
}

fn default_min_roi() -> f64 {
    0.05
}

fn default_max_roi() -> f64 {
    0.50
}

fn default_max_sector_trades() -> usize {
    2
}

fn default_max_basket_delta() -> f64 {
    100.0
}

fn default_max_basket_vega() -> f64 {
    -50.0
}

fn default_min_stock_price() -> f64 {
    20.0
}

fn default_max_stock_price() -> f64 {
    500.0
}

fn default_max_spread_pct() -> f64 {
    0.25
}

fn default_min_option_price() -> f64 {
    0.20
}

fn default_min_dte() -> u32 {
    30
}

fn default_max_dte() -> u32 {
    45
}

fn default_min_iv() -> f64 {
    15.0
}

fn default_max_iv() -> f64 {
    120.0
}

fn default_top_candidates() -> usize {
    22
}

fn default_top_trades() -> usize {
    9
}

fn default_final_trades() -> usize {
    5
}

// ============================================================================
// Universe & Data Source
// ============================================================================

/// Universe definition. Never embedded in pipeline code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Explicit symbols
    #[serde(default)]
    pub symbols: Vec<String>,

    /// Optional file with one symbol per line
    #[serde(default)]
    pub file: Option<String>,
}

/// Market data source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Path to a JSON market snapshot
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

// ============================================================================
// Fetch Configuration
// ============================================================================

/// Timeouts and fan-out limits for market data calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum in-flight symbols during fan-out
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Daily bars requested per symbol
    #[serde(default = "default_bars_lookback")]
    pub bars_lookback: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            concurrency: default_concurrency(),
            bars_lookback: default_bars_lookback(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

impl Validate for FetchConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        report.require(self.timeout_ms > 0, "fetch.timeout_ms", "must be greater than 0");
        report.require(self.concurrency > 0, "fetch.concurrency", "must be greater than 0");
        report.require(
            self.bars_lookback >= 50,
            "fetch.bars_lookback",
            "must request at least 50 bars",
        );
        report.finish()
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_concurrency() -> usize {
    8
}

fn default_bars_lookback() -> usize {
    252
}

// ============================================================================
// Candidate Filter Configuration
// ============================================================================

/// Volatility and liquidity estimation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFilterConfig {
    /// Minimum daily bars for a symbol to be considered
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,

    /// Return window for historical volatility
    #[serde(default = "default_hv_periods")]
    pub hv_periods: usize,

    /// HV used when the return history is too short (annualized %)
    #[serde(default = "default_fallback_hv")]
    pub fallback_hv: f64,

    /// IV = HV x multiplier when no options-chain IV is available.
    /// Heuristic, not a market truth.
    #[serde(default = "default_iv_multiplier")]
    pub iv_multiplier: f64,

    /// Average daily volume that earns a liquidity score of 100
    #[serde(default = "default_liquidity_full_volume")]
    pub liquidity_full_volume: f64,

    /// Trailing bars averaged for the liquidity score
    #[serde(default = "default_liquidity_window")]
    pub liquidity_window: usize,

    /// Sector assigned when classification is unavailable
    #[serde(default = "default_unknown_sector")]
    pub unknown_sector: String,
}

impl Default for CandidateFilterConfig {
    fn default() -> Self {
        Self {
            min_bars: default_min_bars(),
            hv_periods: default_hv_periods(),
            fallback_hv: default_fallback_hv(),
            iv_multiplier: default_iv_multiplier(),
            liquidity_full_volume: default_liquidity_full_volume(),
            liquidity_window: default_liquidity_window(),
            unknown_sector: default_unknown_sector(),
        }
    }
}

impl Validate for CandidateFilterConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        report.require(self.min_bars >= 2, "candidate.min_bars", "must be at least 2");
        report.require(self.hv_periods >= 2, "candidate.hv_periods", "must be at least 2");
        report.require(self.fallback_hv > 0.0, "candidate.fallback_hv", "must be positive");
        report.require(
            self.iv_multiplier > 0.0,
            "candidate.iv_multiplier",
            "must be positive",
        );
        report.require(
            self.liquidity_full_volume > 0.0,
            "candidate.liquidity_full_volume",
            "must be positive",
        );
        report.require(
            self.liquidity_window > 0,
            "candidate.liquidity_window",
            "must be greater than 0",
        );
        report.finish()
    }
}

fn default_min_bars() -> usize {
    50
}

fn default_hv_periods() -> usize {
    20
}

fn default_fallback_hv() -> f64 {
    25.0
}

fn default_iv_multiplier() -> f64 {
    1.3
}

fn default_liquidity_full_volume() -> f64 {
    10_000_000.0
}

fn default_liquidity_window() -> usize {
    20
}

fn default_unknown_sector() -> String {
    "Unknown".to_string()
}

// ============================================================================
// Pricing Configuration
// ============================================================================

/// Spread geometry and synthetic leg quoting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Short strike distance from spot (fraction)
    #[serde(default = "default_short_otm_pct")]
    pub short_otm_pct: f64,

    /// Long strike distance from spot (fraction)
    #[serde(default = "default_long_otm_pct")]
    pub long_otm_pct: f64,

    /// Continuously compounded risk-free rate
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Synthetic quote half-spread around the model mid (fraction of mid)
    #[serde(default = "default_quote_half_spread")]
    pub quote_half_spread: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            short_otm_pct: default_short_otm_pct(),
            long_otm_pct: default_long_otm_pct(),
            risk_free_rate: default_risk_free_rate(),
            quote_half_spread: default_quote_half_spread(),
        }
    }
}

impl Validate for PricingConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut report = ValidationReport::new();
        report.require(
            self.short_otm_pct > 0.0 && self.short_otm_pct < self.long_otm_pct,
            "pricing.short_otm_pct",
            "must be positive and below long_otm_pct",
        );
        report.require(
            self.long_otm_pct < 1.0,
            "pricing.long_otm_pct",
            "must be below 1.0",
        );
        report.require(
            (0.0..1.0).contains(&self.quote_half_spread),
            "pricing.quote_half_spread",
            "must be in [0, 1)",
        );
        report.finish()
    }
}

fn default_short_otm_pct() -> f64 {
    0.10
}

fn default_long_otm_pct() -> f64 {
    0.15
}

fn default_risk_free_rate() -> f64 {
    0.045
}

fn default_quote_half_spread() -> f64 {
    0.05
}

// ============================================================================
// News Gate Configuration
// ============================================================================

/// Headline red-flag policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsGateConfig {
    /// Headline lookback in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Headlines inspected per symbol
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,

    /// Case-insensitive red-flag keywords
    #[serde(default = "default_red_flag_keywords")]
    pub red_flag_keywords: Vec<String>,

    /// Heat assigned when nothing is flagged
    #[serde(default = "default_neutral_heat")]
    pub neutral_heat: u8,

    /// Heat assigned on a red-flag hit
    #[serde(default = "default_red_flag_heat")]
    pub red_flag_heat: u8,

    /// Heat at or above which a spread is skipped outright
    #[serde(default = "default_skip_heat")]
    pub skip_heat: u8,
}

impl Default for NewsGateConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            max_headlines: default_max_headlines(),
            red_flag_keywords: default_red_flag_keywords(),
            neutral_heat: default_neutral_heat(),
            red_flag_heat: default_red_flag_heat(),
            skip_heat: default_skip_heat(),
        }
    }
}

fn default_lookback_days() -> u32 {
    3
}

fn default_max_headlines() -> usize {
    3
}

fn default_red_flag_keywords() -> Vec<String> {
    ["earnings", "fda", "merger", "acquisition", "lawsuit", "bankruptcy"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_neutral_heat() -> u8 {
    5
}

fn default_red_flag_heat() -> u8 {
    8
}

fn default_skip_heat() -> u8 {
    10
}

// ============================================================================
// Report Configuration
// ============================================================================

/// Output rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// "text" (fixed-width table) or "json"
    #[serde(default = "default_report_format")]
    pub format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: default_report_format(),
        }
    }
}

fn default_report_format() -> String {
    "text".to_string()
}

// ============================================================================
// Tests
// ============================================================================
