//! Volatility edge: how rich option premium is relative to realized movement.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Thresholds for the volatility edge score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolEdgeConfig {
    /// IV/HV above this earns the top ratio tier
    #[serde(default = "default_ratio_rich")]
    pub ratio_rich: f64,
    #[serde(default = "default_ratio_elevated")]
    pub ratio_elevated: f64,
    #[serde(default = "default_ratio_fair")]
    pub ratio_fair: f64,
    /// IV/HV below this earns nothing
    #[serde(default = "default_ratio_cheap")]
    pub ratio_cheap: f64,

    #[serde(default = "default_rank_high")]
    pub rank_high: f64,
    #[serde(default = "default_rank_mid")]
    pub rank_mid: f64,

    #[serde(default = "default_percentile_high")]
    pub percentile_high: f64,
    #[serde(default = "default_percentile_mid")]
    pub percentile_mid: f64,

    /// HV band that suits premium selling (annualized %)
    #[serde(default = "default_hv_band_low")]
    pub hv_band_low: f64,
    #[serde(default = "default_hv_band_high")]
    pub hv_band_high: f64,
}

impl Default for VolEdgeConfig {
    fn default() -> Self {
        Self {
            ratio_rich: default_ratio_rich(),
            ratio_elevated: default_ratio_elevated(),
            ratio_fair: default_ratio_fair(),
            ratio_cheap: default_ratio_cheap(),
            rank_high: default_rank_high(),
            rank_mid: default_rank_mid(),
            percentile_high: default_percentile_high(),
            percentile_mid: default_percentile_mid(),
            hv_band_low: default_hv_band_low(),
            hv_band_high: default_hv_band_high(),
        }
    }
}

fn default_ratio_rich() -> f64 {
    1.5
}
fn default_ratio_elevated() -> f64 {
    1.2
}
fn default_ratio_fair() -> f64 {
    1.0
}
fn default_ratio_cheap() -> f64 {
    0.8
}
fn default_rank_high() -> f64 {
    50.0
}
fn default_rank_mid() -> f64 {
    30.0
}
fn default_percentile_high() -> f64 {
    80.0
}
fn default_percentile_mid() -> f64 {
    50.0
}
fn default_hv_band_low() -> f64 {
    15.0
}
fn default_hv_band_high() -> f64 {
    40.0
}

/// Points for the IV/HV ratio.
pub fn ratio_points(ratio: f64, config: &VolEdgeConfig) -> f64 {
    if ratio > config.ratio_rich {
        40.0
    } else if ratio > config.ratio_elevated {
        30.0
    } else if ratio > config.ratio_fair {
        20.0
    } else if ratio < config.ratio_cheap {
        0.0
    } else {
        10.0
    }
}

/// Points for the IV rank proxy.
pub fn rank_points(iv_rank: f64, config: &VolEdgeConfig) -> f64 {
    if iv_rank > config.rank_high {
        30.0
    } else if iv_rank > config.rank_mid {
        20.0
    } else {
        10.0
    }
}

/// Points for the IV percentile proxy.
pub fn percentile_points(iv_percentile: f64, config: &VolEdgeConfig) -> f64 {
    if iv_percentile > config.percentile_high {
        20.0
    } else if iv_percentile > config.percentile_mid {
        10.0
    } else {
        0.0
    }
}

/// Volatility edge score, 0-100.
pub fn score(candidate: &Candidate, config: &VolEdgeConfig) -> f64 {
    let hv_adjustment = if (config.hv_band_low..=config.hv_band_high).contains(&candidate.hv) {
        10.0
    } else {
        -10.0
    };

    let raw = ratio_points(candidate.iv_hv_ratio(), config)
        + rank_points(candidate.iv_rank, config)
        + percentile_points(candidate.iv_percentile, config)
        + hv_adjustment;
    raw.clamp(0.0, 100.0)
}
