//! Volatility and liquidity estimators over daily bars.
//!
//! All volatilities are annualized and expressed in percent (25.0 = 25%).

use statrs::statistics::Statistics;

use crate::data::Bar;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Relative tolerance below which a series counts as flat.
const FLAT_TOLERANCE: f64 = 1e-9;

fn is_flat(min: f64, max: f64) -> bool {
    max - min <= FLAT_TOLERANCE * max.abs().max(1.0)
}

/// Simple close-to-close returns as fractions.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Annualized historical volatility over the last `periods` returns.
///
/// Returns `None` when fewer than `periods + 1` closes are available.
pub fn historical_volatility(closes: &[f64], periods: usize) -> Option<f64> {
    if periods < 2 || closes.len() < periods + 1 {
        return None;
    }
    let window = &closes[closes.len() - periods - 1..];
    let returns = simple_returns(window);
    if returns.len() < 2 {
        return None;
    }
    let sd = returns.iter().std_dev();
    sd.is_finite().then(|| sd * TRADING_DAYS.sqrt() * 100.0)
}

/// Historical volatility at every bar that has a full `periods` window.
pub fn rolling_hv_series(closes: &[f64], periods: usize) -> Vec<f64> {
    if periods < 2 || closes.len() < periods + 1 {
        return Vec::new();
    }
    (periods + 1..=closes.len())
        .filter_map(|end| historical_volatility(&closes[..end], periods))
        .collect()
}

/// Where the latest value sits in the series range, 0-100.
///
/// Stands in for IV rank when no option-chain history is available.
/// Defaults to 50 for short or flat series.
pub fn rank_in_range(series: &[f64]) -> f64 {
    let Some(&current) = series.last() else {
        return 50.0;
    };
    if series.len() < 2 {
        return 50.0;
    }
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if is_flat(min, max) {
        return 50.0;
    }
    ((current - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Share of series values strictly below the latest value, 0-100.
///
/// Defaults to 50 for short or flat series.
pub fn percentile_of_last(series: &[f64]) -> f64 {
    let Some(&current) = series.last() else {
        return 50.0;
    };
    if series.len() < 2 {
        return 50.0;
    }
    let history = &series[..series.len() - 1];
    let min = history.iter().copied().fold(current, f64::min);
    let max = history.iter().copied().fold(current, f64::max);
    if is_flat(min, max) {
        return 50.0;
    }
    let below = history.iter().filter(|v| **v < current).count();
    below as f64 / history.len() as f64 * 100.0
}

/// Simple moving average of the last `n` closes.
pub fn sma(closes: &[f64], n: usize) -> Option<f64> {
    if n == 0 || closes.len() < n {
        return None;
    }
    Some(closes[closes.len() - n..].iter().sum::<f64>() / n as f64)
}

/// Average volume of the last `window` bars (0 when no bar carries volume).
pub fn average_volume(bars: &[Bar], window: usize) -> f64 {
    let start = bars.len().saturating_sub(window);
    let recent = &bars[start..];
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().map(|b| b.volume.max(0.0)).sum::<f64>() / recent.len() as f64
}

/// Liquidity score, 0-100, linear in volume up to `full_volume`.
pub fn liquidity_score(avg_volume: f64, full_volume: f64) -> f64 {
    if full_volume <= 0.0 || !avg_volume.is_finite() {
        return 0.0;
    }
    (avg_volume / full_volume * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn alternating(n: usize, base: f64, swing: f64) -> Vec<f64> {
        (0..n)
            .map(|i| if i % 2 == 0 { base } else { base * (1.0 + swing) })
            .collect()
    }

    #[test]
    fn test_flat_prices_have_zero_volatility() {
        let closes = vec![100.0; 30];
        assert_eq!(historical_volatility(&closes, 20), Some(0.0));
    }

    #[test]
    fn test_short_history_has_no_volatility() {
        let closes = vec![100.0; 20];
        assert_eq!(historical_volatility(&closes, 20), None);
    }

    #[test]
    fn test_alternating_prices_volatility_magnitude() {
        // +1% / -0.99% daily swings annualize to roughly 16%
        let closes = alternating(40, 100.0, 0.01);
        let hv = historical_volatility(&closes, 20).unwrap();
        assert!(hv > 14.0 && hv < 18.0, "hv = {hv}");
    }

    #[test]
    fn test_rolling_series_length() {
        let closes = alternating(60, 50.0, 0.02);
        assert_eq!(rolling_hv_series(&closes, 20).len(), 40);
        assert!(rolling_hv_series(&closes[..15], 20).is_empty());
    }

    #[test]
    fn test_rank_in_range() {
        assert_eq!(rank_in_range(&[10.0, 20.0, 15.0]), 50.0);
        assert_eq!(rank_in_range(&[10.0, 20.0, 20.0]), 100.0);
        assert_eq!(rank_in_range(&[10.0, 20.0, 10.0]), 0.0);
        assert_eq!(rank_in_range(&[5.0, 5.0]), 50.0);
        assert_eq!(rank_in_range(&[]), 50.0);
    }

    #[test]
    fn test_percentile_of_last() {
        assert_eq!(percentile_of_last(&[10.0, 12.0, 14.0, 16.0, 15.0]), 75.0);
        assert_eq!(percentile_of_last(&[10.0, 12.0, 9.0]), 0.0);
        assert_eq!(percentile_of_last(&[7.0]), 50.0);
    }

    #[test]
    fn test_sma() {
        assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
        assert_eq!(sma(&[1.0], 2), None);
    }

    #[test]
    fn test_average_volume_uses_trailing_window() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars: Vec<Bar> = (0..5)
            .map(|i| Bar {
                date,
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: (i as f64 + 1.0) * 100.0,
            })
            .collect();
        assert_eq!(average_volume(&bars, 2), 450.0);
        assert_eq!(average_volume(&[], 20), 0.0);
    }

    #[test]
    fn test_liquidity_score_caps_at_100() {
        assert_eq!(liquidity_score(5_000_000.0, 10_000_000.0), 50.0);
        assert_eq!(liquidity_score(40_000_000.0, 10_000_000.0), 100.0);
        assert_eq!(liquidity_score(1.0, 0.0), 0.0);
    }
}
