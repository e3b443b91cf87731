//! Black-Scholes leg pricing.
//!
//! European model on a non-dividend underlying. Volatility and rate are
//! fractions here (0.25 = 25%); callers convert from percent.

use statrs::function::erf::erf;
use std::f64::consts::{PI, SQRT_2};

use super::OptionType;

/// Days per year for time-to-expiry.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Model price and sensitivities for one contract (per share).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegPrice {
    pub price: f64,
    pub delta: f64,
    /// Per 1 volatility point
    pub vega: f64,
    /// Per calendar day
    pub theta: f64,
}

/// Standard normal CDF.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal PDF.
pub fn norm_pdf(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * PI).sqrt()
}

fn d1_d2(spot: f64, strike: f64, t: f64, rate: f64, vol: f64) -> (f64, f64) {
    let sqrt_t = t.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * t) / (vol * sqrt_t);
    (d1, d1 - vol * sqrt_t)
}

fn valid(spot: f64, strike: f64, t: f64, vol: f64) -> bool {
    spot > 0.0 && strike > 0.0 && t > 0.0 && vol > 0.0 && spot.is_finite() && vol.is_finite()
}

/// Price a European option. `None` on degenerate inputs.
pub fn price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    t: f64,
    rate: f64,
    vol: f64,
) -> Option<LegPrice> {
    if !valid(spot, strike, t, vol) {
        return None;
    }
    let (d1, d2) = d1_d2(spot, strike, t, rate, vol);
    let discount = (-rate * t).exp();
    let pdf_d1 = norm_pdf(d1);
    let decay = -spot * pdf_d1 * vol / (2.0 * t.sqrt());

    let (price, delta, theta_year) = match option_type {
        OptionType::Call => (
            spot * norm_cdf(d1) - strike * discount * norm_cdf(d2),
            norm_cdf(d1),
            decay - rate * strike * discount * norm_cdf(d2),
        ),
        OptionType::Put => (
            strike * discount * norm_cdf(-d2) - spot * norm_cdf(-d1),
            norm_cdf(d1) - 1.0,
            decay + rate * strike * discount * norm_cdf(-d2),
        ),
    };

    Some(LegPrice {
        price: price.max(0.0),
        delta,
        vega: spot * pdf_d1 * t.sqrt() / 100.0,
        theta: theta_year / DAYS_PER_YEAR,
    })
}

/// Risk-neutral probability that the underlying finishes on the profitable
/// side of `level`: above it for puts sold, below it for calls sold.
pub fn prob_beyond(
    option_type: OptionType,
    spot: f64,
    level: f64,
    t: f64,
    rate: f64,
    vol: f64,
) -> Option<f64> {
    if !valid(spot, level, t, vol) {
        return None;
    }
    let (_, d2) = d1_d2(spot, level, t, rate, vol);
    Some(match option_type {
        OptionType::Put => norm_cdf(d2),
        OptionType::Call => norm_cdf(-d2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f64 = 38.0 / DAYS_PER_YEAR;

    #[test]
    fn test_norm_cdf_reference_points() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((norm_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 1e-3);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, v) = (100.0, 95.0, 0.045, 0.30);
        let call = price(OptionType::Call, s, k, T, r, v).unwrap();
        let put = price(OptionType::Put, s, k, T, r, v).unwrap();
        let parity = call.price - put.price - (s - k * (-r * T).exp());
        assert!(parity.abs() < 1e-9, "parity gap {parity}");
    }

    #[test]
    fn test_otm_put_reference_value() {
        // S=100, K=90, 38 days, 30% vol, 4.5% rate
        let p = price(OptionType::Put, 100.0, 90.0, T, 0.045, 0.30).unwrap();
        assert!(p.price > 0.5 && p.price < 0.7, "price {}", p.price);
        assert!(p.delta < -0.08 && p.delta > -0.16, "delta {}", p.delta);
        assert!(p.vega > 0.0);
        assert!(p.theta < 0.0);
    }

    #[test]
    fn test_deeper_otm_is_cheaper() {
        let near = price(OptionType::Call, 100.0, 110.0, T, 0.045, 0.3).unwrap();
        let far = price(OptionType::Call, 100.0, 115.0, T, 0.045, 0.3).unwrap();
        assert!(far.price < near.price);
        assert!(far.delta < near.delta);
    }

    #[test]
    fn test_prob_beyond_sides() {
        let put_side = prob_beyond(OptionType::Put, 100.0, 90.0, T, 0.045, 0.3).unwrap();
        let call_side = prob_beyond(OptionType::Call, 100.0, 110.0, T, 0.045, 0.3).unwrap();
        assert!(put_side > 0.8 && put_side < 1.0);
        assert!(call_side > 0.8 && call_side < 1.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(price(OptionType::Put, 100.0, 90.0, 0.0, 0.045, 0.3).is_none());
        assert!(price(OptionType::Put, 100.0, 90.0, T, 0.045, 0.0).is_none());
        assert!(prob_beyond(OptionType::Call, -1.0, 90.0, T, 0.045, 0.3).is_none());
    }
}
