//! Trend, volatility band and posture classification.
//!
//! All functions are pure and total. Inputs are expected to be finite;
//! NaN comparisons fall through to the last branch of each cascade.
//!
//! Every threshold comparison is a strict `<`, so a ratio sitting exactly on
//! a cut point belongs to the band above it. The one exception is the
//! DEFENSIVE posture, which requires the ratio to be strictly above T4.

use crate::domain::{Posture, Trend, VolatilityLevel};
use crate::params::VolatilityThresholds;

/// UPTREND iff `price > reference`. Equality is DOWNTREND.
pub fn classify_trend(price: f64, reference: f64) -> Trend {
    if price > reference {
        Trend::Uptrend
    } else {
        Trend::Downtrend
    }
}

/// Five-way band using the default thresholds.
pub fn classify_volatility(ratio: f64) -> VolatilityLevel {
    classify_volatility_with(ratio, &VolatilityThresholds::DEFAULT)
}

pub fn classify_volatility_with(ratio: f64, t: &VolatilityThresholds) -> VolatilityLevel {
    if ratio < t.very_low {
        VolatilityLevel::VeryLow
    } else if ratio < t.low {
        VolatilityLevel::Low
    } else if ratio < t.moderate {
        VolatilityLevel::Moderate
    } else if ratio < t.elevated {
        VolatilityLevel::Elevated
    } else {
        VolatilityLevel::High
    }
}

/// Posture using the default thresholds.
pub fn determine_posture(trend: Trend, ratio: f64) -> Posture {
    determine_posture_with(trend, ratio, &VolatilityThresholds::DEFAULT)
}

/// CASH in a downtrend; otherwise a three-way split on T2 and T4 only.
pub fn determine_posture_with(trend: Trend, ratio: f64, t: &VolatilityThresholds) -> Posture {
    if trend == Trend::Downtrend {
        return Posture::Cash;
    }

    if ratio < t.low {
        Posture::Aggressive
    } else if ratio > t.elevated {
        Posture::Defensive
    } else {
        Posture::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_strictly_above() {
        assert_eq!(classify_trend(595.0, 540.0), Trend::Uptrend);
        assert_eq!(classify_trend(400.0, 420.0), Trend::Downtrend);
    }

    #[test]
    fn trend_equality_is_downtrend() {
        assert_eq!(classify_trend(420.0, 420.0), Trend::Downtrend);
        assert_eq!(classify_trend(0.0, 0.0), Trend::Downtrend);
    }

    #[test]
    fn trend_zero_reference() {
        assert_eq!(classify_trend(1.0, 0.0), Trend::Uptrend);
        assert_eq!(classify_trend(-1.0, 0.0), Trend::Downtrend);
    }

    #[test]
    fn volatility_interior_values() {
        assert_eq!(classify_volatility(0.50), VolatilityLevel::VeryLow);
        assert_eq!(classify_volatility(0.85), VolatilityLevel::Low);
        assert_eq!(classify_volatility(0.92), VolatilityLevel::Moderate);
        assert_eq!(classify_volatility(1.00), VolatilityLevel::Elevated);
        assert_eq!(classify_volatility(1.50), VolatilityLevel::High);
    }

    #[test]
    fn volatility_boundaries_belong_to_higher_band() {
        assert_eq!(classify_volatility(0.80), VolatilityLevel::Low);
        assert_eq!(classify_volatility(0.90), VolatilityLevel::Moderate);
        assert_eq!(classify_volatility(0.95), VolatilityLevel::Elevated);
        assert_eq!(classify_volatility(1.05), VolatilityLevel::High);
    }

    #[test]
    fn volatility_just_below_boundaries() {
        let below = |x: f64| x - 1e-9;
        assert_eq!(classify_volatility(below(0.80)), VolatilityLevel::VeryLow);
        assert_eq!(classify_volatility(below(0.90)), VolatilityLevel::Low);
        assert_eq!(classify_volatility(below(0.95)), VolatilityLevel::Moderate);
        assert_eq!(classify_volatility(below(1.05)), VolatilityLevel::Elevated);
    }

    #[test]
    fn volatility_custom_thresholds() {
        let t = VolatilityThresholds {
            very_low: 0.5,
            low: 0.6,
            moderate: 0.7,
            elevated: 0.8,
        };
        assert_eq!(classify_volatility_with(0.55, &t), VolatilityLevel::Low);
        assert_eq!(classify_volatility_with(0.8, &t), VolatilityLevel::High);
    }

    #[test]
    fn posture_downtrend_is_cash_for_any_ratio() {
        for ratio in [0.1, 0.85, 0.95, 1.05, 3.0] {
            assert_eq!(determine_posture(Trend::Downtrend, ratio), Posture::Cash);
        }
    }

    #[test]
    fn posture_uses_t2_and_t4_only() {
        assert_eq!(determine_posture(Trend::Uptrend, 0.70), Posture::Aggressive);
        // spans VERY_LOW and LOW bands
        assert_eq!(determine_posture(Trend::Uptrend, 0.85), Posture::Aggressive);
        assert_eq!(determine_posture(Trend::Uptrend, 0.90), Posture::Balanced);
        assert_eq!(determine_posture(Trend::Uptrend, 0.97), Posture::Balanced);
        assert_eq!(determine_posture(Trend::Uptrend, 1.06), Posture::Defensive);
    }

    #[test]
    fn posture_at_t4_is_balanced_while_band_is_high() {
        assert_eq!(determine_posture(Trend::Uptrend, 1.05), Posture::Balanced);
        assert_eq!(classify_volatility(1.05), VolatilityLevel::High);
    }
}
