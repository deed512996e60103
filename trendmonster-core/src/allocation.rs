//! Target allocation lookup table.
//!
//! | Trend     | Band      | Equity A | Equity B | Cash |
//! |-----------|-----------|----------|----------|------|
//! | DOWNTREND | any       | 0.00     | 0.00     | 1.00 |
//! | UPTREND   | VERY_LOW  | 0.30     | 0.70     | 0.00 |
//! | UPTREND   | LOW       | 0.50     | 0.50     | 0.00 |
//! | UPTREND   | MODERATE  | 0.60     | 0.40     | 0.00 |
//! | UPTREND   | ELEVATED  | 0.75     | 0.25     | 0.00 |
//! | UPTREND   | HIGH      | 0.85     | 0.15     | 0.00 |
//!
//! Rows are literals, not a formula. Calmer volatility shifts weight toward
//! equity B (the leveraged instrument).

use crate::classify::classify_volatility_with;
use crate::domain::{Allocation, Trend, VolatilityLevel};
use crate::params::VolatilityThresholds;

const VERY_LOW_ROW: Allocation = Allocation::table_row(0.30, 0.70, 0.0);
const LOW_ROW: Allocation = Allocation::table_row(0.50, 0.50, 0.0);
const MODERATE_ROW: Allocation = Allocation::table_row(0.60, 0.40, 0.0);
const ELEVATED_ROW: Allocation = Allocation::table_row(0.75, 0.25, 0.0);
const HIGH_ROW: Allocation = Allocation::table_row(0.85, 0.15, 0.0);

/// Table lookup by classified state.
pub fn allocation_for(trend: Trend, level: VolatilityLevel) -> Allocation {
    match trend {
        Trend::Downtrend => Allocation::all_cash(),
        Trend::Uptrend => match level {
            VolatilityLevel::VeryLow => VERY_LOW_ROW,
            VolatilityLevel::Low => LOW_ROW,
            VolatilityLevel::Moderate => MODERATE_ROW,
            VolatilityLevel::Elevated => ELEVATED_ROW,
            VolatilityLevel::High => HIGH_ROW,
        },
    }
}

/// Target allocation using the default thresholds.
pub fn calculate_allocation(trend: Trend, ratio: f64) -> Allocation {
    calculate_allocation_with(trend, ratio, &VolatilityThresholds::DEFAULT)
}

/// Target allocation from trend and raw ratio. Uses the same five-way
/// banding as [`classify_volatility_with`].
pub fn calculate_allocation_with(trend: Trend, ratio: f64, t: &VolatilityThresholds) -> Allocation {
    allocation_for(trend, classify_volatility_with(ratio, t))
}
