//! One-shot helpers with default params and no held allocation.

use crate::allocation::calculate_allocation;
use crate::classify::classify_trend;
use crate::domain::MarketSnapshot;
use crate::report::SignalReport;
use crate::signal::{SignalError, SignalGenerator};

/// Full wire record from the four raw inputs.
pub fn get_signal(
    price: f64,
    reference: f64,
    vol_numerator: f64,
    vol_denominator: f64,
) -> Result<SignalReport, SignalError> {
    let snapshot = MarketSnapshot::new(price, reference, vol_numerator, vol_denominator);
    Ok(SignalGenerator::new().generate(&snapshot)?.to_report())
}

/// Target allocation as `(equity_a, equity_b, cash)` percentages.
pub fn get_allocation_only(
    price: f64,
    reference: f64,
    vol_numerator: f64,
    vol_denominator: f64,
) -> Result<(f64, f64, f64), SignalError> {
    let snapshot = MarketSnapshot::new(price, reference, vol_numerator, vol_denominator);
    snapshot.check_finite()?;
    let ratio = snapshot.volatility_ratio()?;
    let trend = classify_trend(price, reference);
    Ok(calculate_allocation(trend, ratio).as_percentages())
}
