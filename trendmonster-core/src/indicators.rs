//! Simple Moving Average (SMA) over weekly closes.
//!
//! Only the trailing value is needed: the trend filter compares the latest
//! confirmed weekly close against the mean of the last `period` closes
//! (the close itself included).

/// Mean of the last `period` values.
///
/// Returns `None` when `period` is zero, the series is shorter than
/// `period`, or any value in the window is NaN/infinite.
pub fn trailing_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    if window.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some(window.iter().sum::<f64>() / period as f64)
}
