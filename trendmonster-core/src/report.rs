//! Wire record for dashboards and APIs.
//!
//! ```json
//! {
//!   "trend": "UPTREND",
//!   "posture": "AGGRESSIVE",
//!   "vix_level": "LOW",
//!   "allocation": { "equity_a": 50.0, "equity_b": 50.0, "cash": 0.0 },
//!   "indicators": { "ratio": 0.8146, "price": 595.0, "reference": 540.0 },
//!   "rebalance_required": true,
//!   "rebalance_instructions": "Execute at next market open: ...",
//!   "timestamps": {
//!     "generated": "2024-03-19T08:00:00",
//!     "weekly_as_of": "2024-03-15T16:00:00",
//!     "daily_as_of": null
//!   }
//! }
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Posture, Trend, VolatilityLevel};
use crate::signal::Signal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub trend: Trend,
    pub posture: Posture,
    pub vix_level: VolatilityLevel,
    pub allocation: AllocationReport,
    pub indicators: IndicatorReport,
    pub rebalance_required: bool,
    pub rebalance_instructions: String,
    pub timestamps: TimestampReport,
}

/// Percentages (0-100), 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub equity_a: f64,
    pub equity_b: f64,
    pub cash: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    /// 4 decimals.
    pub ratio: f64,
    /// 2 decimals.
    pub price: f64,
    /// 2 decimals.
    pub reference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampReport {
    pub generated: NaiveDateTime,
    pub weekly_as_of: Option<NaiveDateTime>,
    pub daily_as_of: Option<NaiveDateTime>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

impl From<&Signal> for SignalReport {
    fn from(signal: &Signal) -> Self {
        let (equity_a, equity_b, cash) = signal.allocation().as_percentages();
        Self {
            trend: signal.trend(),
            posture: signal.posture(),
            vix_level: signal.vix_level(),
            allocation: AllocationReport {
                equity_a: round_to(equity_a, 2),
                equity_b: round_to(equity_b, 2),
                cash: round_to(cash, 2),
            },
            indicators: IndicatorReport {
                ratio: round_to(signal.ratio(), 4),
                price: round_to(signal.price(), 2),
                reference: round_to(signal.reference(), 2),
            },
            rebalance_required: signal.rebalance_required(),
            rebalance_instructions: signal.rebalance_instructions().to_string(),
            timestamps: TimestampReport {
                generated: signal.generated_at(),
                weekly_as_of: signal.weekly_as_of(),
                daily_as_of: signal.daily_as_of(),
            },
        }
    }
}

impl Signal {
    pub fn to_report(&self) -> SignalReport {
        SignalReport::from(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_report())
    }
}
