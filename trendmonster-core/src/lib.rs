//! TrendMonster Core — tactical allocation signal from a trend filter and a
//! volatility ratio.
//!
//! Pipeline, strictly one-way:
//! - Trend classifier: weekly close vs. its moving average
//! - Volatility classifier: near-term / longer-term implied volatility ratio
//!   bucketed into five ordered bands
//! - Posture and allocation mapper: fixed lookup table
//! - Rebalance diff: held vs. target weights, ordered instructions
//! - Signal assembler: stateful generator holding the current allocation
//!
//! No I/O beyond optional params loading; the caller supplies confirmed
//! closes.

pub mod allocation;
pub mod classify;
pub mod domain;
pub mod indicators;
pub mod params;
pub mod quick;
pub mod rebalance;
pub mod report;
pub mod signal;

pub use allocation::{allocation_for, calculate_allocation, calculate_allocation_with};
pub use classify::{
    classify_trend, classify_volatility, classify_volatility_with, determine_posture,
    determine_posture_with,
};
pub use domain::{
    Allocation, AllocationError, Instrument, MarketSnapshot, Posture, SnapshotError, Trend,
    VolatilityLevel,
};
pub use params::{ParamsError, StrategyParams, VolatilityThresholds};
pub use rebalance::{diff, diff_with, RebalanceInstruction, RebalancePlan, TradeAction};
pub use report::SignalReport;
pub use signal::{Signal, SignalError, SignalGenerator};
