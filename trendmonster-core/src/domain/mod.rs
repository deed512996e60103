//! Domain types for the TrendMonster signal core

pub mod allocation;
pub mod snapshot;
pub mod state;

pub use allocation::{Allocation, AllocationError, Instrument, WEIGHT_SUM_TOLERANCE};
pub use snapshot::{MarketSnapshot, SnapshotError};
pub use state::{Posture, Trend, VolatilityLevel};
