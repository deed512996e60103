//! Closed classification states: trend, volatility band, posture.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market trend from the weekly close against its moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Uptrend,
    Downtrend,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Uptrend => "UPTREND",
            Trend::Downtrend => "DOWNTREND",
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Trend::Uptrend)
    }
}

/// Volatility ratio band. Variants are declared in ascending order so
/// `Ord` follows the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLevel {
    /// ratio < T1
    VeryLow,
    /// T1 <= ratio < T2
    Low,
    /// T2 <= ratio < T3
    Moderate,
    /// T3 <= ratio < T4
    Elevated,
    /// ratio >= T4
    High,
}

impl VolatilityLevel {
    pub const ALL: [VolatilityLevel; 5] = [
        VolatilityLevel::VeryLow,
        VolatilityLevel::Low,
        VolatilityLevel::Moderate,
        VolatilityLevel::Elevated,
        VolatilityLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityLevel::VeryLow => "VERY_LOW",
            VolatilityLevel::Low => "LOW",
            VolatilityLevel::Moderate => "MODERATE",
            VolatilityLevel::Elevated => "ELEVATED",
            VolatilityLevel::High => "HIGH",
        }
    }
}

/// Coarse strategic stance.
///
/// Only three uptrend buckets exist here against the five volatility bands;
/// posture reporting is deliberately coarser than the allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Posture {
    /// Downtrend, no equity exposure.
    Cash,
    /// ratio < T2
    Aggressive,
    /// T2 <= ratio <= T4
    Balanced,
    /// ratio > T4
    Defensive,
}

impl Posture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Posture::Cash => "CASH",
            Posture::Aggressive => "AGGRESSIVE",
            Posture::Balanced => "BALANCED",
            Posture::Defensive => "DEFENSIVE",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
