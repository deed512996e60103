//! Market snapshot: the four confirmed-close inputs plus as-of metadata.
//!
//! Values are trusted as confirmed closes (weekly close for the trend pair,
//! previous daily close for the volatility pair). No staleness checks here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::trailing_sma;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("volatility denominator cannot be zero")]
    ZeroDenominator,

    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("insufficient weekly history: need {needed} closes, got {got}")]
    InsufficientHistory { needed: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Weekly close of the trend instrument.
    pub trend_price: f64,
    /// Moving average the close is compared against.
    pub trend_reference: f64,
    /// Near-term implied volatility index close.
    pub vol_numerator: f64,
    /// Longer-term implied volatility index close. Must be non-zero.
    pub vol_denominator: f64,
    #[serde(default)]
    pub weekly_as_of: Option<NaiveDateTime>,
    #[serde(default)]
    pub daily_as_of: Option<NaiveDateTime>,
}

impl MarketSnapshot {
    pub fn new(
        trend_price: f64,
        trend_reference: f64,
        vol_numerator: f64,
        vol_denominator: f64,
    ) -> Self {
        Self {
            trend_price,
            trend_reference,
            vol_numerator,
            vol_denominator,
            weekly_as_of: None,
            daily_as_of: None,
        }
    }

    /// Build from a weekly close history: the last close is the trend price,
    /// the trailing `period`-week SMA is the reference.
    pub fn from_weekly_closes(
        weekly_closes: &[f64],
        period: usize,
        vol_numerator: f64,
        vol_denominator: f64,
    ) -> Result<Self, SnapshotError> {
        let needed = period.max(1);
        let trend_price = match weekly_closes.last() {
            Some(&close) if weekly_closes.len() >= needed => close,
            _ => {
                return Err(SnapshotError::InsufficientHistory {
                    needed,
                    got: weekly_closes.len(),
                })
            }
        };
        if !trend_price.is_finite() {
            return Err(SnapshotError::NonFinite {
                field: "trend_price",
            });
        }
        let trend_reference = trailing_sma(weekly_closes, needed).ok_or(SnapshotError::NonFinite {
            field: "trend_reference",
        })?;

        Ok(Self::new(
            trend_price,
            trend_reference,
            vol_numerator,
            vol_denominator,
        ))
    }

    pub fn with_weekly_as_of(mut self, as_of: NaiveDateTime) -> Self {
        self.weekly_as_of = Some(as_of);
        self
    }

    pub fn with_daily_as_of(mut self, as_of: NaiveDateTime) -> Self {
        self.daily_as_of = Some(as_of);
        self
    }

    /// Numerator / denominator, computed on demand.
    ///
    /// A zero denominator is a fault, never an infinite ratio. A quotient
    /// that overflows (subnormal denominator) is rejected the same way.
    pub fn volatility_ratio(&self) -> Result<f64, SnapshotError> {
        if self.vol_denominator == 0.0 {
            return Err(SnapshotError::ZeroDenominator);
        }
        let ratio = self.vol_numerator / self.vol_denominator;
        if !ratio.is_finite() {
            return Err(SnapshotError::NonFinite {
                field: "volatility_ratio",
            });
        }
        Ok(ratio)
    }

    /// All four scalar inputs must be finite.
    pub fn check_finite(&self) -> Result<(), SnapshotError> {
        let fields = [
            ("trend_price", self.trend_price),
            ("trend_reference", self.trend_reference),
            ("vol_numerator", self.vol_numerator),
            ("vol_denominator", self.vol_denominator),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some(&(field, _)) => Err(SnapshotError::NonFinite { field }),
            None => Ok(()),
        }
    }
}
