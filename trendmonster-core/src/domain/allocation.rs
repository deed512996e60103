//! Three-instrument allocation with the weight-sum invariant.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Weights must sum to 1.0 within this absolute tolerance.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// The three tracked instruments, in instruction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    EquityA,
    EquityB,
    Cash,
}

impl Instrument {
    /// Fixed emission order for rebalance instructions.
    pub const ALL: [Instrument; 3] = [Instrument::EquityA, Instrument::EquityB, Instrument::Cash];

    pub fn default_symbol(&self) -> &'static str {
        match self {
            Instrument::EquityA => "SPY",
            Instrument::EquityB => "TQQQ",
            Instrument::Cash => "Cash",
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Instrument::Cash)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("weights must sum to 1.0, got {total}")]
    SumMismatch { total: f64 },

    #[error("{instrument:?} weight must be non-negative, got {weight}")]
    NegativeWeight { instrument: Instrument, weight: f64 },

    #[error("{instrument:?} weight must be finite")]
    NonFinite { instrument: Instrument },
}

/// Target or held portfolio weights across equity A, equity B and cash.
///
/// Only constructible through [`Allocation::new`] (or deserialization, which
/// goes through the same check), so every value in circulation satisfies the
/// sum invariant. Never normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AllocationWeights", into = "AllocationWeights")]
pub struct Allocation {
    equity_a: f64,
    equity_b: f64,
    cash: f64,
}

impl Allocation {
    pub fn new(equity_a: f64, equity_b: f64, cash: f64) -> Result<Self, AllocationError> {
        let weights = [
            (Instrument::EquityA, equity_a),
            (Instrument::EquityB, equity_b),
            (Instrument::Cash, cash),
        ];
        for (instrument, weight) in weights {
            if !weight.is_finite() {
                return Err(AllocationError::NonFinite { instrument });
            }
            if weight < 0.0 {
                return Err(AllocationError::NegativeWeight { instrument, weight });
            }
        }

        let total = equity_a + equity_b + cash;
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AllocationError::SumMismatch { total });
        }

        Ok(Self {
            equity_a,
            equity_b,
            cash,
        })
    }

    /// 100% cash.
    pub const fn all_cash() -> Self {
        Self::table_row(0.0, 0.0, 1.0)
    }

    /// Literal rows of the allocation table. Each row is checked against
    /// [`Allocation::new`] in tests.
    pub(crate) const fn table_row(equity_a: f64, equity_b: f64, cash: f64) -> Self {
        Self {
            equity_a,
            equity_b,
            cash,
        }
    }

    pub fn equity_a(&self) -> f64 {
        self.equity_a
    }

    pub fn equity_b(&self) -> f64 {
        self.equity_b
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn weight(&self, instrument: Instrument) -> f64 {
        match instrument {
            Instrument::EquityA => self.equity_a,
            Instrument::EquityB => self.equity_b,
            Instrument::Cash => self.cash,
        }
    }

    /// Weights as percentages (0-100), in instrument order.
    pub fn as_percentages(&self) -> (f64, f64, f64) {
        (self.equity_a * 100.0, self.equity_b * 100.0, self.cash * 100.0)
    }

    /// Human-readable summary using the given instrument labels.
    pub fn describe<'a>(&self, label: impl Fn(Instrument) -> &'a str) -> String {
        let (a, b, cash) = self.as_percentages();
        format!(
            "{}: {a:.0}% | {}: {b:.0}% | {}: {cash:.0}%",
            label(Instrument::EquityA),
            label(Instrument::EquityB),
            label(Instrument::Cash),
        )
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(|i| i.default_symbol()))
    }
}

/// Unvalidated wire form of [`Allocation`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct AllocationWeights {
    equity_a: f64,
    equity_b: f64,
    cash: f64,
}

impl TryFrom<AllocationWeights> for Allocation {
    type Error = AllocationError;

    fn try_from(w: AllocationWeights) -> Result<Self, Self::Error> {
        Allocation::new(w.equity_a, w.equity_b, w.cash)
    }
}

impl From<Allocation> for AllocationWeights {
    fn from(a: Allocation) -> Self {
        Self {
            equity_a: a.equity_a,
            equity_b: a.equity_b,
            cash: a.cash,
        }
    }
}
