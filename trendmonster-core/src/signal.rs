//! Signal assembly: snapshot in, immutable [`Signal`] out.
//!
//! [`SignalGenerator`] carries one piece of state, the held allocation. It
//! is set explicitly, read on every `generate`, and never cleared. There is
//! no internal locking; use one generator per caller.

use chrono::{NaiveDateTime, SubsecRound};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::allocation::calculate_allocation_with;
use crate::classify::{classify_trend, classify_volatility_with, determine_posture_with};
use crate::domain::{
    Allocation, AllocationError, MarketSnapshot, Posture, SnapshotError, Trend, VolatilityLevel,
};
use crate::params::StrategyParams;
use crate::rebalance::{diff_with, RebalancePlan};

/// Instruction text when no held allocation has been set.
pub const MISSING_ALLOCATION_MESSAGE: &str =
    "Set current allocation to enable rebalance instructions.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("invalid market snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Complete strategy output for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    trend: Trend,
    posture: Posture,
    vix_level: VolatilityLevel,
    allocation: Allocation,
    ratio: f64,
    price: f64,
    reference: f64,
    rebalance_required: bool,
    rebalance_instructions: String,
    rebalance_plan: Option<RebalancePlan>,
    generated_at: NaiveDateTime,
    weekly_as_of: Option<NaiveDateTime>,
    daily_as_of: Option<NaiveDateTime>,
}

impl Signal {
    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn vix_level(&self) -> VolatilityLevel {
        self.vix_level
    }

    /// Target allocation.
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Volatility ratio cached for display.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }

    pub fn rebalance_required(&self) -> bool {
        self.rebalance_required
    }

    pub fn rebalance_instructions(&self) -> &str {
        &self.rebalance_instructions
    }

    /// Structured diff; `None` when no held allocation was set.
    pub fn rebalance_plan(&self) -> Option<&RebalancePlan> {
        self.rebalance_plan.as_ref()
    }

    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    pub fn weekly_as_of(&self) -> Option<NaiveDateTime> {
        self.weekly_as_of
    }

    pub fn daily_as_of(&self) -> Option<NaiveDateTime> {
        self.daily_as_of
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    params: StrategyParams,
    current_allocation: Option<Allocation>,
}

impl SignalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Params are expected to be validated (see [`StrategyParams::validate`]).
    pub fn with_params(params: StrategyParams) -> Self {
        Self {
            params,
            current_allocation: None,
        }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Record the held allocation. On error the previous value is kept.
    pub fn set_current_allocation(
        &mut self,
        equity_a: f64,
        equity_b: f64,
        cash: f64,
    ) -> Result<(), AllocationError> {
        let allocation = Allocation::new(equity_a, equity_b, cash)?;
        self.current_allocation = Some(allocation);
        Ok(())
    }

    pub fn current_allocation(&self) -> Option<&Allocation> {
        self.current_allocation.as_ref()
    }

    /// Classify, map to a target allocation, diff against the held
    /// allocation and stamp the result with the current local time,
    /// truncated to microseconds.
    pub fn generate(&self, snapshot: &MarketSnapshot) -> Result<Signal, SignalError> {
        let now = chrono::Local::now().naive_local().trunc_subsecs(6);
        self.generate_at(snapshot, now)
    }

    /// [`generate`](Self::generate) with an explicit generation timestamp.
    pub fn generate_at(
        &self,
        snapshot: &MarketSnapshot,
        generated_at: NaiveDateTime,
    ) -> Result<Signal, SignalError> {
        snapshot.check_finite()?;
        let ratio = snapshot.volatility_ratio()?;
        let thresholds = &self.params.thresholds;

        let trend = classify_trend(snapshot.trend_price, snapshot.trend_reference);
        let vix_level = classify_volatility_with(ratio, thresholds);
        let posture = determine_posture_with(trend, ratio, thresholds);
        let target = calculate_allocation_with(trend, ratio, thresholds);

        debug!(
            %trend,
            %vix_level,
            %posture,
            ratio,
            params_hash = %self.params.params_hash().unwrap_or_default(),
            "classified market state"
        );

        let (rebalance_required, rebalance_instructions, rebalance_plan) =
            match &self.current_allocation {
                Some(current) => {
                    let plan = diff_with(current, &target, self.params.rebalance_threshold);
                    let text = plan.instruction_text(&self.params);
                    if plan.required {
                        info!(
                            instructions = plan.instructions.len(),
                            target = %target.describe(|i| self.params.symbol(i)),
                            "rebalance required"
                        );
                    }
                    (plan.required, text, Some(plan))
                }
                None => {
                    warn!("no current allocation set; rebalance instructions unavailable");
                    (true, MISSING_ALLOCATION_MESSAGE.to_string(), None)
                }
            };

        Ok(Signal {
            trend,
            posture,
            vix_level,
            allocation: target,
            ratio,
            price: snapshot.trend_price,
            reference: snapshot.trend_reference,
            rebalance_required,
            rebalance_instructions,
            rebalance_plan,
            generated_at,
            weekly_as_of: snapshot.weekly_as_of,
            daily_as_of: snapshot.daily_as_of,
        })
    }
}
