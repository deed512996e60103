//! Rebalance diff: held allocation vs. target allocation.
//!
//! Per-instrument delta = target - current. A delta is material when
//! `|delta| >= threshold`. Instructions are emitted in fixed instrument
//! order (equity A, equity B, cash), never sorted by size. Cash is moved
//! into or deployed from rather than bought or sold.

use serde::{Deserialize, Serialize};

use crate::domain::{Allocation, Instrument};
use crate::params::StrategyParams;

pub const DEFAULT_REBALANCE_THRESHOLD: f64 = 0.001;
pub const NO_ACTION_MESSAGE: &str = "No rebalance required. Current allocation is optimal.";
pub const EXECUTION_NOTICE: &str = "Execute at next market open: ";
pub const INSTRUCTION_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
    MoveToCash,
    DeployFromCash,
}

impl TradeAction {
    fn for_delta(instrument: Instrument, delta: f64) -> Self {
        match (instrument.is_cash(), delta > 0.0) {
            (false, true) => TradeAction::Buy,
            (false, false) => TradeAction::Sell,
            (true, true) => TradeAction::MoveToCash,
            (true, false) => TradeAction::DeployFromCash,
        }
    }

    /// The action moving the same weight the other way.
    pub fn inverse(&self) -> Self {
        match self {
            TradeAction::Buy => TradeAction::Sell,
            TradeAction::Sell => TradeAction::Buy,
            TradeAction::MoveToCash => TradeAction::DeployFromCash,
            TradeAction::DeployFromCash => TradeAction::MoveToCash,
        }
    }
}

/// One material weight change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebalanceInstruction {
    pub instrument: Instrument,
    pub action: TradeAction,
    /// Signed target - current.
    pub delta: f64,
}

impl RebalanceInstruction {
    /// Absolute change as a percentage.
    pub fn percent(&self) -> f64 {
        self.delta.abs() * 100.0
    }

    pub fn describe(&self, symbol: &str) -> String {
        let pct = self.percent();
        match self.action {
            TradeAction::Buy => format!("BUY {pct:.1}% {symbol}"),
            TradeAction::Sell => format!("SELL {pct:.1}% {symbol}"),
            TradeAction::MoveToCash => format!("Move {pct:.1}% to {symbol}"),
            TradeAction::DeployFromCash => format!("Deploy {pct:.1}% from {symbol}"),
        }
    }
}

/// Outcome of a diff. `required` is false iff no instrument moved materially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub required: bool,
    pub instructions: Vec<RebalanceInstruction>,
}

impl RebalancePlan {
    /// One line per instruction, labelled with the configured symbols.
    pub fn instruction_lines(&self, params: &StrategyParams) -> Vec<String> {
        self.instructions
            .iter()
            .map(|i| i.describe(params.symbol(i.instrument)))
            .collect()
    }

    /// Joined instruction string, or the fixed no-action message.
    pub fn instruction_text(&self, params: &StrategyParams) -> String {
        if !self.required {
            return NO_ACTION_MESSAGE.to_string();
        }
        format!(
            "{EXECUTION_NOTICE}{}",
            self.instruction_lines(params).join(INSTRUCTION_SEPARATOR)
        )
    }
}

/// Diff with the default materiality threshold.
pub fn diff(current: &Allocation, target: &Allocation) -> RebalancePlan {
    diff_with(current, target, DEFAULT_REBALANCE_THRESHOLD)
}

pub fn diff_with(current: &Allocation, target: &Allocation, threshold: f64) -> RebalancePlan {
    let instructions: Vec<RebalanceInstruction> = Instrument::ALL
        .iter()
        .filter_map(|&instrument| {
            let delta = target.weight(instrument) - current.weight(instrument);
            (delta.abs() >= threshold).then(|| RebalanceInstruction {
                instrument,
                action: TradeAction::for_delta(instrument, delta),
                delta,
            })
        })
        .collect();

    RebalancePlan {
        required: !instructions.is_empty(),
        instructions,
    }
}

/// `(required, instruction_text)` using the params' threshold and labels.
pub fn generate_rebalance_instructions(
    current: &Allocation,
    target: &Allocation,
    params: &StrategyParams,
) -> (bool, String) {
    let plan = diff_with(current, target, params.rebalance_threshold);
    (plan.required, plan.instruction_text(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(a: f64, b: f64, cash: f64) -> Allocation {
        Allocation::new(a, b, cash).unwrap()
    }

    #[test]
    fn identical_allocations_need_nothing() {
        let held = alloc(0.5, 0.5, 0.0);
        let plan = diff(&held, &held);
        assert!(!plan.required);
        assert!(plan.instructions.is_empty());
        assert_eq!(plan.instruction_text(&StrategyParams::default()), NO_ACTION_MESSAGE);
    }

    #[test]
    fn buy_and_sell_between_equities() {
        let plan = diff(&alloc(0.60, 0.40, 0.0), &alloc(0.50, 0.50, 0.0));
        assert!(plan.required);
        assert_eq!(plan.instructions.len(), 2);
        assert_eq!(plan.instructions[0].instrument, Instrument::EquityA);
        assert_eq!(plan.instructions[0].action, TradeAction::Sell);
        assert_eq!(plan.instructions[1].instrument, Instrument::EquityB);
        assert_eq!(plan.instructions[1].action, TradeAction::Buy);
        assert_eq!(
            plan.instruction_text(&StrategyParams::default()),
            "Execute at next market open: SELL 10.0% SPY | BUY 10.0% TQQQ"
        );
    }

    #[test]
    fn cash_phrasing_when_exiting() {
        let plan = diff(&alloc(0.75, 0.25, 0.0), &Allocation::all_cash());
        assert_eq!(
            plan.instruction_text(&StrategyParams::default()),
            "Execute at next market open: SELL 75.0% SPY | SELL 25.0% TQQQ | Move 100.0% to Cash"
        );
    }

    #[test]
    fn cash_phrasing_when_deploying() {
        let plan = diff(&Allocation::all_cash(), &alloc(0.30, 0.70, 0.0));
        let lines = plan.instruction_lines(&StrategyParams::default());
        assert_eq!(lines, vec!["BUY 30.0% SPY", "BUY 70.0% TQQQ", "Deploy 100.0% from Cash"]);
        assert_eq!(plan.instructions[2].action, TradeAction::DeployFromCash);
    }

    #[test]
    fn order_is_fixed_not_by_magnitude() {
        // equity B moves most, equity A still comes first
        let plan = diff(&alloc(0.5, 0.0, 0.5), &alloc(0.45, 0.55, 0.0));
        let order: Vec<Instrument> = plan.instructions.iter().map(|i| i.instrument).collect();
        assert_eq!(order, Instrument::ALL.to_vec());
    }

    #[test]
    fn immaterial_delta_is_skipped() {
        let plan = diff(&alloc(0.5, 0.4995, 0.0005), &alloc(0.5, 0.5, 0.0));
        assert!(!plan.required);

        let plan = diff(&alloc(0.6, 0.4, 0.0), &alloc(0.5995, 0.3905, 0.01));
        // A moves 0.0005 (skipped), B and cash move ~0.0095/0.01
        let instruments: Vec<Instrument> = plan.instructions.iter().map(|i| i.instrument).collect();
        assert_eq!(instruments, vec![Instrument::EquityB, Instrument::Cash]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let plan = diff_with(&alloc(0.5, 0.5, 0.0), &alloc(0.25, 0.75, 0.0), 0.25);
        assert_eq!(plan.instructions.len(), 2);
    }

    #[test]
    fn configured_labels_in_text() {
        let params = StrategyParams {
            equity_a_symbol: "VTI".into(),
            equity_b_symbol: "UPRO".into(),
            cash_symbol: "T-Bills".into(),
            ..StrategyParams::default()
        };
        let (required, text) =
            generate_rebalance_instructions(&Allocation::all_cash(), &alloc(0.5, 0.5, 0.0), &params);
        assert!(required);
        assert_eq!(
            text,
            "Execute at next market open: BUY 50.0% VTI | BUY 50.0% UPRO | Deploy 100.0% from T-Bills"
        );
    }

    #[test]
    fn inverse_actions() {
        assert_eq!(TradeAction::Buy.inverse(), TradeAction::Sell);
        assert_eq!(TradeAction::MoveToCash.inverse(), TradeAction::DeployFromCash);
        assert_eq!(TradeAction::DeployFromCash.inverse().inverse(), TradeAction::DeployFromCash);
    }
}
