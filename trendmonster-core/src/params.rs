//! Strategy parameters: volatility thresholds, SMA length, rebalance
//! materiality and instrument labels.
//!
//! Loaded from TOML; every field falls back to the published default, so a
//! file only needs the values it overrides:
//!
//! ```toml
//! sma_weeks = 50
//! rebalance_threshold = 0.001
//!
//! [thresholds]
//! very_low = 0.80
//! low = 0.90
//! moderate = 0.95
//! elevated = 1.05
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::Instrument;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read params file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid params TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize params: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to encode params for hashing: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("volatility thresholds must be finite")]
    NonFiniteThreshold,

    #[error(
        "volatility thresholds must be strictly ascending, got {very_low} / {low} / {moderate} / {elevated}"
    )]
    ThresholdsNotAscending {
        very_low: f64,
        low: f64,
        moderate: f64,
        elevated: f64,
    },

    #[error("sma_weeks must be >= 1")]
    InvalidSmaPeriod,

    #[error("rebalance_threshold must be finite and > 0, got {0}")]
    InvalidRebalanceThreshold(f64),

    #[error("{0} must not be empty")]
    EmptySymbol(&'static str),
}

/// Four ascending cut points T1 < T2 < T3 < T4 on the volatility ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityThresholds {
    /// T1: below is VERY_LOW.
    pub very_low: f64,
    /// T2: below is at most LOW; also the AGGRESSIVE posture cut.
    pub low: f64,
    /// T3: below is at most MODERATE.
    pub moderate: f64,
    /// T4: at or above is HIGH; strictly above is DEFENSIVE posture.
    pub elevated: f64,
}

impl VolatilityThresholds {
    pub const DEFAULT: VolatilityThresholds = VolatilityThresholds {
        very_low: 0.80,
        low: 0.90,
        moderate: 0.95,
        elevated: 1.05,
    };

    pub fn validate(&self) -> Result<(), ParamsError> {
        let cuts = [self.very_low, self.low, self.moderate, self.elevated];
        if cuts.iter().any(|t| !t.is_finite()) {
            return Err(ParamsError::NonFiniteThreshold);
        }
        if cuts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ParamsError::ThresholdsNotAscending {
                very_low: self.very_low,
                low: self.low,
                moderate: self.moderate,
                elevated: self.elevated,
            });
        }
        Ok(())
    }
}

impl Default for VolatilityThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Length of the weekly trend SMA.
    pub sma_weeks: usize,
    /// Per-instrument absolute weight change below which no trade is emitted.
    pub rebalance_threshold: f64,
    pub equity_a_symbol: String,
    pub equity_b_symbol: String,
    pub cash_symbol: String,
    pub thresholds: VolatilityThresholds,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            sma_weeks: 50,
            rebalance_threshold: 0.001,
            equity_a_symbol: Instrument::EquityA.default_symbol().to_string(),
            equity_b_symbol: Instrument::EquityB.default_symbol().to_string(),
            cash_symbol: Instrument::Cash.default_symbol().to_string(),
            thresholds: VolatilityThresholds::DEFAULT,
        }
    }
}

impl StrategyParams {
    /// Parse and validate params from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ParamsError> {
        let params: StrategyParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate params from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ParamsError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ParamsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        self.thresholds.validate()?;
        if self.sma_weeks == 0 {
            return Err(ParamsError::InvalidSmaPeriod);
        }
        if !self.rebalance_threshold.is_finite() || self.rebalance_threshold <= 0.0 {
            return Err(ParamsError::InvalidRebalanceThreshold(
                self.rebalance_threshold,
            ));
        }
        let symbols = [
            ("equity_a_symbol", &self.equity_a_symbol),
            ("equity_b_symbol", &self.equity_b_symbol),
            ("cash_symbol", &self.cash_symbol),
        ];
        if let Some((name, _)) = symbols.iter().find(|(_, s)| s.trim().is_empty()) {
            return Err(ParamsError::EmptySymbol(*name));
        }
        Ok(())
    }

    /// Display label for an instrument.
    pub fn symbol(&self, instrument: Instrument) -> &str {
        match instrument {
            Instrument::EquityA => &self.equity_a_symbol,
            Instrument::EquityB => &self.equity_b_symbol,
            Instrument::Cash => &self.cash_symbol,
        }
    }

    /// Deterministic identity of this parameter set: blake3 over the
    /// canonical JSON, truncated to 16 hex chars.
    pub fn params_hash(&self) -> Result<String, ParamsError> {
        let json = serde_json::to_string(self)?;
        let hex = blake3::hash(json.as_bytes()).to_hex();
        Ok(hex.as_str()[..16].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = StrategyParams::default();
        params.validate().unwrap();
        assert_eq!(params.sma_weeks, 50);
        assert_eq!(params.rebalance_threshold, 0.001);
        assert_eq!(params.thresholds, VolatilityThresholds::DEFAULT);
        assert_eq!(params.symbol(Instrument::EquityB), "TQQQ");
    }

    #[test]
    fn empty_toml_is_default() {
        let params = StrategyParams::from_toml("").unwrap();
        assert_eq!(params, StrategyParams::default());
    }

    #[test]
    fn partial_override() {
        let params = StrategyParams::from_toml(
            r#"
equity_b_symbol = "UPRO"

[thresholds]
elevated = 1.10
"#,
        )
        .unwrap();
        assert_eq!(params.equity_b_symbol, "UPRO");
        assert_eq!(params.equity_a_symbol, "SPY");
        assert_eq!(params.thresholds.elevated, 1.10);
        assert_eq!(params.thresholds.very_low, 0.80);
    }

    #[test]
    fn rejects_non_ascending_thresholds() {
        let err = StrategyParams::from_toml(
            r#"
[thresholds]
very_low = 0.80
low = 0.80
moderate = 0.95
elevated = 1.05
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ParamsError::ThresholdsNotAscending { .. }));
    }

    #[test]
    fn rejects_zero_sma() {
        let err = StrategyParams::from_toml("sma_weeks = 0").unwrap_err();
        assert!(matches!(err, ParamsError::InvalidSmaPeriod));
    }

    #[test]
    fn rejects_bad_rebalance_threshold() {
        let err = StrategyParams::from_toml("rebalance_threshold = -0.5").unwrap_err();
        assert!(matches!(err, ParamsError::InvalidRebalanceThreshold(_)));
    }

    #[test]
    fn rejects_empty_symbol() {
        let err = StrategyParams::from_toml(r#"cash_symbol = " ""#).unwrap_err();
        assert!(matches!(err, ParamsError::EmptySymbol("cash_symbol")));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = StrategyParams::from_toml("sma_weeks = \"fifty\"").unwrap_err();
        assert!(matches!(err, ParamsError::Parse(_)));
    }

    #[test]
    fn toml_round_trip() {
        let params = StrategyParams::default();
        let text = params.to_toml().unwrap();
        assert_eq!(StrategyParams::from_toml(&text).unwrap(), params);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StrategyParams::from_file(Path::new("/nonexistent/params.toml")).unwrap_err();
        assert!(matches!(err, ParamsError::Io { .. }));
    }

    #[test]
    fn params_hash_deterministic_and_sensitive() {
        let a = StrategyParams::default();
        let mut b = a.clone();
        assert_eq!(a.params_hash().unwrap(), b.params_hash().unwrap());
        assert_eq!(a.params_hash().unwrap().len(), 16);

        b.thresholds.low = 0.91;
        assert_ne!(a.params_hash().unwrap(), b.params_hash().unwrap());
    }

    #[test]
    fn params_hash_is_blake3_of_json() {
        let params = StrategyParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let expected = blake3::hash(json.as_bytes()).to_hex().as_str()[..16].to_string();
        assert_eq!(params.params_hash().unwrap(), expected);
    }

    #[test]
    fn params_hash_separates_nearby_floats() {
        let a = StrategyParams::default();
        let mut b = a.clone();
        b.thresholds.low = 0.9000000000000001;
        assert_ne!(a.params_hash().unwrap(), b.params_hash().unwrap());
    }
}
