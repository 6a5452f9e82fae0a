//! Genesis configuration for a GenBit exchange.
//!
//! Everything here is fixed at initialization. Defaults come from
//! [`crate::constants`].

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Amount, GenbitError, Result, constants};

/// How the effective tax rate decays as adoption (cumulative volume) grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxDecay {
    /// The rate stays at the ceiling forever.
    Constant,
    /// `rate = max * h / (h + progress)`: half the ceiling once `h` has traded.
    Hyperbolic { half_volume: Amount },
    /// `rate = max * (1 - progress / z)`, zero from `z` onward.
    Linear { zero_volume: Amount },
}

impl Default for TaxDecay {
    fn default() -> Self {
        Self::Hyperbolic {
            half_volume: Amount::from_tokens(constants::DEFAULT_TAX_HALF_VOLUME_TOKENS),
        }
    }
}

/// Tax ceiling and decay curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// Initial ceiling, in percent.
    pub max_rate: Decimal,
    pub decay: TaxDecay,
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self {
            max_rate: Decimal::from(constants::DEFAULT_MAX_TAX_RATE_PCT),
            decay: TaxDecay::default(),
        }
    }
}

/// Reserve thresholds for the liquidity controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPolicy {
    pub initial_reserve: Amount,
    /// Injection triggers strictly below this level.
    pub floor: Amount,
    /// Level an injection restores the reserve to. Must exceed `floor`.
    pub target: Amount,
}

impl Default for LiquidityPolicy {
    fn default() -> Self {
        Self {
            initial_reserve: Amount::from_tokens(constants::DEFAULT_INITIAL_RESERVE_TOKENS),
            floor: Amount::from_tokens(constants::RESERVE_FLOOR_TOKENS),
            target: Amount::from_tokens(constants::DEFAULT_RESERVE_TARGET_TOKENS),
        }
    }
}

/// Voting preconditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernancePolicy {
    /// Balance a voter must hold when casting. Zero disables the check.
    pub min_voting_balance: Amount,
}

/// Full genesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Minted to the owner at initialization.
    pub total_supply: Amount,
    pub tax: TaxSchedule,
    pub liquidity: LiquidityPolicy,
    pub governance: GovernancePolicy,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            total_supply: Amount::from_tokens(constants::GENESIS_SUPPLY_TOKENS),
            tax: TaxSchedule::default(),
            liquidity: LiquidityPolicy::default(),
            governance: GovernancePolicy::default(),
        }
    }
}

impl GenesisConfig {
    /// Reject configurations no exchange could run with.
    pub fn validate(&self) -> Result<()> {
        if self.total_supply.is_zero() {
            return Err(GenbitError::Configuration("total_supply must be positive".into()));
        }
        let ceiling = Decimal::from(constants::TAX_RATE_CEILING_PCT);
        if self.tax.max_rate.is_sign_negative() || self.tax.max_rate > ceiling {
            return Err(GenbitError::Configuration(format!(
                "tax.max_rate {} outside [0, {ceiling}]",
                self.tax.max_rate
            )));
        }
        match self.tax.decay {
            TaxDecay::Hyperbolic { half_volume } if half_volume.is_zero() => {
                return Err(GenbitError::Configuration("tax.decay.half_volume must be positive".into()));
            }
            TaxDecay::Linear { zero_volume } if zero_volume.is_zero() => {
                return Err(GenbitError::Configuration("tax.decay.zero_volume must be positive".into()));
            }
            _ => {}
        }
        if self.liquidity.target <= self.liquidity.floor {
            return Err(GenbitError::Configuration(format!(
                "liquidity.target {} must exceed liquidity.floor {}",
                self.liquidity.target, self.liquidity.floor
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = GenesisConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.total_supply, Amount::from_tokens(21_000_000));
        assert_eq!(cfg.tax.max_rate, Decimal::from(4));
        assert_eq!(cfg.liquidity.floor, Amount::from_tokens(20_000));
        assert!(cfg.governance.min_voting_balance.is_zero());
    }

    #[test]
    fn rejects_target_not_above_floor() {
        let mut cfg = GenesisConfig::default();
        cfg.liquidity.target = cfg.liquidity.floor;
        assert!(matches!(cfg.validate(), Err(GenbitError::Configuration(_))));
    }

    #[test]
    fn rejects_excessive_tax_ceiling() {
        let mut cfg = GenesisConfig::default();
        cfg.tax.max_rate = Decimal::from(26);
        assert!(matches!(cfg.validate(), Err(GenbitError::Configuration(_))));
        cfg.tax.max_rate = Decimal::from(-1);
        assert!(matches!(cfg.validate(), Err(GenbitError::Configuration(_))));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = GenesisConfig::from_json_str(
            r#"{ "tax": { "max_rate": "3", "decay": { "kind": "linear", "zero_volume": "5000000000000000000000" } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.tax.max_rate, Decimal::from(3));
        assert_eq!(
            cfg.tax.decay,
            TaxDecay::Linear {
                zero_volume: Amount::from_tokens(5000)
            }
        );
        assert_eq!(cfg.total_supply, Amount::from_tokens(21_000_000));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = GenesisConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = GenesisConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = GenesisConfig::load("/nonexistent/genbit.json").unwrap_err();
        assert!(matches!(err, GenbitError::Io(_)));
    }
}
