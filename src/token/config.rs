//! Token deployment configuration
//!
//! The lesson contracts differ only in details (fixed or explicit decimals,
//! supply given in whole tokens or base units, who may mint, revert text).
//! Those details are fields here rather than separate token types.

use crate::core::scale;
use crate::token::error::{RevertStyle, TokenError};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default decimal places
pub const DEFAULT_DECIMALS: u8 = 18;

/// Highest supported decimals; `10^36` still leaves room in a `u128`
pub const MAX_DECIMALS: u8 = 36;

bitflags! {
    /// Optional token capabilities
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TokenFeatures: u8 {
        /// New supply may be minted after deployment
        const MINTABLE = 0b0000_0001;
        /// Holders may burn their own balance
        const BURNABLE = 0b0000_0010;
    }
}

impl Default for TokenFeatures {
    fn default() -> Self {
        TokenFeatures::MINTABLE | TokenFeatures::BURNABLE
    }
}

/// Who may call mint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintPolicy {
    /// Any caller
    #[default]
    Open,
    /// Only the deployer
    OwnerOnly,
}

/// Unit of `initial_supply`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyUnit {
    /// Whole tokens, scaled by `10^decimals` at deployment
    #[default]
    Whole,
    /// Already in base units
    Base,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] TokenError),
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Everything needed to deploy a token
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default)]
    pub initial_supply: u128,
    #[serde(default)]
    pub supply_unit: SupplyUnit,
    #[serde(default)]
    pub features: TokenFeatures,
    #[serde(default)]
    pub mint_policy: MintPolicy,
    #[serde(default)]
    pub revert_style: RevertStyle,
    /// Events kept per token; unbounded when absent
    #[serde(default)]
    pub history_limit: Option<usize>,
}

impl TokenConfig {
    /// Config with the usual defaults: 18 decimals, no initial supply,
    /// mintable and burnable by anyone
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
            initial_supply: 0,
            supply_unit: SupplyUnit::default(),
            features: TokenFeatures::default(),
            mint_policy: MintPolicy::default(),
            revert_style: RevertStyle::default(),
            history_limit: None,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_initial_supply(mut self, amount: u128, unit: SupplyUnit) -> Self {
        self.initial_supply = amount;
        self.supply_unit = unit;
        self
    }

    pub fn with_features(mut self, features: TokenFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_mint_policy(mut self, policy: MintPolicy) -> Self {
        self.mint_policy = policy;
        self
    }

    pub fn with_revert_style(mut self, style: RevertStyle) -> Self {
        self.revert_style = style;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: TokenConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check metadata bounds and that the initial supply is representable
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.name.is_empty() || self.name.chars().count() > 50 {
            return Err(TokenError::InvalidName);
        }
        if self.symbol.is_empty() || self.symbol.chars().count() > 10 {
            return Err(TokenError::InvalidSymbol);
        }
        if self.decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidDecimals);
        }
        self.initial_supply_base_units()?;
        Ok(())
    }

    /// Initial supply in base units
    pub fn initial_supply_base_units(&self) -> Result<u128, TokenError> {
        match self.supply_unit {
            SupplyUnit::Base => Ok(self.initial_supply),
            SupplyUnit::Whole => scale(self.decimals)
                .and_then(|unit| self.initial_supply.checked_mul(unit))
                .ok_or(TokenError::SupplyOverflow {
                    supply: 0,
                    amount: self.initial_supply,
                }),
        }
    }
}
