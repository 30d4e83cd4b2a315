//! ERC-20 style fungible tokens
//!
//! Provides a standard interface for fungible tokens with:
//! - Balances per address and a tracked total supply
//! - Allowances for delegated transfers (with an infinite sentinel)
//! - Transfer, approve, transferFrom, mint and burn, each emitting an event
//!
//! # Example
//!
//! ```rust
//! use erc20_ledger::core::{dev_accounts, parse_ether};
//! use erc20_ledger::token::{SupplyUnit, TokenConfig, TokenManager};
//!
//! let accounts = dev_accounts(2);
//! let (deployer, recipient) = (accounts[0], accounts[1]);
//!
//! let mut manager = TokenManager::new();
//! let config = TokenConfig::new("My Token", "MTK")
//!     .with_initial_supply(1_000_000, SupplyUnit::Whole);
//! let token = manager.deploy(&config, deployer).unwrap();
//!
//! let amount = parse_ether("1000").unwrap();
//! manager.transfer(&token, deployer, recipient, amount).unwrap();
//! assert_eq!(manager.balance_of(&token, &recipient).unwrap(), amount);
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod manager;
pub mod token;

pub use config::{ConfigError, MintPolicy, SupplyUnit, TokenConfig, TokenFeatures};
pub use error::{Operation, RevertStyle, TokenError};
pub use event::{EventLog, EventRecord, TokenEvent};
pub use manager::TokenManager;
pub use token::{Token, TokenMetadata, INFINITE_ALLOWANCE};
