//! ERC20-Ledger: an ERC-20 token ledger in Rust
//!
//! This crate provides the token state machine behind the standard ERC-20
//! interface, plus the pieces needed to drive it from a command line:
//! - Balances, allowances and total supply with atomic operations
//! - Transfer and Approval events with an ordered per-token log
//! - Infinite allowances that are never consumed
//! - Configurable decimals, supply units, mint policy and revert messages
//! - A registry of deployed tokens with JSON persistence and backups
//!
//! # Example
//!
//! ```rust
//! use erc20_ledger::core::Address;
//! use erc20_ledger::token::{SupplyUnit, Token, TokenConfig};
//!
//! let alice = Address::from_seed("alice");
//! let bob = Address::from_seed("bob");
//!
//! let config = TokenConfig::new("Test Token", "TST")
//!     .with_initial_supply(1000, SupplyUnit::Base);
//! let mut token = Token::deploy(Address::from_seed("token"), &config, alice).unwrap();
//!
//! token.transfer(alice, bob, 100).unwrap();
//! assert_eq!(token.balance_of(&alice), 900);
//! assert_eq!(token.balance_of(&bob), 100);
//! assert_eq!(token.total_supply(), 1000);
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use self::core::{Address, UnitsError};
pub use storage::{Storage, StorageConfig};
pub use token::{
    EventRecord, MintPolicy, RevertStyle, SupplyUnit, Token, TokenConfig, TokenError, TokenEvent,
    TokenFeatures, TokenManager, INFINITE_ALLOWANCE,
};
