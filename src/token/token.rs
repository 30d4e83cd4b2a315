//! ERC-20 token ledger
//!
//! Balances, allowances and total supply for a single token. Every
//! mutating operation validates all of its preconditions before touching
//! state, so a failed call leaves the ledger exactly as it was and a
//! successful one commits its state change together with one event.

use crate::core::Address;
use crate::token::config::{MintPolicy, TokenConfig, TokenFeatures};
use crate::token::error::{Operation, RevertStyle, TokenError};
use crate::token::event::{EventLog, EventRecord, TokenEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allowance value that transfer_from never decrements
pub const INFINITE_ALLOWANCE: u128 = u128::MAX;

/// Token metadata (immutable after deployment)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Token name (e.g., "My Token")
    pub name: String,
    /// Token symbol (e.g., "MTK")
    pub symbol: String,
    /// Decimal places (usually 18)
    pub decimals: u8,
    /// Deployer address
    pub owner: Address,
    /// Timestamp when deployed
    pub created_at: DateTime<Utc>,
}

/// An ERC-20 fungible token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Contract address
    pub address: Address,
    pub metadata: TokenMetadata,
    pub features: TokenFeatures,
    pub mint_policy: MintPolicy,
    pub revert_style: RevertStyle,
    total_supply: u128,
    /// Balances: holder -> amount
    balances: BTreeMap<Address, u128>,
    /// Allowances: owner -> (spender -> amount)
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
    events: EventLog,
}

impl Token {
    /// Deploy a token: validate the config and mint the initial supply to
    /// the deployer, emitting `Transfer(0x0, deployer, supply)`
    pub fn deploy(
        address: Address,
        config: &TokenConfig,
        deployer: Address,
    ) -> Result<Self, TokenError> {
        config.validate()?;
        let supply = config.initial_supply_base_units()?;

        let metadata = TokenMetadata {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            owner: deployer,
            created_at: Utc::now(),
        };

        let mut token = Self {
            address,
            metadata,
            features: config.features,
            mint_policy: config.mint_policy,
            revert_style: config.revert_style,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: EventLog::new(config.history_limit),
        };

        if supply > 0 {
            token.mint(deployer, supply)?;
        }

        Ok(token)
    }

    // =========================================================================
    // ERC-20 View Functions
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn owner(&self) -> Address {
        self.metadata.owner
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of a holder; zero for addresses never credited
    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Amount `spender` may still move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Holders with a non-zero balance, ordered by address
    pub fn holders(&self) -> Vec<(Address, u128)> {
        self.balances
            .iter()
            .filter(|(_, &b)| b > 0)
            .map(|(a, &b)| (*a, b))
            .collect()
    }

    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&b| b > 0).count()
    }

    /// Sum of every balance; equals total supply on a consistent ledger
    pub fn sum_of_balances(&self) -> u128 {
        self.balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    /// Whether balances add up to the recorded total supply
    pub fn is_consistent(&self) -> bool {
        self.sum_of_balances() == self.total_supply
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Kept events naming `address` as sender, recipient, owner or spender
    pub fn events_for(&self, address: &Address) -> Vec<&EventRecord> {
        self.events.involving(address)
    }

    /// Revert string this token reports for a failed operation
    pub fn revert_reason(&self, err: &TokenError, op: Operation) -> String {
        err.revert_reason(op, self.revert_style)
    }

    // =========================================================================
    // ERC-20 Mutating Functions
    // =========================================================================

    /// Move `amount` from `from` to `to`
    ///
    /// Zero amounts and `from == to` are valid and still emit Transfer.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        self.check_endpoints(&from, &to)?;
        self.check_balance(&from, amount)?;

        self.move_balance(from, to, amount);
        log::debug!(
            "{}: transfer {} from {} to {}",
            self.metadata.symbol,
            amount,
            from.short(),
            to.short()
        );

        Ok(self.emit(TokenEvent::Transfer { from, to, amount }))
    }

    /// Set the allowance of `spender` over `owner`'s balance, replacing any
    /// previous value
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender(spender));
        }

        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
        log::debug!(
            "{}: approve {} for {} over {}",
            self.metadata.symbol,
            amount,
            spender.short(),
            owner.short()
        );

        Ok(self.emit(TokenEvent::Approval {
            owner,
            spender,
            amount,
        }))
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance unless it is [`INFINITE_ALLOWANCE`]
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        self.check_endpoints(&from, &to)?;

        let allowance = self.allowance(&from, &spender);
        if allowance != INFINITE_ALLOWANCE && allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                spender,
                have: allowance,
                need: amount,
            });
        }

        self.check_balance(&from, amount)?;

        if allowance != INFINITE_ALLOWANCE && amount > 0 {
            self.allowances
                .entry(from)
                .or_default()
                .insert(spender, allowance - amount);
        }

        self.move_balance(from, to, amount);
        log::debug!(
            "{}: {} moved {} from {} to {}",
            self.metadata.symbol,
            spender.short(),
            amount,
            from.short(),
            to.short()
        );

        Ok(self.emit(TokenEvent::Transfer { from, to, amount }))
    }

    /// Create `amount` new tokens for `to`
    pub fn mint(&mut self, to: Address, amount: u128) -> Result<EventRecord, TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient(to));
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow {
                supply: self.total_supply,
                amount,
            })?;

        self.total_supply = new_supply;
        // Cannot overflow: every balance is bounded by total supply
        *self.balances.entry(to).or_insert(0) += amount;
        log::debug!(
            "{}: mint {} to {}",
            self.metadata.symbol,
            amount,
            to.short()
        );

        Ok(self.emit(TokenEvent::Transfer {
            from: Address::ZERO,
            to,
            amount,
        }))
    }

    /// Destroy `amount` of `from`'s tokens
    pub fn burn(&mut self, from: Address, amount: u128) -> Result<EventRecord, TokenError> {
        if from.is_zero() {
            return Err(TokenError::InvalidSender(from));
        }
        self.check_balance(&from, amount)?;

        if amount > 0 {
            *self.balances.entry(from).or_insert(0) -= amount;
            self.total_supply -= amount;
        }
        log::debug!(
            "{}: burn {} from {}",
            self.metadata.symbol,
            amount,
            from.short()
        );

        Ok(self.emit(TokenEvent::Transfer {
            from,
            to: Address::ZERO,
            amount,
        }))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_endpoints(&self, from: &Address, to: &Address) -> Result<(), TokenError> {
        if from.is_zero() {
            return Err(TokenError::InvalidSender(*from));
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient(*to));
        }
        Ok(())
    }

    fn check_balance(&self, account: &Address, amount: u128) -> Result<(), TokenError> {
        let have = self.balance_of(account);
        if have < amount {
            return Err(TokenError::InsufficientBalance {
                account: *account,
                have,
                need: amount,
            });
        }
        Ok(())
    }

    /// Caller must have checked the sender's balance
    fn move_balance(&mut self, from: Address, to: Address, amount: u128) {
        if amount == 0 || from == to {
            return;
        }
        *self.balances.entry(from).or_insert(0) -= amount;
        *self.balances.entry(to).or_insert(0) += amount;
    }

    fn emit(&mut self, event: TokenEvent) -> EventRecord {
        self.events.push(self.address, event)
    }
}
