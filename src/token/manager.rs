//! Token manager for deploying and operating tokens
//!
//! Holds every deployed token by contract address and applies caller-level
//! policy (mint permissions, disabled features) before handing operations
//! to the ledger.

use crate::core::Address;
use crate::crypto::sha256_concat;
use crate::token::config::{MintPolicy, TokenConfig, TokenFeatures};
use crate::token::error::TokenError;
use crate::token::event::EventRecord;
use crate::token::token::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Manages all tokens in the system
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenManager {
    /// All tokens by contract address
    tokens: BTreeMap<Address, Token>,
    /// Deployment counter for address generation
    nonce: u64,
}

impl TokenManager {
    /// Create a new token manager
    pub fn new() -> Self {
        Self {
            tokens: BTreeMap::new(),
            nonce: 0,
        }
    }

    /// Deploy a new token owned by `deployer`
    ///
    /// The initial supply is minted to the deployer.
    pub fn deploy(
        &mut self,
        config: &TokenConfig,
        deployer: Address,
    ) -> Result<Address, TokenError> {
        let address = self.generate_address(&deployer);

        if self.tokens.contains_key(&address) {
            return Err(TokenError::TokenAlreadyExists(address));
        }

        let token = Token::deploy(address, config, deployer)?;
        self.nonce += 1;

        log::info!(
            "Token deployed: {} ({}) at {}, supply {}",
            token.name(),
            token.symbol(),
            address,
            token.total_supply()
        );

        self.tokens.insert(address, token);
        Ok(address)
    }

    /// Contract address from deployer and deployment nonce
    fn generate_address(&self, deployer: &Address) -> Address {
        let nonce = self.nonce.to_be_bytes();
        let digest = sha256_concat(&[deployer.as_bytes().as_slice(), nonce.as_slice()]);
        Address::from_digest(&digest)
    }

    /// Get a token by address
    pub fn get(&self, address: &Address) -> Option<&Token> {
        self.tokens.get(address)
    }

    fn token(&self, address: &Address) -> Result<&Token, TokenError> {
        self.tokens
            .get(address)
            .ok_or(TokenError::TokenNotFound(*address))
    }

    fn token_mut(&mut self, address: &Address) -> Result<&mut Token, TokenError> {
        self.tokens
            .get_mut(address)
            .ok_or(TokenError::TokenNotFound(*address))
    }

    /// List all tokens
    pub fn list(&self) -> Vec<&Token> {
        self.tokens.values().collect()
    }

    /// Get token count
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if a token exists
    pub fn exists(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    /// Transfer tokens
    pub fn transfer(
        &mut self,
        token: &Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        self.token_mut(token)?.transfer(from, to, amount)
    }

    /// Approve spender
    pub fn approve(
        &mut self,
        token: &Address,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        self.token_mut(token)?.approve(owner, spender, amount)
    }

    /// Transfer from (delegated transfer)
    pub fn transfer_from(
        &mut self,
        token: &Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        self.token_mut(token)?
            .transfer_from(spender, from, to, amount)
    }

    /// Mint new tokens, subject to the token's mint policy
    pub fn mint(
        &mut self,
        token: &Address,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        let token = self.token_mut(token)?;

        if !token.features.contains(TokenFeatures::MINTABLE) {
            log::warn!("Mint rejected on {}: minting disabled", token.address);
            return Err(TokenError::MintingDisabled);
        }
        if token.mint_policy == MintPolicy::OwnerOnly && caller != token.owner() {
            log::warn!(
                "Mint rejected on {}: {} is not the owner",
                token.address,
                caller
            );
            return Err(TokenError::Unauthorized(caller));
        }

        token.mint(to, amount)
    }

    /// Burn tokens from the caller's own balance
    pub fn burn(
        &mut self,
        token: &Address,
        caller: Address,
        amount: u128,
    ) -> Result<EventRecord, TokenError> {
        let token = self.token_mut(token)?;

        if !token.features.contains(TokenFeatures::BURNABLE) {
            log::warn!("Burn rejected on {}: burning disabled", token.address);
            return Err(TokenError::BurningDisabled);
        }

        token.burn(caller, amount)
    }

    /// Get balance for an address in a specific token
    pub fn balance_of(&self, token: &Address, holder: &Address) -> Result<u128, TokenError> {
        Ok(self.token(token)?.balance_of(holder))
    }

    /// Get allowance
    pub fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<u128, TokenError> {
        Ok(self.token(token)?.allowance(owner, spender))
    }

    /// Get all tokens held by an address
    pub fn tokens_for_holder(&self, holder: &Address) -> Vec<(&Token, u128)> {
        self.tokens
            .values()
            .filter_map(|token| {
                let balance = token.balance_of(holder);
                if balance > 0 {
                    Some((token, balance))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Get the event history for a token
    pub fn events(&self, token: &Address) -> Result<Vec<EventRecord>, TokenError> {
        Ok(self.token(token)?.events().iter().cloned().collect())
    }

    /// Tokens whose balances no longer add up to their total supply
    pub fn inconsistent_tokens(&self) -> Vec<Address> {
        self.tokens
            .values()
            .filter(|t| !t.is_consistent())
            .map(|t| t.address)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::config::SupplyUnit;

    fn creator() -> Address {
        Address::from_seed("creator")
    }

    fn test_config() -> TokenConfig {
        TokenConfig::new("Test Token", "TST").with_initial_supply(1_000_000, SupplyUnit::Base)
    }

    #[test]
    fn test_manager_creation() {
        let manager = TokenManager::new();
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_token_deployment() {
        let mut manager = TokenManager::new();

        let address = manager.deploy(&test_config(), creator()).unwrap();

        assert!(!address.is_zero());
        assert!(manager.exists(&address));
        assert_eq!(manager.balance_of(&address, &creator()).unwrap(), 1_000_000);
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_addresses_are_unique_per_deployment() {
        let mut manager = TokenManager::new();

        let first = manager.deploy(&test_config(), creator()).unwrap();
        let second = manager.deploy(&test_config(), creator()).unwrap();

        assert_ne!(first, second);
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_invalid_config_does_not_consume_nonce() {
        let mut manager = TokenManager::new();
        let bad = TokenConfig::new("", "TST");

        assert_eq!(
            manager.deploy(&bad, creator()),
            Err(TokenError::InvalidName)
        );

        let mut fresh = TokenManager::new();
        assert_eq!(
            manager.deploy(&test_config(), creator()).unwrap(),
            fresh.deploy(&test_config(), creator()).unwrap()
        );
    }

    #[test]
    fn test_transfer_via_manager() {
        let mut manager = TokenManager::new();
        let token = manager.deploy(&test_config(), creator()).unwrap();
        let recipient = Address::from_seed("recipient");

        manager
            .transfer(&token, creator(), recipient, 1000)
            .unwrap();

        assert_eq!(manager.balance_of(&token, &creator()).unwrap(), 999_000);
        assert_eq!(manager.balance_of(&token, &recipient).unwrap(), 1000);
    }

    #[test]
    fn test_approve_and_transfer_from() {
        let mut manager = TokenManager::new();
        let token = manager.deploy(&test_config(), creator()).unwrap();
        let spender = Address::from_seed("spender");
        let recipient = Address::from_seed("recipient");

        manager.approve(&token, creator(), spender, 5000).unwrap();
        assert_eq!(
            manager.allowance(&token, &creator(), &spender).unwrap(),
            5000
        );

        manager
            .transfer_from(&token, spender, creator(), recipient, 1000)
            .unwrap();

        assert_eq!(manager.balance_of(&token, &creator()).unwrap(), 999_000);
        assert_eq!(manager.balance_of(&token, &recipient).unwrap(), 1000);
        assert_eq!(
            manager.allowance(&token, &creator(), &spender).unwrap(),
            4000
        );
    }

    #[test]
    fn test_owner_only_mint() {
        let mut manager = TokenManager::new();
        let config = test_config().with_mint_policy(MintPolicy::OwnerOnly);
        let token = manager.deploy(&config, creator()).unwrap();
        let stranger = Address::from_seed("stranger");

        assert_eq!(
            manager.mint(&token, stranger, stranger, 10),
            Err(TokenError::Unauthorized(stranger))
        );
        assert_eq!(manager.balance_of(&token, &stranger).unwrap(), 0);

        manager.mint(&token, creator(), stranger, 10).unwrap();
        assert_eq!(manager.balance_of(&token, &stranger).unwrap(), 10);
    }

    #[test]
    fn test_open_mint() {
        let mut manager = TokenManager::new();
        let token = manager.deploy(&test_config(), creator()).unwrap();
        let anyone = Address::from_seed("anyone");

        manager.mint(&token, anyone, anyone, 7).unwrap();
        assert_eq!(manager.get(&token).unwrap().total_supply(), 1_000_007);
    }

    #[test]
    fn test_disabled_features() {
        let mut manager = TokenManager::new();
        let config = test_config().with_features(TokenFeatures::empty());
        let token = manager.deploy(&config, creator()).unwrap();

        assert_eq!(
            manager.mint(&token, creator(), creator(), 1),
            Err(TokenError::MintingDisabled)
        );
        assert_eq!(
            manager.burn(&token, creator(), 1),
            Err(TokenError::BurningDisabled)
        );
        assert_eq!(manager.get(&token).unwrap().total_supply(), 1_000_000);
    }

    #[test]
    fn test_burn_via_manager() {
        let mut manager = TokenManager::new();
        let token = manager.deploy(&test_config(), creator()).unwrap();

        manager.burn(&token, creator(), 1000).unwrap();

        assert_eq!(manager.balance_of(&token, &creator()).unwrap(), 999_000);
        assert_eq!(manager.get(&token).unwrap().total_supply(), 999_000);
    }

    #[test]
    fn test_tokens_for_holder() {
        let mut manager = TokenManager::new();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");

        let token1 = manager
            .deploy(
                &TokenConfig::new("Token1", "TK1").with_initial_supply(1000, SupplyUnit::Base),
                alice,
            )
            .unwrap();
        manager
            .deploy(
                &TokenConfig::new("Token2", "TK2").with_initial_supply(2000, SupplyUnit::Base),
                alice,
            )
            .unwrap();

        assert_eq!(manager.tokens_for_holder(&alice).len(), 2);
        assert!(manager.tokens_for_holder(&bob).is_empty());

        manager.transfer(&token1, alice, bob, 500).unwrap();

        let bob_tokens = manager.tokens_for_holder(&bob);
        assert_eq!(bob_tokens.len(), 1);
        assert_eq!(bob_tokens[0].1, 500);
    }

    #[test]
    fn test_events_via_manager() {
        let mut manager = TokenManager::new();
        let token = manager.deploy(&test_config(), creator()).unwrap();
        manager
            .transfer(&token, creator(), Address::from_seed("x"), 1)
            .unwrap();

        let events = manager.events(&token).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 0);
        assert_eq!(events[1].sequence, 1);
        assert!(manager.inconsistent_tokens().is_empty());
    }

    #[test]
    fn test_unknown_token() {
        let mut manager = TokenManager::new();
        let missing = Address::from_seed("missing");

        let result = manager.transfer(&missing, creator(), Address::from_seed("to"), 100);
        assert_eq!(result, Err(TokenError::TokenNotFound(missing)));
        assert!(matches!(
            manager.balance_of(&missing, &creator()),
            Err(TokenError::TokenNotFound(_))
        ));
    }
}
