//! CLI commands for the token ledger
//!
//! Implements all command handlers for the CLI interface.

use crate::core::{dev_accounts, format_units, parse_units, Address};
use crate::storage::{Storage, StorageConfig};
use crate::token::{
    MintPolicy, Operation, Token, TokenConfig, TokenError, TokenEvent, TokenManager,
    INFINITE_ALLOWANCE,
};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Number of development accounts `dev:N` aliases can refer to
pub const DEV_ACCOUNT_COUNT: usize = 20;

/// Application state
pub struct AppState {
    pub manager: TokenManager,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state, loading any saved registry
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let storage = Storage::new(storage_config)?;
        let manager = storage.load_or_default()?;
        log::debug!("Loaded {} token(s) from {:?}", manager.count(), data_dir);

        Ok(Self {
            manager,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.manager)?;
        Ok(())
    }

    fn token(&self, address: &Address) -> CliResult<&Token> {
        self.manager
            .get(address)
            .ok_or_else(|| TokenError::TokenNotFound(*address).into())
    }
}

/// Parse an account argument: a hex address or `dev:N` for the N-th
/// development account
pub fn parse_account(text: &str) -> Result<Address, String> {
    if let Some(index) = text.strip_prefix("dev:") {
        let index: usize = index
            .parse()
            .map_err(|_| format!("invalid dev account index: {}", index))?;
        if index >= DEV_ACCOUNT_COUNT {
            return Err(format!(
                "dev account index must be below {}",
                DEV_ACCOUNT_COUNT
            ));
        }
        return Ok(dev_accounts(index + 1)[index]);
    }
    text.parse().map_err(|e: crate::core::AddressError| e.to_string())
}

/// Parse a human-readable amount in the token's decimals
fn parse_amount(token: &Token, text: &str) -> CliResult<u128> {
    Ok(parse_units(text, token.decimals())?)
}

fn display_amount(token: &Token, amount: u128) -> String {
    format!("{} {}", format_units(amount, token.decimals()), token.symbol())
}

/// Like `display_amount`, but shows an infinite allowance as `∞`
fn display_allowance(token: &Token, amount: u128) -> String {
    if amount == INFINITE_ALLOWANCE {
        return "∞".to_string();
    }
    display_amount(token, amount)
}

/// Turn a ledger error into the revert string the token reports
fn reverted(token: &Token, err: TokenError, op: Operation) -> Box<dyn std::error::Error> {
    log::warn!("{:?} reverted: {}", op, err);
    format!("reverted: {}", token.revert_reason(&err, op)).into()
}

/// Deploy a new token
pub fn cmd_deploy(state: &mut AppState, config: &TokenConfig, deployer: Address) -> CliResult<()> {
    let address = state.manager.deploy(config, deployer)?;
    state.save()?;

    let token = state.token(&address)?;
    println!("🚀 Token deployed!");
    println!("   📍 Address: {}", address);
    println!("   🏷️  Name: {} ({})", token.name(), token.symbol());
    println!("   🔢 Decimals: {}", token.decimals());
    println!(
        "   💰 Total supply: {}",
        display_amount(token, token.total_supply())
    );
    println!("   👤 Owner: {}", token.owner());
    if token.mint_policy == MintPolicy::OwnerOnly {
        println!("   🔒 Minting restricted to owner");
    }

    Ok(())
}

/// Transfer tokens
pub fn cmd_transfer(
    state: &mut AppState,
    token: &Address,
    from: Address,
    to: Address,
    amount: &str,
) -> CliResult<()> {
    let t = state.token(token)?;
    let value = parse_amount(t, amount)?;
    let shown = display_amount(t, value);

    if let Err(e) = state.manager.transfer(token, from, to, value) {
        return Err(reverted(state.token(token)?, e, Operation::Transfer));
    }
    state.save()?;

    println!("📤 Transferred {}", shown);
    println!("   From: {}", from);
    println!("   To:   {}", to);

    Ok(())
}

/// Set an allowance; `max` grants an infinite allowance
pub fn cmd_approve(
    state: &mut AppState,
    token: &Address,
    owner: Address,
    spender: Address,
    amount: &str,
) -> CliResult<()> {
    let t = state.token(token)?;
    let value = if amount.eq_ignore_ascii_case("max") {
        INFINITE_ALLOWANCE
    } else {
        parse_amount(t, amount)?
    };
    let shown = display_allowance(t, value);

    if let Err(e) = state.manager.approve(token, owner, spender, value) {
        return Err(reverted(state.token(token)?, e, Operation::Approve));
    }
    state.save()?;

    println!("✅ Approved {} to spend {}", spender, shown);
    println!("   Owner: {}", owner);

    Ok(())
}

/// Delegated transfer
pub fn cmd_transfer_from(
    state: &mut AppState,
    token: &Address,
    spender: Address,
    from: Address,
    to: Address,
    amount: &str,
) -> CliResult<()> {
    let t = state.token(token)?;
    let value = parse_amount(t, amount)?;
    let shown = display_amount(t, value);

    if let Err(e) = state.manager.transfer_from(token, spender, from, to, value) {
        return Err(reverted(state.token(token)?, e, Operation::TransferFrom));
    }
    state.save()?;

    let t = state.token(token)?;
    println!("📤 {} moved {}", spender, shown);
    println!("   From: {}", from);
    println!("   To:   {}", to);
    println!(
        "   Remaining allowance: {}",
        display_allowance(t, t.allowance(&from, &spender))
    );

    Ok(())
}

/// Mint new tokens
pub fn cmd_mint(
    state: &mut AppState,
    token: &Address,
    caller: Address,
    to: Address,
    amount: &str,
) -> CliResult<()> {
    let value = parse_amount(state.token(token)?, amount)?;

    if let Err(e) = state.manager.mint(token, caller, to, value) {
        return Err(reverted(state.token(token)?, e, Operation::Mint));
    }
    state.save()?;

    let t = state.token(token)?;
    println!("🪙  Minted {} to {}", display_amount(t, value), to);
    println!("   Total supply: {}", display_amount(t, t.total_supply()));

    Ok(())
}

/// Burn tokens from the caller's balance
pub fn cmd_burn(
    state: &mut AppState,
    token: &Address,
    from: Address,
    amount: &str,
) -> CliResult<()> {
    let value = parse_amount(state.token(token)?, amount)?;

    if let Err(e) = state.manager.burn(token, from, value) {
        return Err(reverted(state.token(token)?, e, Operation::Burn));
    }
    state.save()?;

    let t = state.token(token)?;
    println!("🔥 Burned {} from {}", display_amount(t, value), from);
    println!("   Total supply: {}", display_amount(t, t.total_supply()));

    Ok(())
}

/// Show a holder's balance
pub fn cmd_balance(state: &AppState, token: &Address, holder: &Address) -> CliResult<()> {
    let t = state.token(token)?;
    println!("💰 Balance of {}", holder);
    println!("   {}", display_amount(t, t.balance_of(holder)));
    println!("   ({} base units)", t.balance_of(holder));
    Ok(())
}

/// Show an allowance
pub fn cmd_allowance(
    state: &AppState,
    token: &Address,
    owner: &Address,
    spender: &Address,
) -> CliResult<()> {
    let t = state.token(token)?;
    println!("🔑 Allowance");
    println!("   Owner:   {}", owner);
    println!("   Spender: {}", spender);
    println!(
        "   Amount:  {}",
        display_allowance(t, t.allowance(owner, spender))
    );
    Ok(())
}

/// Show token details and holders
pub fn cmd_info(state: &AppState, token: &Address) -> CliResult<()> {
    let t = state.token(token)?;

    println!("🪙  {} ({})", t.name(), t.symbol());
    println!("   ├─ Address: {}", t.address);
    println!("   ├─ Owner: {}", t.owner());
    println!("   ├─ Decimals: {}", t.decimals());
    println!("   ├─ Total supply: {}", display_amount(t, t.total_supply()));
    println!("   ├─ Features: {:?}", t.features);
    println!("   ├─ Mint policy: {:?}", t.mint_policy);
    println!("   ├─ Events emitted: {}", t.events().emitted());
    println!("   └─ Holders: {}", t.holder_count());

    for (holder, balance) in t.holders().iter().take(10) {
        println!("      └─ {} = {}", holder, display_amount(t, *balance));
    }
    if t.holder_count() > 10 {
        println!("      ... and {} more", t.holder_count() - 10);
    }

    Ok(())
}

/// List deployed tokens
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let tokens = state.manager.list();
    if tokens.is_empty() {
        println!("📭 No tokens deployed yet. Deploy one with: erc20 deploy");
        return Ok(());
    }

    println!("🪙  Deployed tokens ({}):", tokens.len());
    for t in tokens {
        println!(
            "   {} | {:<10} | supply {} | {} holder(s)",
            t.address,
            t.symbol(),
            display_amount(t, t.total_supply()),
            t.holder_count()
        );
    }

    Ok(())
}

/// Show the event log of a token
pub fn cmd_events(
    state: &AppState,
    token: &Address,
    address: Option<&Address>,
    limit: usize,
) -> CliResult<()> {
    let t = state.token(token)?;
    let records: Vec<_> = match address {
        Some(a) => t.events_for(a),
        None => t.events().iter().collect(),
    };

    if records.is_empty() {
        println!("📭 No events");
        return Ok(());
    }

    let skip = records.len().saturating_sub(limit);
    println!("📜 Events ({} of {}):", records.len() - skip, records.len());
    for record in records.into_iter().skip(skip) {
        let detail = match &record.event {
            TokenEvent::Transfer { from, to, amount } => format!(
                "Transfer {} → {} : {}",
                from.short(),
                to.short(),
                display_amount(t, *amount)
            ),
            TokenEvent::Approval {
                owner,
                spender,
                amount,
            } => format!(
                "Approval {} → {} : {}",
                owner.short(),
                spender.short(),
                display_allowance(t, *amount)
            ),
        };
        println!(
            "   #{:<4} {} | {}",
            record.sequence,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            detail
        );
    }

    Ok(())
}

/// Print development accounts
pub fn cmd_accounts(count: usize) -> CliResult<()> {
    let count = count.min(DEV_ACCOUNT_COUNT);
    println!("👥 Development accounts:");
    for (i, account) in dev_accounts(count).iter().enumerate() {
        println!("   dev:{:<3} {}", i, account);
    }
    Ok(())
}

/// Print a fresh random address
pub fn cmd_new_account() -> CliResult<()> {
    println!("🆕 {}", Address::random());
    Ok(())
}

/// Export the registry to a file
pub fn cmd_export(state: &AppState, path: &Path) -> CliResult<()> {
    crate::storage::save_to_file(&state.manager, path)?;
    println!("📦 Tokens exported to {:?}", path);
    Ok(())
}

/// Import a registry from a file, replacing the current one
pub fn cmd_import(state: &mut AppState, path: &Path) -> CliResult<()> {
    let manager = crate::storage::load_from_file(path)?;
    state.manager = manager;
    state.save()?;

    println!("📥 Tokens imported from {:?}", path);
    println!("   Tokens: {}", state.manager.count());
    Ok(())
}

/// List the backups kept next to the registry file
pub fn cmd_backups(state: &AppState) -> CliResult<()> {
    let backups = state.storage.list_backups();
    if backups.is_empty() {
        println!("📭 No backups in {:?}", state.data_dir);
        return Ok(());
    }

    println!("🗄️  Backups (0 is the most recent):");
    for index in backups {
        match state.storage.restore_backup(index) {
            Ok(manager) => println!("   {:<3} {} token(s)", index, manager.count()),
            Err(e) => println!("   {:<3} unreadable: {}", index, e),
        }
    }
    Ok(())
}

/// Replace the current registry with a backup
pub fn cmd_restore(state: &mut AppState, index: usize) -> CliResult<()> {
    let manager = state.storage.restore_backup(index)?;
    state.manager = manager;
    state.save()?;

    println!("♻️  Restored backup {}", index);
    println!("   Tokens: {}", state.manager.count());
    Ok(())
}
