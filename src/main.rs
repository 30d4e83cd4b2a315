//! ERC-20 ledger CLI application
//!
//! A command-line interface for deploying and operating tokens.

use clap::{Parser, Subcommand};
use erc20_ledger::cli::{self, parse_account, AppState};
use erc20_ledger::core::Address;
use erc20_ledger::token::{MintPolicy, SupplyUnit, TokenConfig, TokenFeatures};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "erc20")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "An ERC-20 token ledger in Rust", long_about = None)]
struct Cli {
    /// Data directory for token storage
    #[arg(short, long, default_value = ".erc20_data")]
    data_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new token
    Deploy {
        /// Token name
        #[arg(short, long)]
        name: Option<String>,

        /// Token symbol
        #[arg(short, long)]
        symbol: Option<String>,

        /// Decimal places
        #[arg(long, default_value = "18")]
        decimals: u8,

        /// Initial supply, in whole tokens unless --base-units is given
        #[arg(long, default_value = "0")]
        supply: u128,

        /// Treat --supply as base units
        #[arg(long)]
        base_units: bool,

        /// Deployer account (hex address or dev:N)
        #[arg(short, long, default_value = "dev:0", value_parser = parse_account)]
        from: Address,

        /// Load the token configuration from a JSON file instead
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only the deployer may mint
        #[arg(long)]
        owner_only_mint: bool,

        /// Disable minting and burning after deployment
        #[arg(long)]
        fixed_supply: bool,
    },

    /// Transfer tokens
    Transfer {
        /// Token contract address
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        /// Sender
        #[arg(short, long, value_parser = parse_account)]
        from: Address,

        /// Recipient
        #[arg(long, value_parser = parse_account)]
        to: Address,

        /// Amount (e.g. 1.5)
        #[arg(short, long)]
        amount: String,
    },

    /// Set a spender's allowance
    Approve {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        /// Owner granting the allowance
        #[arg(short, long, value_parser = parse_account)]
        owner: Address,

        /// Spender receiving the allowance
        #[arg(short, long, value_parser = parse_account)]
        spender: Address,

        /// Amount, or "max" for an infinite allowance
        #[arg(short, long)]
        amount: String,
    },

    /// Transfer on behalf of an owner using an allowance
    TransferFrom {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        /// Account spending the allowance
        #[arg(short, long, value_parser = parse_account)]
        spender: Address,

        /// Owner of the tokens
        #[arg(short, long, value_parser = parse_account)]
        from: Address,

        /// Recipient
        #[arg(long, value_parser = parse_account)]
        to: Address,

        #[arg(short, long)]
        amount: String,
    },

    /// Mint new tokens
    Mint {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        /// Account calling mint
        #[arg(short, long, default_value = "dev:0", value_parser = parse_account)]
        caller: Address,

        /// Recipient
        #[arg(long, value_parser = parse_account)]
        to: Address,

        #[arg(short, long)]
        amount: String,
    },

    /// Burn tokens from an account's own balance
    Burn {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        #[arg(short, long, value_parser = parse_account)]
        from: Address,

        #[arg(short, long)]
        amount: String,
    },

    /// Show a balance
    Balance {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        #[arg(short, long, value_parser = parse_account)]
        address: Address,
    },

    /// Show an allowance
    Allowance {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        #[arg(short, long, value_parser = parse_account)]
        owner: Address,

        #[arg(short, long, value_parser = parse_account)]
        spender: Address,
    },

    /// Show token details
    Info {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,
    },

    /// List deployed tokens
    List,

    /// Show a token's event log
    Events {
        #[arg(short, long, value_parser = parse_account)]
        token: Address,

        /// Only events involving this address
        #[arg(short, long, value_parser = parse_account)]
        address: Option<Address>,

        /// Number of most recent events to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Account helpers
    Accounts {
        #[command(subcommand)]
        action: Option<AccountCommands>,
    },

    /// Export tokens to file
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import tokens from file
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List registry backups
    Backups,

    /// Restore the registry from a backup
    Restore {
        /// Backup index (0 is the most recent)
        #[arg(short, long, default_value = "0")]
        index: usize,
    },

    /// Walk through deploy, transfer, approve, transferFrom, mint and burn
    Demo,
}

#[derive(Subcommand)]
enum AccountCommands {
    /// List development accounts
    List {
        #[arg(short, long, default_value = "5")]
        count: usize,
    },

    /// Generate a random address
    New,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Commands that don't touch stored state
    match &cli.command {
        Commands::Demo => {
            cli::run_demo()?;
            return Ok(());
        }
        Commands::Accounts { action } => {
            return match action {
                None => cli::cmd_accounts(5),
                Some(AccountCommands::List { count }) => cli::cmd_accounts(*count),
                Some(AccountCommands::New) => cli::cmd_new_account(),
            };
        }
        _ => {}
    }

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Demo | Commands::Accounts { .. } => {}

        Commands::Deploy {
            name,
            symbol,
            decimals,
            supply,
            base_units,
            from,
            config,
            owner_only_mint,
            fixed_supply,
        } => {
            let config = match config {
                Some(path) => TokenConfig::from_file(&path)?,
                None => {
                    let name = name.ok_or("--name is required without --config")?;
                    let symbol = symbol.ok_or("--symbol is required without --config")?;
                    let unit = if base_units {
                        SupplyUnit::Base
                    } else {
                        SupplyUnit::Whole
                    };
                    let mut config = TokenConfig::new(name, symbol)
                        .with_decimals(decimals)
                        .with_initial_supply(supply, unit);
                    if owner_only_mint {
                        config = config.with_mint_policy(MintPolicy::OwnerOnly);
                    }
                    if fixed_supply {
                        config = config.with_features(TokenFeatures::empty());
                    }
                    config
                }
            };
            cli::cmd_deploy(&mut state, &config, from)?;
        }

        Commands::Transfer {
            token,
            from,
            to,
            amount,
        } => {
            cli::cmd_transfer(&mut state, &token, from, to, &amount)?;
        }

        Commands::Approve {
            token,
            owner,
            spender,
            amount,
        } => {
            cli::cmd_approve(&mut state, &token, owner, spender, &amount)?;
        }

        Commands::TransferFrom {
            token,
            spender,
            from,
            to,
            amount,
        } => {
            cli::cmd_transfer_from(&mut state, &token, spender, from, to, &amount)?;
        }

        Commands::Mint {
            token,
            caller,
            to,
            amount,
        } => {
            cli::cmd_mint(&mut state, &token, caller, to, &amount)?;
        }

        Commands::Burn {
            token,
            from,
            amount,
        } => {
            cli::cmd_burn(&mut state, &token, from, &amount)?;
        }

        Commands::Balance { token, address } => {
            cli::cmd_balance(&state, &token, &address)?;
        }

        Commands::Allowance {
            token,
            owner,
            spender,
        } => {
            cli::cmd_allowance(&state, &token, &owner, &spender)?;
        }

        Commands::Info { token } => {
            cli::cmd_info(&state, &token)?;
        }

        Commands::List => {
            cli::cmd_list(&state)?;
        }

        Commands::Events {
            token,
            address,
            limit,
        } => {
            cli::cmd_events(&state, &token, address.as_ref(), limit)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }

        Commands::Backups => {
            cli::cmd_backups(&state)?;
        }

        Commands::Restore { index } => {
            cli::cmd_restore(&mut state, index)?;
        }
    }

    Ok(())
}
