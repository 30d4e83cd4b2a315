//! Guided walkthrough of the token lifecycle
//!
//! Deploys a token on a throwaway registry and exercises every operation
//! in turn, printing balances after each step.

use crate::cli::commands::CliResult;
use crate::core::{dev_accounts, format_ether, parse_ether, Address};
use crate::token::{SupplyUnit, TokenConfig, TokenManager};

fn print_balances(
    manager: &TokenManager,
    token: &Address,
    accounts: &[(&str, Address)],
) -> CliResult<()> {
    for (label, account) in accounts {
        println!(
            "   {:<10} {} MTT",
            label,
            format_ether(manager.balance_of(token, account)?)
        );
    }
    Ok(())
}

/// Run the walkthrough and return the final registry
pub fn run_demo() -> CliResult<TokenManager> {
    let accounts = dev_accounts(2);
    let (deployer, recipient) = (accounts[0], accounts[1]);
    let spender = recipient;

    println!("🚀 Deploying ERC-20 token...");
    println!("   Deployer: {}", deployer);

    let mut manager = TokenManager::new();
    let config = TokenConfig::new("My Test Token", "MTT")
        .with_initial_supply(1_000_000, SupplyUnit::Whole);
    let token = manager.deploy(&config, deployer)?;

    {
        let t = manager.get(&token).ok_or("token vanished after deploy")?;
        println!("   Address:  {}", token);
        println!("   Name:     {}", t.name());
        println!("   Symbol:   {}", t.symbol());
        println!("   Decimals: {}", t.decimals());
        println!("   Supply:   {} MTT", format_ether(t.total_supply()));
    }

    let parties = [("deployer", deployer), ("recipient", recipient)];

    println!("\n1. Transfer 1000 MTT to recipient");
    manager.transfer(&token, deployer, recipient, parse_ether("1000")?)?;
    print_balances(&manager, &token, &parties)?;

    println!("\n2. Approve spender for 500 MTT");
    manager.approve(&token, deployer, spender, parse_ether("500")?)?;
    println!(
        "   Allowance: {} MTT",
        format_ether(manager.allowance(&token, &deployer, &spender)?)
    );

    println!("\n3. Spender moves 200 MTT from deployer to recipient");
    manager.transfer_from(&token, spender, deployer, recipient, parse_ether("200")?)?;
    print_balances(&manager, &token, &parties)?;
    println!(
        "   Remaining allowance: {} MTT",
        format_ether(manager.allowance(&token, &deployer, &spender)?)
    );

    println!("\n4. Mint 5000 MTT to recipient");
    manager.mint(&token, deployer, recipient, parse_ether("5000")?)?;
    print_supply(&manager, &token)?;

    println!("\n5. Recipient burns 1000 MTT");
    manager.burn(&token, recipient, parse_ether("1000")?)?;
    print_supply(&manager, &token)?;

    println!("\n6. Three transfers of 100 MTT");
    for i in 0..3 {
        manager.transfer(&token, deployer, recipient, parse_ether("100")?)?;
        println!("   Transfer {} done", i + 1);
    }
    print_balances(&manager, &token, &parties)?;

    println!("\n7. Raise allowance to 1000 MTT");
    manager.approve(&token, deployer, spender, parse_ether("1000")?)?;
    println!(
        "   Allowance: {} MTT",
        format_ether(manager.allowance(&token, &deployer, &spender)?)
    );

    println!("\n=== Final state ===");
    print_supply(&manager, &token)?;
    print_balances(&manager, &token, &parties)?;
    println!("   Events emitted: {}", manager.events(&token)?.len());

    Ok(manager)
}

fn print_supply(manager: &TokenManager, token: &Address) -> CliResult<()> {
    let t = manager.get(token).ok_or("token not found")?;
    println!("   Total supply: {} MTT", format_ether(t.total_supply()));
    Ok(())
}
