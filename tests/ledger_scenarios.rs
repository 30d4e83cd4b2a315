//! End-to-end ledger scenarios

use erc20_ledger::core::{dev_accounts, parse_ether, Address};
use erc20_ledger::storage::{Storage, StorageConfig};
use erc20_ledger::token::{
    MintPolicy, Operation, RevertStyle, SupplyUnit, Token, TokenConfig, TokenError, TokenEvent,
    TokenManager, INFINITE_ALLOWANCE,
};

fn empty_token() -> Token {
    Token::deploy(
        Address::from_seed("token"),
        &TokenConfig::new("Scenario", "SCN"),
        Address::from_seed("deployer"),
    )
    .unwrap()
}

#[test]
fn mint_transfer_approve_transfer_from() {
    let [a, b, c, d] = ["a", "b", "c", "d"].map(Address::from_seed);
    let mut token = empty_token();

    token.mint(a, 1000).unwrap();
    token.transfer(a, b, 100).unwrap();
    token.approve(b, c, 50).unwrap();
    token.transfer_from(c, b, d, 50).unwrap();

    assert_eq!(token.balance_of(&a), 900);
    assert_eq!(token.balance_of(&b), 50);
    assert_eq!(token.balance_of(&d), 50);
    assert_eq!(token.allowance(&b, &c), 0);
    assert_eq!(token.total_supply(), 1000);
    assert!(token.is_consistent());

    let events: Vec<TokenEvent> = token.events().iter().map(|r| r.event.clone()).collect();
    assert_eq!(
        events,
        vec![
            TokenEvent::Transfer {
                from: Address::ZERO,
                to: a,
                amount: 1000
            },
            TokenEvent::Transfer {
                from: a,
                to: b,
                amount: 100
            },
            TokenEvent::Approval {
                owner: b,
                spender: c,
                amount: 50
            },
            TokenEvent::Transfer {
                from: b,
                to: d,
                amount: 50
            },
        ]
    );
}

#[test]
fn transfer_exceeding_balance_leaves_state_unchanged() {
    let [a, b] = ["a", "b"].map(Address::from_seed);
    let mut token = empty_token();
    token.mint(a, 10).unwrap();
    let events_before = token.events().len();

    let err = token.transfer(a, b, 11).unwrap_err();

    assert!(matches!(err, TokenError::InsufficientBalance { .. }));
    assert_eq!(token.balance_of(&a), 10);
    assert_eq!(token.balance_of(&b), 0);
    assert_eq!(token.total_supply(), 10);
    assert_eq!(token.events().len(), events_before);
}

#[test]
fn repeated_infinite_allowance_spending() {
    let [owner, spender, sink] = ["owner", "spender", "sink"].map(Address::from_seed);
    let mut token = empty_token();
    token.mint(owner, 1_000).unwrap();
    token.approve(owner, spender, INFINITE_ALLOWANCE).unwrap();

    for _ in 0..10 {
        token.transfer_from(spender, owner, sink, 100).unwrap();
    }

    assert_eq!(token.allowance(&owner, &spender), INFINITE_ALLOWANCE);
    assert_eq!(token.balance_of(&owner), 0);

    // Allowance is infinite but the balance is exhausted
    assert!(matches!(
        token.transfer_from(spender, owner, sink, 1),
        Err(TokenError::InsufficientBalance { .. })
    ));
}

#[test]
fn lesson_deployment_walkthrough() {
    let accounts = dev_accounts(3);
    let (owner, addr1, addr2) = (accounts[0], accounts[1], accounts[2]);
    let mut manager = TokenManager::new();

    let config =
        TokenConfig::new("Test Token", "TEST").with_initial_supply(1_000_000, SupplyUnit::Whole);
    let token = manager.deploy(&config, owner).unwrap();

    let events = manager.events(&token).unwrap();
    assert_eq!(
        events[0].event,
        TokenEvent::Transfer {
            from: Address::ZERO,
            to: owner,
            amount: parse_ether("1000000").unwrap(),
        }
    );

    let amount = parse_ether("100").unwrap();
    manager.approve(&token, owner, addr1, amount * 2).unwrap();
    manager
        .transfer_from(&token, addr1, owner, addr2, amount)
        .unwrap();

    assert_eq!(manager.balance_of(&token, &addr2).unwrap(), amount);
    assert_eq!(manager.allowance(&token, &owner, &addr1).unwrap(), amount);

    let err = manager
        .transfer_from(&token, addr1, owner, addr2, amount * 2)
        .unwrap_err();
    let t = manager.get(&token).unwrap();
    assert_eq!(
        t.revert_reason(&err, Operation::TransferFrom),
        "ERC20: insufficient allowance"
    );
}

#[test]
fn plain_revert_style_and_owner_only_mint() {
    let accounts = dev_accounts(2);
    let mut manager = TokenManager::new();
    let config = TokenConfig::new("MyToken", "MTK")
        .with_initial_supply(1000, SupplyUnit::Whole)
        .with_mint_policy(MintPolicy::OwnerOnly)
        .with_revert_style(RevertStyle::Plain);
    let token = manager.deploy(&config, accounts[0]).unwrap();

    let err = manager
        .transfer(&token, accounts[1], accounts[0], 1)
        .unwrap_err();
    let t = manager.get(&token).unwrap();
    assert_eq!(
        t.revert_reason(&err, Operation::Transfer),
        "Insufficient balance"
    );

    let err = manager
        .mint(&token, accounts[1], accounts[1], 1)
        .unwrap_err();
    assert_eq!(err, TokenError::Unauthorized(accounts[1]));
}

#[test]
fn registry_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let accounts = dev_accounts(2);

    let token = {
        let storage = Storage::new(config.clone()).unwrap();
        let mut manager = storage.load_or_default().unwrap();
        let token = manager
            .deploy(
                &TokenConfig::new("Persisted", "PST").with_initial_supply(5, SupplyUnit::Whole),
                accounts[0],
            )
            .unwrap();
        manager
            .approve(&token, accounts[0], accounts[1], INFINITE_ALLOWANCE)
            .unwrap();
        storage.save(&manager).unwrap();
        token
    };

    let storage = Storage::new(config).unwrap();
    let manager = storage.load().unwrap();
    let t = manager.get(&token).unwrap();

    assert_eq!(t.total_supply(), 5 * 10u128.pow(18));
    assert_eq!(t.allowance(&accounts[0], &accounts[1]), INFINITE_ALLOWANCE);
    assert_eq!(t.events().len(), 2);
}
