//! Token errors and their revert-message renderings

use crate::core::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: {account} has {have}, needs {need}")]
    InsufficientBalance {
        account: Address,
        have: u128,
        need: u128,
    },
    #[error("Insufficient allowance: {spender} may spend {have}, needs {need}")]
    InsufficientAllowance {
        spender: Address,
        have: u128,
        need: u128,
    },
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(Address),
    #[error("Invalid sender: {0}")]
    InvalidSender(Address),
    #[error("Invalid spender: {0}")]
    InvalidSpender(Address),
    #[error("Total supply overflow: {supply} + {amount}")]
    SupplyOverflow { supply: u128, amount: u128 },
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-36")]
    InvalidDecimals,
    #[error("Token not found: {0}")]
    TokenNotFound(Address),
    #[error("Token already exists: {0}")]
    TokenAlreadyExists(Address),
    #[error("Unauthorized: {0} is not the token owner")]
    Unauthorized(Address),
    #[error("Minting is disabled for this token")]
    MintingDisabled,
    #[error("Burning is disabled for this token")]
    BurningDisabled,
}

/// Which family of revert strings a token reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevertStyle {
    /// `"ERC20: transfer amount exceeds balance"` and friends
    #[default]
    OpenZeppelin,
    /// Short messages such as `"Insufficient balance"`
    Plain,
    /// `"ERC20: insufficient balance"` for every balance shortfall,
    /// otherwise the same as `OpenZeppelin`
    Compact,
}

/// The operation that failed, used to pick the right revert string
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Transfer,
    Approve,
    TransferFrom,
    Mint,
    Burn,
}

impl TokenError {
    /// Revert reason a contract would report for this error
    pub fn revert_reason(&self, op: Operation, style: RevertStyle) -> String {
        match style {
            RevertStyle::OpenZeppelin => self.open_zeppelin_reason(op),
            RevertStyle::Plain => self.plain_reason(),
            RevertStyle::Compact => match self {
                TokenError::InsufficientBalance { .. } => "ERC20: insufficient balance".to_string(),
                _ => self.open_zeppelin_reason(op),
            },
        }
    }

    fn open_zeppelin_reason(&self, op: Operation) -> String {
        let text = match (self, op) {
            (TokenError::InsufficientBalance { .. }, Operation::Burn) => {
                "ERC20: burn amount exceeds balance"
            }
            (TokenError::InsufficientBalance { .. }, _) => "ERC20: transfer amount exceeds balance",
            (TokenError::InsufficientAllowance { .. }, _) => "ERC20: insufficient allowance",
            (TokenError::InvalidRecipient(_), Operation::Mint) => "ERC20: mint to the zero address",
            (TokenError::InvalidRecipient(_), _) => "ERC20: transfer to the zero address",
            (TokenError::InvalidSender(_), Operation::Burn) => "ERC20: burn from the zero address",
            (TokenError::InvalidSender(_), _) => "ERC20: transfer from the zero address",
            (TokenError::InvalidSpender(_), _) => "ERC20: approve to the zero address",
            (TokenError::Unauthorized(_), _) => "Ownable: caller is not the owner",
            _ => return self.to_string(),
        };
        text.to_string()
    }

    fn plain_reason(&self) -> String {
        let text = match self {
            TokenError::InsufficientBalance { .. } => "Insufficient balance",
            TokenError::InsufficientAllowance { .. } => "Insufficient allowance",
            TokenError::InvalidRecipient(_) => "Invalid recipient",
            TokenError::InvalidSender(_) => "Invalid sender",
            TokenError::InvalidSpender(_) => "Invalid spender",
            TokenError::Unauthorized(_) => "Not owner",
            _ => return self.to_string(),
        };
        text.to_string()
    }
}
