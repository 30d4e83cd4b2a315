//! Transfer and Approval events
//!
//! Every committed mutation appends exactly one record to the token's
//! event log. Sequence numbers keep increasing even when old records are
//! dropped by the history limit.

use crate::core::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// An ERC-20 event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// Tokens moved; `from` is zero for mints, `to` is zero for burns
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// Allowance set
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
}

impl TokenEvent {
    /// Amount carried by the event
    pub fn amount(&self) -> u128 {
        match self {
            TokenEvent::Transfer { amount, .. } | TokenEvent::Approval { amount, .. } => *amount,
        }
    }

    /// Whether `address` appears in the event
    pub fn involves(&self, address: &Address) -> bool {
        match self {
            TokenEvent::Transfer { from, to, .. } => from == address || to == address,
            TokenEvent::Approval { owner, spender, .. } => owner == address || spender == address,
        }
    }

    /// Event name as it appears in an ABI
    pub fn name(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "Transfer",
            TokenEvent::Approval { .. } => "Approval",
        }
    }
}

impl fmt::Display for TokenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenEvent::Transfer { from, to, amount } => {
                write!(f, "Transfer({}, {}, {})", from, to, amount)
            }
            TokenEvent::Approval {
                owner,
                spender,
                amount,
            } => write!(f, "Approval({}, {}, {})", owner, spender, amount),
        }
    }
}

/// A logged event with its position and time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the token's event stream, starting at 0
    pub sequence: u64,
    /// Emitting token
    pub token: Address,
    pub event: TokenEvent,
    pub timestamp: DateTime<Utc>,
}

/// Ordered event history of a single token
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    next_sequence: u64,
    /// Maximum records kept; `None` keeps everything
    limit: Option<usize>,
}

impl EventLog {
    /// Create an empty log
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            next_sequence: 0,
            limit,
        }
    }

    /// Append an event and return the stored record
    pub fn push(&mut self, token: Address, event: TokenEvent) -> EventRecord {
        let record = EventRecord {
            sequence: self.next_sequence,
            token,
            event,
            timestamp: Utc::now(),
        };
        self.next_sequence += 1;

        self.records.push_back(record.clone());
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }

        record
    }

    /// Records currently kept, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Records mentioning `address`
    pub fn involving(&self, address: &Address) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| r.event.involves(address))
            .collect()
    }

    /// Most recent record
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.back()
    }

    /// Number of records kept
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of events ever emitted
    pub fn emitted(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(amount: u128) -> TokenEvent {
        TokenEvent::Transfer {
            from: Address::from_seed("a"),
            to: Address::from_seed("b"),
            amount,
        }
    }

    #[test]
    fn test_sequence_numbers() {
        let token = Address::from_seed("token");
        let mut log = EventLog::new(None);

        let first = log.push(token, transfer(1));
        let second = log.push(token, transfer(2));

        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().event.amount(), 2);
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let token = Address::from_seed("token");
        let mut log = EventLog::new(Some(3));

        for amount in 0..5 {
            log.push(token, transfer(amount));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.emitted(), 5);
        let kept: Vec<u64> = log.iter().map(|r| r.sequence).collect();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    #[test]
    fn test_involving() {
        let token = Address::from_seed("token");
        let carol = Address::from_seed("carol");
        let mut log = EventLog::new(None);

        log.push(token, transfer(1));
        log.push(
            token,
            TokenEvent::Approval {
                owner: Address::from_seed("a"),
                spender: carol,
                amount: 5,
            },
        );

        assert_eq!(log.involving(&carol).len(), 1);
        assert_eq!(log.involving(&Address::from_seed("a")).len(), 2);
        assert!(log.involving(&Address::ZERO).is_empty());
    }

    #[test]
    fn test_display() {
        let event = TokenEvent::Transfer {
            from: Address::ZERO,
            to: Address::ZERO,
            amount: 7,
        };
        assert_eq!(event.name(), "Transfer");
        assert!(event.to_string().starts_with("Transfer(0x0000"));
        assert!(event.to_string().ends_with(", 7)"));
    }
}
