//! Core value types
//!
//! - Addresses (20-byte identifiers, zero address sentinel)
//! - Units (decimal string <-> base unit conversion)

pub mod address;
pub mod units;

pub use address::{dev_accounts, Address, AddressError, ADDRESS_LENGTH};
pub use units::{
    format_ether, format_units, parse_ether, parse_units, scale, UnitsError, ETHER_DECIMALS,
};
