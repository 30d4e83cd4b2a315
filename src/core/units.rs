//! Fixed-point amount conversion
//!
//! Token amounts are stored as integers in base units. Humans write them as
//! decimal strings scaled by the token's `decimals` (for 18 decimals,
//! `"1.5"` is `1_500_000_000_000_000_000`).

use thiserror::Error;

/// Decimals used by ether and by most ERC-20 tokens
pub const ETHER_DECIMALS: u8 = 18;

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid amount: {0}")]
    InvalidFormat(String),
    #[error("Too many decimal places: {found} given, token supports {max}")]
    TooManyDecimals { found: usize, max: u8 },
    #[error("Amount overflows 128 bits: {0}")]
    Overflow(String),
}

/// `10^decimals`, or `None` when it does not fit in a `u128`
pub fn scale(decimals: u8) -> Option<u128> {
    10u128.checked_pow(decimals as u32)
}

/// Parse a decimal string into base units
pub fn parse_units(text: &str, decimals: u8) -> Result<u128, UnitsError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if fraction.contains('.') {
        return Err(UnitsError::InvalidFormat(text.to_string()));
    }
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::InvalidFormat(text.to_string()));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::InvalidFormat(text.to_string()));
    }

    // "1.50" is the same amount as "1.5"
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            found: fraction.len(),
            max: decimals,
        });
    }

    let overflow = || UnitsError::Overflow(text.to_string());
    let unit = scale(decimals).ok_or_else(overflow)?;

    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };

    let fraction_value: u128 = if fraction.is_empty() {
        0
    } else {
        let padding = scale(decimals - fraction.len() as u8).ok_or_else(overflow)?;
        let digits: u128 = fraction.parse().map_err(|_| overflow())?;
        digits.checked_mul(padding).ok_or_else(overflow)?
    };

    whole_value
        .checked_mul(unit)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(overflow)
}

/// Render base units as a decimal string (`"1.5"`, `"1000.0"`)
pub fn format_units(amount: u128, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{}.0", amount);
    }

    let (whole, fraction) = match scale(decimals) {
        Some(unit) => (amount / unit, amount % unit),
        None => (0, amount),
    };

    let padded = format!("{:0width$}", fraction, width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Parse an ether-denominated string (18 decimals)
pub fn parse_ether(text: &str) -> Result<u128, UnitsError> {
    parse_units(text, ETHER_DECIMALS)
}

/// Format base units as ether (18 decimals)
pub fn format_ether(amount: u128) -> String {
    format_units(amount, ETHER_DECIMALS)
}
