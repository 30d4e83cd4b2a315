//! Cryptographic utilities
//!
//! Only hashing is needed: account and contract addresses are derived
//! from SHA-256 digests.

pub mod hash;

pub use hash::{sha256, sha256_concat};
