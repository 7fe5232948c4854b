//! Cryptographic utilities for the chain client
//!
//! This module provides:
//! - Keccak-256 hashing
//! - ECDSA key management (secp256k1) with recoverable signatures
//! - Address derivation and EIP-55 checksum formatting

pub mod hash;
pub mod keys;

pub use hash::{keccak256, keccak256_h256};
pub use keys::{
    parse_address, public_key_to_address, recover_address, sign_hash, to_checksum_address,
    KeyError, KeyPair, Signature,
};
