//! Core transaction components
//!
//! This module contains:
//! - Legacy transactions with EIP-155 signing and RLP encoding
//! - Contract address derivation
//! - Local nonce tracking

pub mod nonce;
pub mod transaction;

pub use nonce::NonceTracker;
pub use transaction::{
    contract_address, SignedTransaction, Transaction, TransactionError, EIP155_V_OFFSET,
};
