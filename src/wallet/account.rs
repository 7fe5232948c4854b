//! Operator account
//!
//! Holds the address and signing key entered at startup. Nothing is
//! persisted; the key lives in memory for the duration of the session.

use crate::core::{SignedTransaction, Transaction, TransactionError};
use crate::crypto::{parse_address, to_checksum_address, KeyError, KeyPair};
use ethereum_types::Address;
use thiserror::Error;

/// Account-related errors
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Private key controls {derived}, not {entered}")]
    AddressMismatch { entered: String, derived: String },
}

/// An account able to sign transactions
#[derive(Debug, Clone)]
pub struct Account {
    address: Address,
    key_pair: KeyPair,
}

impl Account {
    /// Import an account from a hex private key
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, AccountError> {
        let key_pair = KeyPair::from_private_key_hex(private_key_hex)?;
        Ok(Self {
            address: key_pair.address(),
            key_pair,
        })
    }

    /// Import an account, checking that the key controls `address`
    pub fn with_address(address: &str, private_key_hex: &str) -> Result<Self, AccountError> {
        let entered = parse_address(address)?;
        let account = Self::from_private_key(private_key_hex)?;

        if account.address != entered {
            return Err(AccountError::AddressMismatch {
                entered: to_checksum_address(&entered),
                derived: account.checksum_address(),
            });
        }

        Ok(account)
    }

    /// Get the account's address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the address in EIP-55 form
    pub fn checksum_address(&self) -> String {
        to_checksum_address(&self.address)
    }

    /// Sign a transaction with this account's key
    pub fn sign(&self, transaction: Transaction) -> Result<SignedTransaction, TransactionError> {
        transaction.sign(&self.key_pair)
    }
}
