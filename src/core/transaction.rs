//! Legacy Ethereum transactions
//!
//! Implements the pre-EIP-1559 transaction record:
//! - RLP encoding of the nine transaction fields
//! - Chain ID replay protection (EIP-155)
//! - Recoverable signing and sender recovery

use crate::crypto::{keccak256_h256, recover_address, KeyPair, Signature};
use ethereum_types::{Address, H256, U256};
use rlp::{Rlp, RlpStream};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Offset added to the recovery id in EIP-155 signatures (`v = id + 35 + 2 * chain_id`)
pub const EIP155_V_OFFSET: u64 = 35;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] crate::crypto::KeyError),
    #[error("RLP error: {0}")]
    Rlp(#[from] rlp::DecoderError),
}

// =============================================================================
// Transaction
// =============================================================================

/// An unsigned legacy transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: U256,
    /// `None` creates a contract
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
}

impl Transaction {
    /// Whether this transaction deploys a contract
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas);
        match &self.to {
            Some(to) => stream.append(to),
            None => stream.append_empty_data(),
        };
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// Hash signed over: `keccak(rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]))`
    pub fn signing_hash(&self) -> H256 {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        keccak256_h256(&stream.out())
    }

    /// Sign with the given key
    pub fn sign(self, key_pair: &KeyPair) -> Result<SignedTransaction, TransactionError> {
        let signature = key_pair.sign(&self.signing_hash())?;
        Ok(SignedTransaction::new(self, signature))
    }
}

// =============================================================================
// Signed Transaction
// =============================================================================

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
    raw: Vec<u8>,
}

impl SignedTransaction {
    fn new(transaction: Transaction, signature: Signature) -> Self {
        let v = u64::from(signature.recovery_id) + EIP155_V_OFFSET + 2 * transaction.chain_id;

        let mut stream = RlpStream::new_list(9);
        transaction.append_body(&mut stream);
        stream.append(&v);
        stream.append(&U256::from_big_endian(&signature.r));
        stream.append(&U256::from_big_endian(&signature.s));

        Self {
            transaction,
            signature,
            raw: stream.out().to_vec(),
        }
    }

    /// RLP-encoded signed transaction
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Transaction hash as reported by the node
    pub fn hash(&self) -> H256 {
        keccak256_h256(&self.raw)
    }

    /// Recover the sending account from the signature
    pub fn sender(&self) -> Result<Address, TransactionError> {
        Ok(recover_address(
            &self.transaction.signing_hash(),
            &self.signature,
        )?)
    }

    /// Decode an EIP-155 signed transaction
    pub fn decode(raw: &[u8]) -> Result<Self, TransactionError> {
        let rlp = Rlp::new(raw);
        if rlp.item_count()? != 9 {
            return Err(TransactionError::InvalidTransaction(
                "expected 9 RLP fields".to_string(),
            ));
        }

        let to_field = rlp.at(3)?;
        let to = if to_field.is_empty() {
            None
        } else {
            Some(to_field.as_val::<Address>()?)
        };

        let v: u64 = rlp.val_at(6)?;
        if v < EIP155_V_OFFSET {
            return Err(TransactionError::InvalidTransaction(
                "signature lacks chain id".to_string(),
            ));
        }
        let chain_id = (v - EIP155_V_OFFSET) / 2;
        let recovery_id = ((v - EIP155_V_OFFSET) % 2) as u8;

        let transaction = Transaction {
            chain_id,
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas: rlp.val_at(2)?,
            to,
            value: rlp.val_at(4)?,
            data: rlp.val_at(5)?,
        };

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        rlp.val_at::<U256>(7)?.to_big_endian(&mut r);
        rlp.val_at::<U256>(8)?.to_big_endian(&mut s);

        Ok(Self {
            transaction,
            signature: Signature { r, s, recovery_id },
            raw: raw.to_vec(),
        })
    }
}

/// Address of a contract created by `sender` at `nonce`
pub fn contract_address(sender: &Address, nonce: u64) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(sender);
    stream.append(&nonce);
    let hash = keccak256_h256(&stream.out());
    Address::from_slice(&hash.as_bytes()[12..])
}
