//! Build, sign, submit and await a transaction
//!
//! Every state-changing interaction (contract creation, transfer, mint,
//! burn) goes through [`submit`].

use crate::core::{NonceTracker, Transaction, TransactionError};
use crate::rpc::{CallRequest, ChainClient, Receipt, RpcError};
use crate::wallet::Account;
use ethereum_types::{Address, H256, U256};
use thiserror::Error;

/// Transaction submission errors
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Gas price or gas estimation failed; the nonce was not consumed
    #[error("Failed to prepare transaction: {0}")]
    Prepare(#[source] RpcError),
    #[error("Failed to sign transaction: {0}")]
    Sign(#[from] TransactionError),
    /// The node refused the transaction; the nonce was not consumed
    #[error("Node rejected transaction: {0}")]
    Rejected(#[source] RpcError),
    #[error("Transaction {hash:?} was sent but its receipt is unavailable: {source}")]
    Receipt {
        hash: H256,
        #[source]
        source: RpcError,
    },
    #[error("Transaction {0:?} reverted")]
    Reverted(H256),
}

impl SubmitError {
    /// The underlying RPC failure, if any
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            SubmitError::Prepare(e) | SubmitError::Rejected(e) => Some(e),
            SubmitError::Receipt { source, .. } => Some(source),
            SubmitError::Sign(_) | SubmitError::Reverted(_) => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        self.rpc_error().map_or(false, RpcError::is_connection)
    }
}

/// Send `data` to `to` (or create a contract when `to` is `None`) and wait
/// for the receipt
///
/// The nonce tracker is advanced as soon as the node accepts the
/// transaction, so a later revert or receipt timeout still consumes it.
pub async fn submit<C: ChainClient>(
    chain: &C,
    account: &Account,
    nonce: &mut NonceTracker,
    chain_id: u64,
    to: Option<Address>,
    data: Vec<u8>,
) -> Result<Receipt, SubmitError> {
    let gas_price = chain.gas_price().await.map_err(SubmitError::Prepare)?;
    let gas = chain
        .estimate_gas(&CallRequest {
            from: Some(account.address()),
            to,
            data: data.clone().into(),
            ..Default::default()
        })
        .await
        .map_err(SubmitError::Prepare)?;

    let transaction = Transaction {
        chain_id,
        nonce: nonce.next(),
        gas_price,
        gas,
        to,
        value: U256::zero(),
        data,
    };
    let signed = account.sign(transaction)?;

    let hash = chain
        .send_raw_transaction(signed.raw())
        .await
        .map_err(SubmitError::Rejected)?;
    nonce.advance();

    if hash != signed.hash() {
        log::warn!(
            "Node reported hash {:?}, locally computed {:?}",
            hash,
            signed.hash()
        );
    }
    log::info!(
        "Sent transaction {:?} (nonce {}, gas {}, gas price {})",
        hash,
        signed.transaction.nonce,
        gas,
        gas_price
    );

    let receipt = chain
        .wait_for_receipt(hash)
        .await
        .map_err(|source| SubmitError::Receipt { hash, source })?;

    if !receipt.succeeded() {
        return Err(SubmitError::Reverted(hash));
    }

    log::debug!(
        "Transaction {:?} mined in block {:?}",
        hash,
        receipt.block_number
    );
    Ok(receipt)
}
