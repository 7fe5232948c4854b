//! The node operations used by deployment and the session

use crate::rpc::{CallRequest, Receipt, RpcError};
use ethereum_types::{Address, H256, U256};
use std::time::{Duration, Instant};

/// Default time to wait for a transaction to be mined
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default delay between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long and how often to poll for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_RECEIPT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// A blockchain node reachable over RPC
///
/// Calls are issued one at a time; implementations need not be shareable
/// across tasks.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Transactions sent from `address`, including pending ones
    async fn transaction_count(&self, address: Address) -> Result<u64, RpcError>;

    async fn gas_price(&self) -> Result<U256, RpcError>;

    async fn estimate_gas(&self, request: &CallRequest) -> Result<U256, RpcError>;

    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Submit a signed transaction, returning its hash
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<H256, RpcError>;

    /// Receipt for a mined transaction, `None` while pending
    async fn transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>, RpcError>;

    /// Execute a read-only call against the latest block
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError>;

    fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy::default()
    }

    /// Poll until the transaction is mined or the policy's timeout elapses
    async fn wait_for_receipt(&self, hash: H256) -> Result<Receipt, RpcError> {
        let policy = self.receipt_policy();
        let started = Instant::now();

        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                log::debug!(
                    "Receipt for {:?} after {:?}",
                    hash,
                    started.elapsed()
                );
                return Ok(receipt);
            }

            if started.elapsed() >= policy.timeout {
                return Err(RpcError::Timeout {
                    waited: policy.timeout,
                    what: format!("receipt of {:?}", hash),
                });
            }

            tokio::time::sleep(policy.poll_interval).await;
        }
    }
}
