//! State carried through the session

use crate::contract::{submit, Deployment, SubmitError, TokenContract};
use crate::core::NonceTracker;
use crate::rpc::{ChainClient, Receipt};
use crate::wallet::Account;

/// Everything an action needs, passed explicitly to [`crate::session::dispatch`]
#[derive(Debug)]
pub struct SessionContext {
    pub account: Account,
    pub nonce: NonceTracker,
    pub token: TokenContract,
    pub chain_id: u64,
    /// Upper-cased token symbol used in output
    pub symbol: String,
}

impl SessionContext {
    /// Continue from a deployment, reusing its nonce tracker
    pub fn new(account: Account, deployment: Deployment, chain_id: u64, symbol: &str) -> Self {
        Self {
            account,
            nonce: deployment.nonce,
            token: deployment.contract,
            chain_id,
            symbol: symbol.to_uppercase(),
        }
    }

    /// Transactions accepted during the session, excluding the deployment
    pub fn transactions_sent(&self) -> u64 {
        self.nonce.submitted().saturating_sub(1)
    }

    /// Send `data` to the token contract
    pub async fn submit<C: ChainClient>(
        &mut self,
        chain: &C,
        data: Vec<u8>,
    ) -> Result<Receipt, SubmitError> {
        submit(
            chain,
            &self.account,
            &mut self.nonce,
            self.chain_id,
            Some(self.token.address()),
            data,
        )
        .await
    }
}
