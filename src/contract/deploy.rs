//! Contract deployment

use crate::abi::{self, AbiError, DynSolValue};
use crate::contract::compiler::CompiledArtifact;
use crate::contract::token::TokenContract;
use crate::contract::transactor::{self, SubmitError};
use crate::core::{contract_address, NonceTracker};
use crate::rpc::{ChainClient, Receipt, RpcError};
use crate::wallet::Account;
use ethereum_types::H256;
use thiserror::Error;

/// Deployment errors
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid constructor arguments: {0}")]
    Abi(#[from] AbiError),
    #[error("Failed to fetch account nonce: {0}")]
    Rpc(#[from] RpcError),
    #[error("Contract creation reverted in transaction {0:?}")]
    Reverted(H256),
    #[error("Receipt of {0:?} carries no contract address")]
    MissingAddress(H256),
    #[error("Deployment failed: {0}")]
    Submit(SubmitError),
}

impl From<SubmitError> for DeployError {
    fn from(error: SubmitError) -> Self {
        match error {
            SubmitError::Reverted(hash) => DeployError::Reverted(hash),
            other => DeployError::Submit(other),
        }
    }
}

/// Outcome of a successful deployment
#[derive(Debug)]
pub struct Deployment {
    pub contract: TokenContract,
    pub receipt: Receipt,
    /// Advanced past the creation transaction
    pub nonce: NonceTracker,
}

/// Deploy `artifact` from `account` with the given constructor arguments
pub async fn deploy<C: ChainClient>(
    chain: &C,
    artifact: &CompiledArtifact,
    account: &Account,
    constructor_args: &[DynSolValue],
    chain_id: u64,
) -> Result<Deployment, DeployError> {
    let mut nonce = NonceTracker::new(chain.transaction_count(account.address()).await?);
    let data = abi::encode_deploy(&artifact.abi, &artifact.bytecode, constructor_args)?;

    let expected = contract_address(&account.address(), nonce.next());
    log::info!(
        "Deploying {} from {} with nonce {}",
        artifact.contract_name,
        account.checksum_address(),
        nonce.next()
    );

    let receipt = transactor::submit(chain, account, &mut nonce, chain_id, None, data).await?;
    let address = receipt
        .contract_address
        .ok_or(DeployError::MissingAddress(receipt.transaction_hash))?;

    if address != expected {
        log::warn!(
            "Contract deployed at {:?}, expected {:?}",
            address,
            expected
        );
    }
    log::info!("{} deployed at {:?}", artifact.contract_name, address);

    Ok(Deployment {
        contract: TokenContract::new(address, artifact.abi.clone()),
        receipt,
        nonce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::token::TokenParams;
    use crate::test_utils::{deployer, token_artifact, MockChain, CHAIN_ID};
    use ethereum_types::U256;

    fn gold() -> Vec<DynSolValue> {
        TokenParams::new("Gold", "GLD", 18, U256::from(1000)).constructor_args()
    }

    #[tokio::test]
    async fn test_deploy_returns_predicted_address() {
        let chain = MockChain::new();
        let account = deployer();

        let deployment = deploy(&chain, &token_artifact(), &account, &gold(), CHAIN_ID)
            .await
            .unwrap();

        assert_eq!(
            deployment.contract.address(),
            contract_address(&account.address(), 0)
        );
        assert!(deployment.receipt.succeeded());
        assert_eq!(deployment.nonce.next(), 1);
        assert_eq!(deployment.nonce.submitted(), 1);
    }

    #[tokio::test]
    async fn test_deployments_get_distinct_addresses() {
        let chain = MockChain::new();
        let account = deployer();
        let artifact = token_artifact();

        let first = deploy(&chain, &artifact, &account, &gold(), CHAIN_ID).await.unwrap();
        let second = deploy(&chain, &artifact, &account, &gold(), CHAIN_ID).await.unwrap();

        assert!(!first.contract.address().is_zero());
        assert_ne!(first.contract.address(), second.contract.address());
        assert_eq!(second.nonce.next(), 2);
    }

    #[tokio::test]
    async fn test_deploy_rejects_bad_arguments() {
        let chain = MockChain::new();
        let args = vec![abi::string_value("Gold")];

        let result = deploy(&chain, &token_artifact(), &deployer(), &args, CHAIN_ID).await;
        assert!(matches!(result, Err(DeployError::Abi(_))));
        assert!(chain.sent().is_empty());
    }

    #[tokio::test]
    async fn test_deploy_with_wrong_chain_id_is_rejected() {
        let chain = MockChain::new();

        let result = deploy(&chain, &token_artifact(), &deployer(), &gold(), CHAIN_ID + 1).await;
        assert!(matches!(
            result,
            Err(DeployError::Submit(SubmitError::Rejected(_)))
        ));
    }

    #[tokio::test]
    async fn test_reverted_creation() {
        let chain = MockChain::new();
        chain.revert_next();

        let result = deploy(&chain, &token_artifact(), &deployer(), &gold(), CHAIN_ID).await;
        assert!(matches!(result, Err(DeployError::Reverted(_))));
    }
}
