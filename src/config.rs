//! Runtime configuration

use crate::contract::compiler::{DEFAULT_CONTRACT_NAME, DEFAULT_SOLC, DEFAULT_SOLC_VERSION};
use crate::contract::SolcCompiler;
use crate::rpc::{
    ReceiptPolicy, RpcClient, RpcError, DEFAULT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
use std::path::PathBuf;
use std::time::Duration;

/// Local development node (Ganache, Anvil, Hardhat)
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CHAIN_ID: u64 = 1337;
pub const DEFAULT_SOURCE: &str = "token.sol";
pub const DEFAULT_ARTIFACT: &str = "compiled_code.json";

/// Settings for a deploy-and-operate run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rpc_url: String,
    /// Chain id used for EIP-155 signing
    pub chain_id: u64,
    /// Solidity source of the token contract
    pub source: PathBuf,
    pub contract_name: String,
    pub solc: PathBuf,
    /// Exact compiler version to require, `None` to accept any
    pub solc_version: Option<String>,
    /// Install the required version when `solc` is missing or differs
    pub install_solc: bool,
    /// Where to save the raw compiler output, `None` to skip
    pub artifact_path: Option<PathBuf>,
    /// Bound on each JSON-RPC round-trip
    pub request_timeout: Duration,
    pub receipt_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            source: PathBuf::from(DEFAULT_SOURCE),
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            solc: PathBuf::from(DEFAULT_SOLC),
            solc_version: Some(DEFAULT_SOLC_VERSION.to_string()),
            install_solc: true,
            artifact_path: Some(PathBuf::from(DEFAULT_ARTIFACT)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Config {
    pub fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            timeout: self.receipt_timeout,
            poll_interval: self.poll_interval,
        }
    }

    /// Compiler configured for the token source
    pub fn compiler(&self) -> SolcCompiler {
        SolcCompiler::new()
            .with_solc(self.solc.clone())
            .with_required_version(self.solc_version.clone())
            .with_contract_name(&self.contract_name)
            .with_artifact_path(self.artifact_path.clone())
    }

    /// Client for the configured node
    pub fn client(&self) -> Result<RpcClient, RpcError> {
        Ok(RpcClient::new(&self.rpc_url)?
            .with_request_timeout(self.request_timeout)
            .with_receipt_policy(self.receipt_policy()))
    }
}
