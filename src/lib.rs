//! Token Deployer: compile, deploy and operate a Solidity token
//!
//! This crate drives an external Ethereum development node:
//! - Compiles the Token contract with `solc` (standard JSON interface)
//! - Signs EIP-155 legacy transactions locally (secp256k1, RLP)
//! - Deploys over HTTP JSON-RPC and waits for receipts
//! - Tracks the account nonce locally across the session
//! - Offers a menu for supply, balance, transfer, mint and burn
//!
//! # Example
//!
//! ```ignore
//! use token_deployer::contract::{deploy, SolcCompiler, TokenParams};
//! use token_deployer::rpc::RpcClient;
//! use token_deployer::wallet::Account;
//!
//! let artifact = SolcCompiler::new().compile(&std::fs::read_to_string("token.sol")?)?;
//! let client = RpcClient::new("http://127.0.0.1:8545")?;
//! let account = Account::from_private_key(&private_key)?;
//!
//! let params = TokenParams::new("Gold", "GLD", 18, 1000.into());
//! let deployment = deploy(&client, &artifact, &account, &params.constructor_args(), 1337).await?;
//! let supply = deployment.contract.total_supply(&client).await?;
//! println!("Total supply of GLD token is {}", supply);
//! ```

pub mod abi;
pub mod cli;
pub mod config;
pub mod contract;
pub mod core;
pub mod crypto;
pub mod rpc;
pub mod session;
pub mod wallet;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use abi::{DynSolValue, JsonAbi};
pub use config::Config;
pub use contract::{deploy, CompiledArtifact, Deployment, SolcCompiler, TokenContract, TokenParams};
pub use core::{NonceTracker, SignedTransaction, Transaction};
pub use crypto::KeyPair;
pub use rpc::{ChainClient, RpcClient};
pub use session::{dispatch, Action, SessionContext};
pub use wallet::Account;
