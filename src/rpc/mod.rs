//! Chain client
//!
//! Talks to an Ethereum-compatible development node over HTTP JSON-RPC.
//!
//! # Example
//!
//! ```ignore
//! use token_deployer::rpc::{ChainClient, RpcClient};
//!
//! let client = RpcClient::new("http://127.0.0.1:8545")?;
//! let gas_price = client.gas_price().await?;
//! ```

pub mod chain;
pub mod client;
pub mod http;
pub mod types;

pub use chain::{ChainClient, ReceiptPolicy, DEFAULT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT};
pub use client::{RpcClient, DEFAULT_REQUEST_TIMEOUT};
pub use types::{Bytes, CallRequest, Receipt};

use std::time::Duration;
use thiserror::Error;

/// Chain client errors
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Cannot reach node at {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Node error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("Timed out after {waited:?} waiting for {what}")]
    Timeout { waited: Duration, what: String },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RpcError {
    /// The node could not be reached at all
    pub fn is_connection(&self) -> bool {
        matches!(self, RpcError::Connection { .. })
    }
}
