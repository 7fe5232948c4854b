//! JSON-RPC 2.0 client over HTTP

use crate::rpc::http::{self, Endpoint, HttpResponse};
use crate::rpc::{Bytes, CallRequest, ChainClient, Receipt, ReceiptPolicy, RpcError};
use ethereum_types::{Address, H256, U256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default bound on a single HTTP round-trip
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Client for a node's HTTP JSON-RPC endpoint
pub struct RpcClient {
    url: String,
    endpoint: Endpoint,
    next_id: AtomicU64,
    request_timeout: Duration,
    receipt_policy: ReceiptPolicy,
}

impl RpcClient {
    /// Create a client for `url` (e.g. `http://127.0.0.1:8545`)
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Ok(Self {
            url: url.to_string(),
            endpoint: Endpoint::parse(url)?,
            next_id: AtomicU64::new(1),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            receipt_policy: ReceiptPolicy::default(),
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_receipt_policy(mut self, policy: ReceiptPolicy) -> Self {
        self.receipt_policy = policy;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue a single JSON-RPC request
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })?;

        log::debug!("→ {} (id {})", method, id);
        let response = http::post_json(&self.endpoint, &body, self.request_timeout).await?;
        log::debug!("← {} (id {}) HTTP {}", method, id, response.status);

        decode_response(method, response)
    }
}

fn decode_response<T: DeserializeOwned>(method: &str, response: HttpResponse) -> Result<T, RpcError> {
    let parsed: Response = match serde_json::from_slice(&response.body) {
        Ok(parsed) => parsed,
        Err(_) if !response.is_success() => {
            return Err(RpcError::Http(format!(
                "{} returned HTTP {}",
                method, response.status
            )))
        }
        Err(e) => {
            return Err(RpcError::InvalidResponse(format!(
                "{}: not a JSON-RPC response ({})",
                method, e
            )))
        }
    };

    if let Some(error) = parsed.error {
        return Err(RpcError::Rpc {
            code: error.code,
            message: error.message,
            data: error.data,
        });
    }

    let result = parsed.result.unwrap_or(Value::Null);
    serde_json::from_value(result)
        .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))
}

fn quantity_to_u64(method: &str, value: U256) -> Result<u64, RpcError> {
    if value.bits() > 64 {
        return Err(RpcError::InvalidResponse(format!(
            "{}: quantity {} does not fit in u64",
            method, value
        )));
    }
    Ok(value.low_u64())
}

impl ChainClient for RpcClient {
    async fn transaction_count(&self, address: Address) -> Result<u64, RpcError> {
        let count: U256 = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        quantity_to_u64("eth_getTransactionCount", count)
    }

    async fn gas_price(&self) -> Result<U256, RpcError> {
        self.request("eth_gasPrice", json!([])).await
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<U256, RpcError> {
        self.request("eth_estimateGas", json!([request])).await
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U256 = self.request("eth_chainId", json!([])).await?;
        quantity_to_u64("eth_chainId", id)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<H256, RpcError> {
        self.request(
            "eth_sendRawTransaction",
            json!([Bytes(raw.to_vec())]),
        )
        .await
    }

    async fn transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash]))
            .await
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        let bytes: Bytes = self.request("eth_call", json!([request, "latest"])).await?;
        Ok(bytes.0)
    }

    fn receipt_policy(&self) -> ReceiptPolicy {
        self.receipt_policy
    }
}
