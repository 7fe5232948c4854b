//! Test utilities: Token ABI fixtures and an in-memory chain.
//!
//! [`MockChain`] accepts real signed transactions. It decodes the RLP,
//! recovers the sender, checks chain id and nonce, and runs the Token
//! contract's ledger so deployment and session flows can be exercised
//! without a node.

use crate::abi::{self, DynSolValue, Function, JsonAbi};
use alloy_dyn_abi::FunctionExt;
use crate::contract::compiler::CompiledArtifact;
use crate::contract::deploy::{deploy, Deployment};
use crate::contract::token::TokenParams;
use crate::core::{contract_address, SignedTransaction};
use crate::rpc::{CallRequest, ChainClient, Receipt, ReceiptPolicy, RpcError};
use crate::wallet::Account;
use ethereum_types::{Address, H256, U256, U64};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

pub const CHAIN_ID: u64 = 1337;

/// Private key controlling [`DEPLOYER_ADDRESS`]
pub const DEPLOYER_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
pub const DEPLOYER_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

/// Stand-in creation bytecode
pub const TOKEN_BYTECODE: [u8; 5] = [0x60, 0x80, 0x60, 0x40, 0x52];

pub const TOKEN_ABI_JSON: &str = r#"[
  {"type":"constructor","stateMutability":"nonpayable","inputs":[
    {"name":"_name","type":"string","internalType":"string"},
    {"name":"_symbol","type":"string","internalType":"string"},
    {"name":"_decimals","type":"uint8","internalType":"uint8"},
    {"name":"_totalSupply","type":"uint256","internalType":"uint256"}]},
  {"type":"event","name":"Transfer","anonymous":false,"inputs":[
    {"name":"from","type":"address","indexed":true},
    {"name":"to","type":"address","indexed":true},
    {"name":"value","type":"uint256","indexed":false}]},
  {"type":"function","name":"burn","stateMutability":"nonpayable",
   "inputs":[{"name":"_value","type":"uint256"}],"outputs":[]},
  {"type":"function","name":"checkBalance","stateMutability":"view",
   "inputs":[{"name":"_owner","type":"address"}],
   "outputs":[{"name":"","type":"uint256"}]},
  {"type":"function","name":"checkTotalSupply","stateMutability":"view",
   "inputs":[],"outputs":[{"name":"","type":"uint256"}]},
  {"type":"function","name":"decimals","stateMutability":"view",
   "inputs":[],"outputs":[{"name":"","type":"uint8"}]},
  {"type":"function","name":"mint","stateMutability":"nonpayable",
   "inputs":[{"name":"_value","type":"uint256"}],"outputs":[]},
  {"type":"function","name":"name","stateMutability":"view",
   "inputs":[],"outputs":[{"name":"","type":"string"}]},
  {"type":"function","name":"symbol","stateMutability":"view",
   "inputs":[],"outputs":[{"name":"","type":"string"}]},
  {"type":"function","name":"transfer","stateMutability":"nonpayable",
   "inputs":[{"name":"_to","type":"address"},{"name":"_value","type":"uint256"}],
   "outputs":[{"name":"success","type":"bool"}]}
]"#;

pub fn token_abi() -> JsonAbi {
    serde_json::from_str(TOKEN_ABI_JSON).unwrap()
}

pub fn token_artifact() -> CompiledArtifact {
    CompiledArtifact {
        contract_name: "Token".to_string(),
        bytecode: TOKEN_BYTECODE.to_vec(),
        abi: token_abi(),
    }
}

/// Standard JSON output as `solc` would print it for the Token contract
pub fn solc_output() -> Value {
    let abi: Value = serde_json::from_str(TOKEN_ABI_JSON).unwrap();
    json!({
        "errors": [{
            "severity": "warning",
            "type": "Warning",
            "formattedMessage": "Warning: SPDX license identifier not provided in source file."
        }],
        "sources": {"token.sol": {"id": 0}},
        "contracts": {"token.sol": {"Token": {
            "abi": abi,
            "metadata": "{}",
            "evm": {
                "bytecode": {"object": hex::encode(TOKEN_BYTECODE), "sourceMap": ""}
            }
        }}}
    })
}

pub fn deployer() -> Account {
    Account::from_private_key(DEPLOYER_KEY).unwrap()
}

/// Deploy a Token from [`deployer`]
pub async fn deploy_token(
    chain: &MockChain,
    name: &str,
    symbol: &str,
    decimals: u8,
    total_supply: u64,
) -> (Deployment, Account) {
    let account = deployer();
    let params = TokenParams::new(name, symbol, decimals, U256::from(total_supply));
    let deployment = deploy(
        chain,
        &token_artifact(),
        &account,
        &params.constructor_args(),
        CHAIN_ID,
    )
    .await
    .unwrap();
    (deployment, account)
}

// =============================================================================
// Token ledger
// =============================================================================

#[derive(Debug, Default, Clone)]
struct Ledger {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

impl Ledger {
    fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let have = self.balance_of(&from);
        if have < amount {
            return false;
        }
        self.balances.insert(from, have - amount);
        let credit = self.balance_of(&to) + amount;
        self.balances.insert(to, credit);
        true
    }

    fn mint(&mut self, to: Address, amount: U256) -> bool {
        self.total_supply += amount;
        let credit = self.balance_of(&to) + amount;
        self.balances.insert(to, credit);
        true
    }

    fn burn(&mut self, from: Address, amount: U256) -> bool {
        let have = self.balance_of(&from);
        if have < amount {
            return false;
        }
        self.balances.insert(from, have - amount);
        self.total_supply -= amount;
        true
    }

    /// Run a state-changing call; `false` means the call reverts
    fn apply(&mut self, sender: Address, function: &str, args: &[DynSolValue]) -> bool {
        let uint = |i: usize| args.get(i).and_then(abi::value_uint);
        match function {
            "transfer" => match (args.first().and_then(abi::value_address), uint(1)) {
                (Some(receiver), Some(amount)) => self.transfer(sender, receiver, amount),
                _ => false,
            },
            "mint" => uint(0).map_or(false, |amount| self.mint(sender, amount)),
            "burn" => uint(0).map_or(false, |amount| self.burn(sender, amount)),
            _ => true,
        }
    }
}

// =============================================================================
// Mock chain
// =============================================================================

#[derive(Default)]
struct MockState {
    nonces: HashMap<Address, u64>,
    contracts: HashMap<Address, Ledger>,
    receipts: HashMap<H256, Receipt>,
    sent: Vec<SignedTransaction>,
    block: u64,
    fail_next_send: Option<String>,
    revert_next: bool,
    disconnected: bool,
}

/// In-memory chain running the Token contract
///
/// Like a real node, `estimate_gas` executes the call against a copy of the
/// ledger and fails with "execution reverted" when it would revert.
pub struct MockChain {
    chain_id: u64,
    chain_id_supported: bool,
    gas_price: U256,
    policy: ReceiptPolicy,
    mine: bool,
    estimate_checks: bool,
    abi: JsonAbi,
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            chain_id: CHAIN_ID,
            chain_id_supported: true,
            gas_price: U256::from(20_000_000_000u64),
            policy: ReceiptPolicy::default(),
            mine: true,
            estimate_checks: true,
            abi: token_abi(),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_receipt_policy(mut self, policy: ReceiptPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Accept transactions but never produce receipts
    pub fn never_mine(mut self) -> Self {
        self.mine = false;
        self
    }

    /// Estimate gas without executing, so failing calls are mined as reverts
    pub fn revert_on_chain(mut self) -> Self {
        self.estimate_checks = false;
        self
    }

    /// Answer `eth_chainId` with "method not found", as older nodes do
    pub fn without_chain_id(mut self) -> Self {
        self.chain_id_supported = false;
        self
    }

    /// Refuse the next raw transaction with `message`
    pub fn fail_next_send(&self, message: &str) {
        self.state.lock().unwrap().fail_next_send = Some(message.to_string());
    }

    /// Mine the next transaction with a failed status
    pub fn revert_next(&self) {
        self.state.lock().unwrap().revert_next = true;
    }

    /// Make every subsequent request fail as if the node went away
    pub fn disconnect(&self) {
        self.state.lock().unwrap().disconnected = true;
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.state.lock().unwrap().nonces.insert(address, nonce);
    }

    /// Transactions accepted so far
    pub fn sent(&self) -> Vec<SignedTransaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn balance(&self, contract: Address, owner: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state
            .contracts
            .get(&contract)
            .map(|ledger| ledger.balance_of(&owner))
            .unwrap_or_default()
    }

    pub fn total_supply(&self, contract: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state
            .contracts
            .get(&contract)
            .map(|ledger| ledger.total_supply)
            .unwrap_or_default()
    }

    fn check_connected(&self) -> Result<(), RpcError> {
        if self.state.lock().unwrap().disconnected {
            return Err(RpcError::Connection {
                endpoint: "mock".to_string(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            });
        }
        Ok(())
    }

    fn node_error(message: impl Into<String>) -> RpcError {
        RpcError::Rpc {
            code: -32000,
            message: message.into(),
            data: None,
        }
    }

    /// Apply a transaction to the ledger; returns the created contract, if
    /// any, and whether execution succeeded
    fn execute(
        &self,
        state: &mut MockState,
        sender: Address,
        signed: &SignedTransaction,
    ) -> (Option<Address>, bool) {
        let tx = &signed.transaction;

        let Some(to) = tx.to else {
            let address = contract_address(&sender, tx.nonce);
            if let Ok(args) = abi::decode_deploy(&self.abi, &TOKEN_BYTECODE, &tx.data) {
                let arg = |i: usize| args.get(i);
                let mut ledger = Ledger {
                    name: arg(0).and_then(abi::value_string).unwrap_or_default(),
                    symbol: arg(1).and_then(abi::value_string).unwrap_or_default(),
                    decimals: arg(2)
                        .and_then(abi::value_uint)
                        .map_or(0, |d| d.low_u32() as u8),
                    total_supply: arg(3).and_then(abi::value_uint).unwrap_or_default(),
                    ..Default::default()
                };
                ledger.balances.insert(sender, ledger.total_supply);
                state.contracts.insert(address, ledger);
            }
            return (Some(address), true);
        };

        let Some(ledger) = state.contracts.get_mut(&to) else {
            return (None, true);
        };
        match self.decode_call(&tx.data) {
            Some((function, args)) => (None, ledger.apply(sender, &function.name, &args)),
            None => (None, false),
        }
    }

    fn decode_call(&self, data: &[u8]) -> Option<(&Function, Vec<DynSolValue>)> {
        let selector = data.get(..4)?;
        let function = self
            .abi
            .functions()
            .find(|f| f.selector().as_slice() == selector)?;
        let args = abi::decode_call(function, data).ok()?;
        Some((function, args))
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainClient for MockChain {
    async fn transaction_count(&self, address: Address) -> Result<u64, RpcError> {
        self.check_connected()?;
        Ok(*self.state.lock().unwrap().nonces.get(&address).unwrap_or(&0))
    }

    async fn gas_price(&self) -> Result<U256, RpcError> {
        self.check_connected()?;
        Ok(self.gas_price)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<U256, RpcError> {
        self.check_connected()?;
        if !self.estimate_checks {
            return Ok(U256::from(90_000));
        }

        let state = self.state.lock().unwrap();
        let target = request.to.and_then(|to| state.contracts.get(&to));
        if let (Some(ledger), Some((function, args))) = (target, self.decode_call(&request.data.0)) {
            let sender = request.from.unwrap_or_default();
            if !ledger.clone().apply(sender, &function.name, &args) {
                return Err(Self::node_error(
                    "execution reverted: insufficient balance",
                ));
            }
        }
        Ok(U256::from(90_000))
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.check_connected()?;
        if !self.chain_id_supported {
            return Err(RpcError::Rpc {
                code: -32601,
                message: "Method eth_chainId not supported.".to_string(),
                data: None,
            });
        }
        Ok(self.chain_id)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<H256, RpcError> {
        self.check_connected()?;
        let mut state = self.state.lock().unwrap();

        if let Some(message) = state.fail_next_send.take() {
            return Err(Self::node_error(message));
        }

        let signed = SignedTransaction::decode(raw)
            .map_err(|e| Self::node_error(format!("invalid transaction: {}", e)))?;
        if signed.transaction.chain_id != self.chain_id {
            return Err(Self::node_error(format!(
                "invalid chain id {}",
                signed.transaction.chain_id
            )));
        }
        let sender = signed
            .sender()
            .map_err(|e| Self::node_error(format!("invalid sender: {}", e)))?;

        let expected = *state.nonces.get(&sender).unwrap_or(&0);
        let nonce = signed.transaction.nonce;
        if nonce < expected {
            return Err(Self::node_error(format!("nonce too low: {} < {}", nonce, expected)));
        }
        if nonce > expected {
            return Err(Self::node_error(format!("nonce too high: {} > {}", nonce, expected)));
        }
        state.nonces.insert(sender, expected + 1);

        let (contract, mut ok) = self.execute(&mut state, sender, &signed);
        if std::mem::take(&mut state.revert_next) {
            ok = false;
        }

        state.block += 1;
        let hash = signed.hash();
        let receipt = Receipt {
            transaction_hash: hash,
            block_number: Some(U64::from(state.block)),
            contract_address: contract.filter(|_| ok),
            status: Some(U64::from(ok as u64)),
            gas_used: Some(U256::from(21_000)),
        };
        if self.mine {
            state.receipts.insert(hash, receipt);
        }
        state.sent.push(signed);

        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>, RpcError> {
        self.check_connected()?;
        Ok(self.state.lock().unwrap().receipts.get(&hash).cloned())
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        self.check_connected()?;
        let state = self.state.lock().unwrap();

        let ledger = match request.to.and_then(|to| state.contracts.get(&to)) {
            Some(ledger) => ledger,
            None => return Ok(Vec::new()),
        };
        let Some((function, args)) = self.decode_call(&request.data.0) else {
            return Err(Self::node_error("execution reverted"));
        };

        let output = match function.name.as_str() {
            "checkTotalSupply" => abi::uint_value(ledger.total_supply),
            "checkBalance" => {
                let owner = args.first().and_then(abi::value_address).unwrap_or_default();
                abi::uint_value(ledger.balance_of(&owner))
            }
            "name" => abi::string_value(&ledger.name),
            "symbol" => abi::string_value(&ledger.symbol),
            "decimals" => abi::sized_uint_value(U256::from(ledger.decimals), 8),
            _ => return Err(Self::node_error("execution reverted")),
        };
        function
            .abi_encode_output(&[output])
            .map_err(|e| Self::node_error(e.to_string()))
    }

    fn receipt_policy(&self) -> ReceiptPolicy {
        self.policy
    }
}
