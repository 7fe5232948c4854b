//! Handle on a deployed Token contract
//!
//! Encodes calls against the contract's ABI and decodes the results of
//! read-only queries.

use crate::abi::{self, AbiError, DynSolValue, JsonAbi};
use crate::rpc::{CallRequest, ChainClient, RpcError};
use ethereum_types::{Address, U256};
use thiserror::Error;

/// Read-only supply query
pub const FN_TOTAL_SUPPLY: &str = "checkTotalSupply";
/// Read-only balance query
pub const FN_BALANCE: &str = "checkBalance";
pub const FN_TRANSFER: &str = "transfer";
pub const FN_MINT: &str = "mint";
pub const FN_BURN: &str = "burn";

/// Contract interaction errors
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
    #[error("{function} returned unexpected output")]
    UnexpectedOutput { function: String },
}

impl ContractError {
    pub fn is_connection(&self) -> bool {
        matches!(self, ContractError::Rpc(e) if e.is_connection())
    }
}

/// Token constructor arguments collected at startup
#[derive(Debug, Clone, PartialEq)]
pub struct TokenParams {
    pub name: String,
    /// Stored upper-cased
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

impl TokenParams {
    pub fn new(name: &str, symbol: &str, decimals: u8, total_supply: U256) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_uppercase(),
            decimals,
            total_supply,
        }
    }

    /// Arguments in constructor order
    pub fn constructor_args(&self) -> Vec<DynSolValue> {
        vec![
            abi::string_value(&self.name),
            abi::string_value(&self.symbol),
            abi::sized_uint_value(U256::from(self.decimals), 8),
            abi::uint_value(self.total_supply),
        ]
    }
}

/// A deployed Token contract
#[derive(Debug, Clone, PartialEq)]
pub struct TokenContract {
    address: Address,
    abi: JsonAbi,
}

impl TokenContract {
    pub fn new(address: Address, abi: JsonAbi) -> Self {
        Self { address, abi }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Calldata for `function(args)`
    pub fn encode_call(&self, function: &str, args: &[DynSolValue]) -> Result<Vec<u8>, AbiError> {
        abi::encode_call(abi::function(&self.abi, function)?, args)
    }

    pub fn transfer_data(&self, to: Address, amount: U256) -> Result<Vec<u8>, AbiError> {
        self.encode_call(FN_TRANSFER, &[abi::address_value(to), abi::uint_value(amount)])
    }

    pub fn mint_data(&self, amount: U256) -> Result<Vec<u8>, AbiError> {
        self.encode_call(FN_MINT, &[abi::uint_value(amount)])
    }

    pub fn burn_data(&self, amount: U256) -> Result<Vec<u8>, AbiError> {
        self.encode_call(FN_BURN, &[abi::uint_value(amount)])
    }

    /// Run a read-only function through `eth_call` and decode its outputs
    pub async fn query<C: ChainClient>(
        &self,
        chain: &C,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, ContractError> {
        let function = abi::function(&self.abi, function)?;
        let request = CallRequest {
            to: Some(self.address),
            data: abi::encode_call(function, args)?.into(),
            ..Default::default()
        };

        let output = chain.call(&request).await?;
        Ok(abi::decode_output(function, &output)?)
    }

    pub async fn total_supply<C: ChainClient>(&self, chain: &C) -> Result<U256, ContractError> {
        let outputs = self.query(chain, FN_TOTAL_SUPPLY, &[]).await?;
        single_uint(FN_TOTAL_SUPPLY, outputs)
    }

    pub async fn balance_of<C: ChainClient>(
        &self,
        chain: &C,
        owner: Address,
    ) -> Result<U256, ContractError> {
        let outputs = self
            .query(chain, FN_BALANCE, &[abi::address_value(owner)])
            .await?;
        single_uint(FN_BALANCE, outputs)
    }
}

fn single_uint(function: &str, outputs: Vec<DynSolValue>) -> Result<U256, ContractError> {
    outputs
        .first()
        .and_then(abi::value_uint)
        .ok_or_else(|| ContractError::UnexpectedOutput {
            function: function.to_string(),
        })
}
