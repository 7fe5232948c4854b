//! Solidity contract ABI
//!
//! The compiler's `abi` array is parsed into an `alloy-json-abi`
//! [`JsonAbi`]; calldata, constructor arguments and return data go through
//! `alloy-dyn-abi`. The rest of the crate works in `ethereum-types`, so
//! [`values`] converts at this boundary.

pub mod values;

pub use alloy_dyn_abi::DynSolValue;
pub use alloy_json_abi::{Function, JsonAbi};
pub use values::{
    address_value, sized_uint_value, string_value, uint_value, value_address, value_string,
    value_uint,
};

use alloy_dyn_abi::{FunctionExt, JsonAbiExt};
use thiserror::Error;

/// ABI errors
#[derive(Error, Debug)]
pub enum AbiError {
    #[error("Function not found in ABI: {0}")]
    UnknownFunction(String),
    #[error("Contract has no constructor, got {0} argument(s)")]
    NoConstructor(usize),
    #[error("Call data does not target {0}")]
    SelectorMismatch(String),
    #[error("Creation payload does not start with the contract bytecode")]
    BytecodeMismatch,
    #[error("Invalid ABI data: {0}")]
    Codec(#[from] alloy_dyn_abi::Error),
    #[error("Malformed ABI JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse the `abi` array of a compiled contract
pub fn parse(value: serde_json::Value) -> Result<JsonAbi, AbiError> {
    Ok(serde_json::from_value(value)?)
}

/// Look up `name`; the first overload wins
pub fn function<'a>(abi: &'a JsonAbi, name: &str) -> Result<&'a Function, AbiError> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))
}

/// Selector followed by the encoded arguments
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>, AbiError> {
    Ok(function.abi_encode_input(args)?)
}

pub fn decode_call(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    let selector = function.selector();
    let args = data
        .strip_prefix(selector.as_slice())
        .ok_or_else(|| AbiError::SelectorMismatch(function.signature()))?;
    Ok(function.abi_decode_input(args, true)?)
}

pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    Ok(function.abi_decode_output(data, true)?)
}

/// Creation payload: `bytecode` followed by the encoded constructor arguments
pub fn encode_deploy(
    abi: &JsonAbi,
    bytecode: &[u8],
    args: &[DynSolValue],
) -> Result<Vec<u8>, AbiError> {
    let mut payload = bytecode.to_vec();
    match &abi.constructor {
        Some(constructor) => payload.extend(constructor.abi_encode_input(args)?),
        None if args.is_empty() => {}
        None => return Err(AbiError::NoConstructor(args.len())),
    }
    Ok(payload)
}

/// Constructor arguments of a payload built by [`encode_deploy`]
pub fn decode_deploy(
    abi: &JsonAbi,
    bytecode: &[u8],
    payload: &[u8],
) -> Result<Vec<DynSolValue>, AbiError> {
    let args = payload
        .strip_prefix(bytecode)
        .ok_or(AbiError::BytecodeMismatch)?;
    match &abi.constructor {
        Some(constructor) => Ok(constructor.abi_decode_input(args, true)?),
        None => Ok(Vec::new()),
    }
}
