//! Conversions between `ethereum-types` and dynamic ABI values

use alloy_dyn_abi::DynSolValue;
use ethereum_types::{Address, U256};

pub fn uint_value(value: U256) -> DynSolValue {
    sized_uint_value(value, 256)
}

/// `uint<bits>`; the width must match the parameter type
pub fn sized_uint_value(value: U256, bits: usize) -> DynSolValue {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    DynSolValue::Uint(alloy_primitives::U256::from_be_bytes(word), bits)
}

pub fn address_value(address: Address) -> DynSolValue {
    DynSolValue::Address(alloy_primitives::Address::from_slice(address.as_bytes()))
}

pub fn string_value(value: &str) -> DynSolValue {
    DynSolValue::String(value.to_string())
}

pub fn value_uint(value: &DynSolValue) -> Option<U256> {
    value
        .as_uint()
        .map(|(uint, _)| U256::from_big_endian(&uint.to_be_bytes::<32>()))
}

pub fn value_address(value: &DynSolValue) -> Option<Address> {
    value
        .as_address()
        .map(|address| Address::from_slice(address.as_slice()))
}

pub fn value_string(value: &DynSolValue) -> Option<String> {
    value.as_str().map(str::to_string)
}
