//! Menu choices and the actions they resolve to

use crate::crypto::parse_address;
use crate::session::InputError;
use ethereum_types::{Address, U256};
use std::str::FromStr;

pub const MENU: &str = "MENU
-----
1. Check total supply
2. Check balance
3. Transfer
4. Mint
5. Burn
6. Exit";

/// An entry of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    TotalSupply,
    Balance,
    Transfer,
    Mint,
    Burn,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::TotalSupply),
            "2" => Ok(MenuChoice::Balance),
            "3" => Ok(MenuChoice::Transfer),
            "4" => Ok(MenuChoice::Mint),
            "5" => Ok(MenuChoice::Burn),
            "6" => Ok(MenuChoice::Exit),
            other => Err(InputError::InvalidChoice(other.to_string())),
        }
    }
}

/// A fully parameterised operation on the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    TotalSupply,
    Balance { owner: Address },
    Transfer { to: Address, amount: U256 },
    Mint { amount: U256 },
    Burn { amount: U256 },
}

impl Action {
    /// Whether the action sends a transaction
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Action::TotalSupply | Action::Balance { .. })
    }
}

/// Parse an operator-entered address
///
/// Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address_input(input: &str) -> Result<Address, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty("Address".to_string()));
    }
    parse_address(input).map_err(|e| InputError::InvalidAddress {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a decimal token amount
pub fn parse_amount(input: &str) -> Result<U256, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty("Amount".to_string()));
    }
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidAmount(input.to_string()));
    }
    U256::from_dec_str(input).map_err(|_| InputError::InvalidAmount(input.to_string()))
}
