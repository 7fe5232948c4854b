//! Interactive token session
//!
//! A menu loop over a deployed Token contract. Choices are parsed into
//! [`Action`]s, which [`dispatch`] executes against the chain independently
//! of the console; [`run_session`] ties the two together.

pub mod command;
pub mod console;
pub mod context;
pub mod dispatcher;
pub mod runner;

pub use command::{parse_amount, parse_address_input, Action, MenuChoice, MENU};
pub use console::Console;
pub use context::SessionContext;
pub use dispatcher::dispatch;
pub use runner::{run_session, SessionEnd};

use crate::abi::AbiError;
use crate::contract::{ContractError, SubmitError};
use thiserror::Error;

/// Operator input that cannot be used; the operator is asked again
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error("Invalid amount {0:?}: expected a non-negative whole number")]
    InvalidAmount(String),
    #[error("{0} must not be empty")]
    Empty(String),
}

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Query failed: {0}")]
    Contract(#[from] ContractError),
    #[error("{0}")]
    Submit(#[from] SubmitError),
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),
    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Errors that end the session instead of being reported
    pub fn is_fatal(&self) -> bool {
        match self {
            SessionError::Contract(e) => e.is_connection(),
            SessionError::Submit(e) => e.is_connection(),
            SessionError::Io(_) => true,
            SessionError::Abi(_) => false,
        }
    }
}
