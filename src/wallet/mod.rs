//! Operator account management

pub mod account;

pub use account::{Account, AccountError};
