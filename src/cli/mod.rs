//! Command-line front end

pub mod commands;

pub use commands::{cmd_deploy_and_run, cmd_run, read_operator_input, CliResult, OperatorInput};
