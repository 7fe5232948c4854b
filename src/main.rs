//! Token Deployer CLI Application
//!
//! Compiles the Token contract, deploys it to a local development chain and
//! opens the interactive token menu.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use token_deployer::cli;
use token_deployer::config::{
    Config, DEFAULT_ARTIFACT, DEFAULT_CHAIN_ID, DEFAULT_RPC_URL, DEFAULT_SOURCE,
};
use token_deployer::contract::compiler::{DEFAULT_CONTRACT_NAME, DEFAULT_SOLC, DEFAULT_SOLC_VERSION};

#[derive(Parser)]
#[command(name = "token-deployer")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Deploy and operate a Solidity token on a local development chain", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint of the node
    #[arg(long, default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Chain id used to sign transactions
    #[arg(long, default_value_t = DEFAULT_CHAIN_ID)]
    chain_id: u64,

    /// Solidity source file
    #[arg(short, long, default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Contract to deploy from the source
    #[arg(long, default_value = DEFAULT_CONTRACT_NAME)]
    contract: String,

    /// Path to the solc binary
    #[arg(long, default_value = DEFAULT_SOLC)]
    solc: PathBuf,

    /// Required compiler version
    #[arg(long, default_value = DEFAULT_SOLC_VERSION)]
    solc_version: String,

    /// Accept whatever version the solc binary reports
    #[arg(long)]
    any_solc: bool,

    /// Fail instead of installing the required solc version
    #[arg(long)]
    no_install: bool,

    /// File receiving the raw compiler output
    #[arg(long, default_value = DEFAULT_ARTIFACT)]
    artifact: PathBuf,

    /// Do not write the compiler output
    #[arg(long)]
    no_artifact: bool,

    /// Seconds to wait for a single JSON-RPC response
    #[arg(long, default_value_t = 30)]
    request_timeout: u64,

    /// Seconds to wait for a transaction receipt
    #[arg(long, default_value_t = 120)]
    receipt_timeout: u64,

    /// Milliseconds between receipt polls
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            rpc_url: self.rpc_url,
            chain_id: self.chain_id,
            source: self.source,
            contract_name: self.contract,
            solc: self.solc,
            solc_version: (!self.any_solc).then_some(self.solc_version),
            install_solc: !self.no_install,
            artifact_path: (!self.no_artifact).then_some(self.artifact),
            request_timeout: Duration::from_secs(self.request_timeout),
            receipt_timeout: Duration::from_secs(self.receipt_timeout),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger; prompts share stdout, so stay quiet by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Cli::parse().into_config();
    log::debug!("{:?}", config);

    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(cli::cmd_run(&config)) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
