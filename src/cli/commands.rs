//! CLI commands for the token deployer
//!
//! Compiles the contract, connects to the node, collects the operator's
//! account and token parameters, deploys, and hands over to the menu.

use crate::config::Config;
use crate::contract::{deploy, CompiledArtifact, SvmInstaller, TokenParams};
use crate::crypto::to_checksum_address;
use crate::rpc::ChainClient;
use crate::session::{
    parse_address_input, parse_amount, run_session, Console, InputError, SessionContext,
    SessionEnd,
};
use crate::wallet::Account;
use std::fs;
use std::io::{BufRead, Write};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// What the operator enters before deployment
#[derive(Debug)]
pub struct OperatorInput {
    pub account: Account,
    pub params: TokenParams,
}

/// Compile, deploy and run the interactive session on stdin/stdout
pub async fn cmd_run(config: &Config) -> CliResult<()> {
    println!("🔨 Compiling {:?}...", config.source);
    let source = fs::read_to_string(&config.source)
        .map_err(|e| format!("Cannot read {:?}: {}", config.source, e))?;
    let mut compiler = config.compiler();
    if config.install_solc {
        compiler = compiler.ensure_version(&SvmInstaller).await?;
    }
    let artifact = compiler.compile(&source)?;
    println!(
        "   ✅ {} compiled ({} bytes)",
        artifact.contract_name,
        artifact.bytecode.len()
    );
    if let Some(path) = &config.artifact_path {
        println!("   📄 Compiler output saved to {:?}", path);
    }

    let client = config.client()?;
    println!("🔗 Connecting to {}...", client.url());

    let mut console = Console::stdio();
    match cmd_deploy_and_run(config, &artifact, &client, &mut console).await? {
        SessionEnd::EndOfInput => println!("\n👋 End of input, goodbye"),
        _ => println!("👋 Goodbye"),
    }
    Ok(())
}

/// Everything after compilation, over any chain and console
pub async fn cmd_deploy_and_run<C, R, W>(
    config: &Config,
    artifact: &CompiledArtifact,
    chain: &C,
    console: &mut Console<R, W>,
) -> CliResult<SessionEnd>
where
    C: ChainClient,
    R: BufRead,
    W: Write,
{
    match chain.chain_id().await {
        Ok(node_chain_id) if node_chain_id != config.chain_id => log::warn!(
            "Node reports chain id {}, signing for {}",
            node_chain_id,
            config.chain_id
        ),
        Ok(_) => {}
        Err(e) if e.is_connection() => return Err(e.into()),
        Err(e) => log::warn!(
            "Could not read the node's chain id ({}), signing for {}",
            e,
            config.chain_id
        ),
    }

    let Some(input) = read_operator_input(console)? else {
        return Ok(SessionEnd::EndOfInput);
    };
    let OperatorInput { account, params } = input;

    console.write_line(&format!(
        "\n🚀 Deploying {} ({}) from {}...",
        params.name,
        params.symbol,
        account.checksum_address()
    ))?;
    let deployment = deploy(
        chain,
        artifact,
        &account,
        &params.constructor_args(),
        config.chain_id,
    )
    .await?;

    console.write_line(&format!(
        "   ✅ Contract deployed at {}",
        to_checksum_address(&deployment.contract.address())
    ))?;
    console.write_line(&format!(
        "   🧾 Transaction: {:?}",
        deployment.receipt.transaction_hash
    ))?;

    let mut ctx = SessionContext::new(account, deployment, config.chain_id, &params.symbol);
    let end = run_session(&mut ctx, chain, console).await?;
    log::info!(
        "Session ended ({:?}) after {} transactions",
        end,
        ctx.transactions_sent()
    );
    Ok(end)
}

/// Prompt for account and token parameters; `None` at end of input
pub fn read_operator_input<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> CliResult<Option<OperatorInput>> {
    let Some(address) = console.prompt_parsed("Enter your address: ", |s| {
        parse_address_input(s).map(|_| s.trim().to_string())
    })?
    else {
        return Ok(None);
    };

    let account = loop {
        let Some(key) = console.prompt("Enter your private key: ")? else {
            return Ok(None);
        };
        match Account::with_address(&address, key.trim()) {
            Ok(account) => break account,
            Err(e) => console.write_line(&format!("⚠️  {}", e))?,
        }
    };

    let Some(name) = console.prompt_parsed("Enter token name: ", |s| non_empty("Token name", s))?
    else {
        return Ok(None);
    };
    let Some(symbol) =
        console.prompt_parsed("Enter token symbol: ", |s| non_empty("Token symbol", s))?
    else {
        return Ok(None);
    };
    let Some(decimals) = console.prompt_parsed("Enter token decimals: ", parse_decimals)? else {
        return Ok(None);
    };
    let Some(total_supply) = console.prompt_parsed("Enter total supply: ", parse_amount)? else {
        return Ok(None);
    };

    Ok(Some(OperatorInput {
        account,
        params: TokenParams::new(&name, &symbol, decimals, total_supply),
    }))
}

fn non_empty(what: &str, input: &str) -> Result<String, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty(what.to_string()));
    }
    Ok(input.to_string())
}

fn parse_decimals(input: &str) -> Result<u8, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty("Decimals".to_string()));
    }
    input
        .parse::<u8>()
        .map_err(|_| InputError::InvalidAmount(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{token_artifact, MockChain, DEPLOYER_ADDRESS, DEPLOYER_KEY};
    use ethereum_types::U256;

    fn startup(extra: &str) -> String {
        format!(
            "{}\n{}\nGold\ngld\n18\n1000\n{}",
            DEPLOYER_ADDRESS, DEPLOYER_KEY, extra
        )
    }

    #[test]
    fn test_read_operator_input() {
        let script = startup("");
        let mut console = Console::new(script.as_bytes(), Vec::new());

        let input = read_operator_input(&mut console).unwrap().unwrap();
        assert_eq!(input.account.checksum_address(), DEPLOYER_ADDRESS);
        assert_eq!(input.params.name, "Gold");
        assert_eq!(input.params.symbol, "GLD");
        assert_eq!(input.params.decimals, 18);
        assert_eq!(input.params.total_supply, U256::from(1000));
    }

    #[test]
    fn test_key_must_control_address() {
        let other_key = "0x0000000000000000000000000000000000000000000000000000000000000001";
        let script = format!(
            "{}\n{}\n{}\nGold\nGLD\n300\n18\n1000\n",
            DEPLOYER_ADDRESS, other_key, DEPLOYER_KEY
        );
        let mut console = Console::new(script.as_bytes(), Vec::new());

        let input = read_operator_input(&mut console).unwrap().unwrap();
        assert_eq!(input.params.decimals, 18);

        let output = String::from_utf8(console.into_parts().1).unwrap();
        assert!(output.contains("Private key controls"));
        // 300 does not fit in uint8
        assert!(output.contains("Invalid amount \"300\""));
    }

    #[test]
    fn test_operator_input_eof() {
        let mut console = Console::new("".as_bytes(), Vec::new());
        assert!(read_operator_input(&mut console).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deploy_and_run() {
        let chain = MockChain::new();
        let script = startup("1\ny\n4\n500\ny\n1\nn\n");
        let mut console = Console::new(script.as_bytes(), Vec::new());

        let end = cmd_deploy_and_run(&Config::default(), &token_artifact(), &chain, &mut console)
            .await
            .unwrap();
        assert_eq!(end, SessionEnd::Declined);

        let output = String::from_utf8(console.into_parts().1).unwrap();
        assert!(output.contains("Contract deployed at 0x"));
        assert!(output.contains("Total supply of GLD token is 1000"));
        assert!(output.contains("Total supply of GLD token is 1500"));
    }

    #[tokio::test]
    async fn test_chain_id_not_supported_is_not_fatal() {
        let chain = MockChain::new().without_chain_id();
        let script = startup("1\ny\n4\n500\nn\n");
        let mut console = Console::new(script.as_bytes(), Vec::new());

        let end = cmd_deploy_and_run(&Config::default(), &token_artifact(), &chain, &mut console)
            .await
            .unwrap();
        assert_eq!(end, SessionEnd::Declined);

        let output = String::from_utf8(console.into_parts().1).unwrap();
        assert!(output.contains("Contract deployed at 0x"));
        assert!(output.contains("Total supply of GLD token is 1000"));
        assert!(output.contains("Total supply of GLD token after mint is 1500"));
        assert_eq!(chain.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_fatal() {
        let chain = MockChain::new();
        chain.disconnect();
        let script = startup("");
        let mut console = Console::new(script.as_bytes(), Vec::new());

        let result =
            cmd_deploy_and_run(&Config::default(), &token_artifact(), &chain, &mut console).await;
        assert!(result.is_err());
    }
}
