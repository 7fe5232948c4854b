//! Solidity compiler adapter
//!
//! Drives an external `solc` binary through its standard JSON interface and
//! extracts the bytecode and ABI of a single contract.

use crate::abi::{self, AbiError, JsonAbi};
use crate::contract::installer::SolcInstaller;
use serde_json::{json, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Compiler binary looked up on `PATH` by default
pub const DEFAULT_SOLC: &str = "solc";

/// Compiler version the token contract is written against
pub const DEFAULT_SOLC_VERSION: &str = "0.8.0";

/// File name the source is registered under in the standard JSON input
pub const SOURCE_FILE_NAME: &str = "token.sol";

/// Name of the contract extracted from the output
pub const DEFAULT_CONTRACT_NAME: &str = "Token";

/// Outputs requested for every contract
pub const OUTPUT_SELECTION: [&str; 4] = ["abi", "metadata", "evm.bytecode", "evm.sourceMap"];

/// Compiler errors
#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("Solidity compiler not found: {0}")]
    NotFound(String),
    #[error("solc {required} is not available (found {found})")]
    VersionUnavailable { required: String, found: String },
    #[error("Could not install solc {version}: {reason}")]
    Install { version: String, reason: String },
    #[error("Compilation failed:\n{0}")]
    Compilation(String),
    #[error("Contract {contract} not found in {file}")]
    MissingContract { file: String, contract: String },
    #[error("Contract {0} has no bytecode (abstract contract or interface?)")]
    MissingBytecode(String),
    #[error("Invalid bytecode hex: {0}")]
    InvalidBytecode(#[from] hex::FromHexError),
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Bytecode and ABI of a compiled contract
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArtifact {
    pub contract_name: String,
    /// Creation bytecode
    pub bytecode: Vec<u8>,
    pub abi: JsonAbi,
}

/// Adapter around the `solc` command line
#[derive(Debug, Clone)]
pub struct SolcCompiler {
    solc: PathBuf,
    required_version: Option<String>,
    contract_name: String,
    artifact_path: Option<PathBuf>,
}

impl SolcCompiler {
    /// Create a compiler using `solc` from `PATH`, pinned to the default version
    pub fn new() -> Self {
        Self {
            solc: PathBuf::from(DEFAULT_SOLC),
            required_version: Some(DEFAULT_SOLC_VERSION.to_string()),
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            artifact_path: None,
        }
    }

    pub fn with_solc(mut self, solc: impl Into<PathBuf>) -> Self {
        self.solc = solc.into();
        self
    }

    /// Require an exact compiler version, or accept any with `None`
    pub fn with_required_version(mut self, version: Option<String>) -> Self {
        self.required_version = version;
        self
    }

    pub fn with_contract_name(mut self, name: &str) -> Self {
        self.contract_name = name.to_string();
        self
    }

    /// Write the raw compiler output to `path` on every compilation
    pub fn with_artifact_path(mut self, path: Option<PathBuf>) -> Self {
        self.artifact_path = path;
        self
    }

    /// Standard JSON input for `source`
    pub fn standard_input(&self, source: &str) -> Value {
        let mut sources = serde_json::Map::new();
        sources.insert(SOURCE_FILE_NAME.to_string(), json!({ "content": source }));

        json!({
            "language": "Solidity",
            "sources": sources,
            "settings": {
                "outputSelection": {
                    "*": { "*": OUTPUT_SELECTION }
                }
            }
        })
    }

    /// Version reported by the compiler binary, e.g. `0.8.0`
    pub fn version(&self) -> Result<String, CompilerError> {
        let output = Command::new(&self.solc)
            .arg("--version")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let text = String::from_utf8_lossy(&output.stdout);
        parse_version(&text).ok_or_else(|| {
            CompilerError::Compilation(format!("unrecognised `solc --version` output: {}", text))
        })
    }

    /// Switch to an installed copy of the pinned version when the configured
    /// binary is missing or reports another version
    pub async fn ensure_version<I: SolcInstaller>(self, installer: &I) -> Result<Self, CompilerError> {
        let Some(required) = self.required_version.clone() else {
            return Ok(self);
        };

        match self.version() {
            Ok(found) if found == required => return Ok(self),
            Ok(found) => log::info!("{:?} is solc {}, need {}", self.solc, found, required),
            Err(CompilerError::NotFound(_)) => {
                log::info!("{:?} not found, need solc {}", self.solc, required)
            }
            Err(e) => return Err(e),
        }

        let solc = installer.install(&required).await?;
        log::info!("Using solc {} at {:?}", required, solc);
        Ok(self.with_solc(solc))
    }

    /// Compile `source` and extract the configured contract
    pub fn compile(&self, source: &str) -> Result<CompiledArtifact, CompilerError> {
        if let Some(required) = &self.required_version {
            let found = self.version()?;
            if &found != required {
                return Err(CompilerError::VersionUnavailable {
                    required: required.clone(),
                    found,
                });
            }
        }

        let input = serde_json::to_vec(&self.standard_input(source))?;
        let raw_output = self.run_standard_json(&input)?;
        let output: Value = serde_json::from_slice(&raw_output)?;

        if let Some(path) = &self.artifact_path {
            persist_output(&output, path)?;
        }

        let artifact = extract_artifact(&output, SOURCE_FILE_NAME, &self.contract_name)?;
        log::info!(
            "Compiled {} ({} bytes of bytecode, {} functions)",
            artifact.contract_name,
            artifact.bytecode.len(),
            artifact.abi.functions().count()
        );
        Ok(artifact)
    }

    fn run_standard_json(&self, input: &[u8]) -> Result<Vec<u8>, CompilerError> {
        let mut child = Command::new(&self.solc)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // solc reads the whole input before writing anything
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() && output.stdout.is_empty() {
            return Err(CompilerError::Compilation(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(output.stdout)
    }

    fn spawn_error(&self, error: std::io::Error) -> CompilerError {
        if error.kind() == ErrorKind::NotFound {
            CompilerError::NotFound(self.solc.display().to_string())
        } else {
            CompilerError::IoError(error)
        }
    }
}

impl Default for SolcCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `contracts.<file>.<contract>` from standard JSON output
pub fn extract_artifact(
    output: &Value,
    file: &str,
    contract: &str,
) -> Result<CompiledArtifact, CompilerError> {
    let mut errors = Vec::new();
    for diagnostic in output["errors"].as_array().into_iter().flatten() {
        let text = diagnostic["formattedMessage"]
            .as_str()
            .or_else(|| diagnostic["message"].as_str())
            .unwrap_or("unknown compiler diagnostic")
            .trim()
            .to_string();

        if diagnostic["severity"] == "error" {
            errors.push(text);
        } else {
            log::warn!("solc: {}", text);
        }
    }
    if !errors.is_empty() {
        return Err(CompilerError::Compilation(errors.join("\n")));
    }

    let entry = &output["contracts"][file][contract];
    if entry.is_null() {
        return Err(CompilerError::MissingContract {
            file: file.to_string(),
            contract: contract.to_string(),
        });
    }

    let object = entry["evm"]["bytecode"]["object"].as_str().unwrap_or("");
    let object = object.strip_prefix("0x").unwrap_or(object);
    if object.is_empty() {
        return Err(CompilerError::MissingBytecode(contract.to_string()));
    }

    Ok(CompiledArtifact {
        contract_name: contract.to_string(),
        bytecode: hex::decode(object)?,
        abi: abi::parse(entry["abi"].clone())?,
    })
}

/// Save raw compiler output for inspection
pub fn persist_output(output: &Value, path: &Path) -> Result<(), CompilerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(output)?)?;
    log::debug!("Compiler output written to {:?}", path);
    Ok(())
}

/// Pull `0.8.0` out of `Version: 0.8.0+commit.c7dfd78e.Linux.g++`
pub fn parse_version(text: &str) -> Option<String> {
    let line = text.lines().find(|l| l.trim_start().starts_with("Version:"))?;
    let full = line.trim_start().trim_start_matches("Version:").trim();
    let version = full.split(|c: char| c == '+' || c == '-').next()?.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
