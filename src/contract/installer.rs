//! Pinned `solc` releases
//!
//! Official releases are downloaded and cached by `svm-rs` in its data
//! directory (`~/.svm`), one binary per version.

use crate::contract::compiler::CompilerError;
use semver::Version;
use std::fmt::Display;
use std::path::PathBuf;

/// Source of compiler binaries
#[allow(async_fn_in_trait)]
pub trait SolcInstaller {
    /// Path to a `solc` binary of exactly `version`, installing it if needed
    async fn install(&self, version: &str) -> Result<PathBuf, CompilerError>;
}

/// Installs releases with svm-rs
#[derive(Debug, Clone, Copy, Default)]
pub struct SvmInstaller;

impl SolcInstaller for SvmInstaller {
    async fn install(&self, version: &str) -> Result<PathBuf, CompilerError> {
        let parsed = Version::parse(version).map_err(|e| install_error(version, e))?;

        let installed = svm::installed_versions().map_err(|e| install_error(version, e))?;
        if installed.contains(&parsed) {
            log::debug!("solc {} already installed", version);
            return Ok(svm::version_binary(version));
        }

        println!("   ⬇️  Installing solc {}...", version);
        svm::install(&parsed)
            .await
            .map_err(|e| install_error(version, e))
    }
}

fn install_error(version: &str, reason: impl Display) -> CompilerError {
    CompilerError::Install {
        version: version.to_string(),
        reason: reason.to_string(),
    }
}
