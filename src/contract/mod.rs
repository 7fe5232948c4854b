//! Token contract lifecycle
//!
//! Compiles the Solidity source with `solc`, deploys the result and wraps the
//! deployed address in a typed handle.
//!
//! # Example
//!
//! ```ignore
//! use token_deployer::contract::{deploy, SolcCompiler, TokenParams};
//!
//! let artifact = SolcCompiler::new().compile(&source)?;
//! let params = TokenParams::new("Gold", "GLD", 18, 1000.into());
//! let deployment = deploy(&client, &artifact, &account, &params.constructor_args(), 1337).await?;
//! println!("Token at {:?}", deployment.contract.address());
//! ```

pub mod compiler;
pub mod deploy;
pub mod installer;
pub mod token;
pub mod transactor;

pub use compiler::{CompiledArtifact, CompilerError, SolcCompiler};
pub use deploy::{deploy, DeployError, Deployment};
pub use installer::{SolcInstaller, SvmInstaller};
pub use token::{ContractError, TokenContract, TokenParams};
pub use transactor::{submit, SubmitError};
