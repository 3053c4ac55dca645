//! Deployment tooling for the NFTticketing contract.
//!
//! Loads the compiled artifact, connects to the selected network and runs the
//! one-shot deployment sequence. The binary in `src/bin` wires these pieces
//! to the command line.

pub mod cli;
pub mod constants;
pub mod core;
pub mod operations;
pub mod types;

pub use core::{AlloyBackend, ArtifactStore, ContractFactory, DeploymentBackend};
pub use operations::ContractDeployer;
pub use types::{DeployEvent, DeployStage, Deployment, DeploymentReceipt, Error, Result};
