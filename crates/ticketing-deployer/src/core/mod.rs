//! Core building blocks of the deployer
//!
//! Artifact loading, blockchain access and logging setup.

pub mod artifacts;
pub mod blockchain;
pub mod logging;

pub use artifacts::{ArtifactStore, ContractFactory};
pub use blockchain::{AlloyBackend, DeploymentBackend};
pub use logging::init_logging;
