//! Type definitions shared across the deployer
//!
//! Contains the error type and the values the deployment procedure reports
//! while it moves from signer acquisition to confirmation.

pub mod deployment;
pub mod error;

pub use deployment::{DeployEvent, DeployStage, Deployment, DeploymentReceipt};
pub use error::{Error, Result};
