//! Error types and result handling for the deployer
//!
//! Errors are grouped by origin: the environment (no signer, bad key), the
//! build (missing or mismatched artifact) and the network (unreachable
//! endpoint, rejected or reverted transaction). None of them are retried;
//! they travel unchanged to the top-level handler.

use alloy_primitives::TxHash;
use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all deployment operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Environment errors
	#[error("No signer available on network '{0}'")]
	NoSigner(String),

	#[error("Invalid private key: {0}")]
	InvalidPrivateKey(String),

	// Build errors
	#[error("Artifact for contract {name} not found in {}", .dir.display())]
	ArtifactNotFound { name: String, dir: PathBuf },

	#[error("Invalid artifact {}: {reason}", .path.display())]
	InvalidArtifact { path: PathBuf, reason: String },

	// Network errors
	#[error("RPC connection failed: {0}")]
	RpcError(String),

	#[error("Chain id mismatch: network is configured for {configured} but the node reports {actual}")]
	ChainIdMismatch { configured: u64, actual: u64 },

	#[error("Failed to send transaction: {0}")]
	SubmissionFailed(String),

	#[error("Confirmation failed: {0}")]
	ConfirmationFailed(String),

	#[error("Transaction {0} reverted")]
	Reverted(TxHash),

	#[error("Deployment failed: {0}")]
	DeploymentFailed(String),

	// Configuration errors
	#[error(transparent)]
	Config(#[from] ticketing_config::ConfigError),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Builds an [`Error::InvalidArtifact`] for the given file.
	pub fn invalid_artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
		Error::InvalidArtifact {
			path: path.into(),
			reason: reason.into(),
		}
	}
}
