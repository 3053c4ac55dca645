//! Network profiles the deployer can target.
//!
//! Each profile names an RPC endpoint and, optionally, the chain id the
//! endpoint is expected to report and the private keys to sign with. When no
//! keys are configured the deployer falls back to the node's unlocked accounts.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the profile used when nothing else is selected.
pub const DEFAULT_NETWORK: &str = "localhost";

/// RPC endpoint of a local development node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Chain id reported by local development nodes.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Connection and signing settings for one network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint.
	pub url: String,
	/// Chain id the endpoint must report, if pinned.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chain_id: Option<u64>,
	/// Signing keys in priority order; the first one deploys.
	#[serde(default)]
	pub accounts: Vec<PrivateKey>,
	/// Receipt polling interval override in milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub poll_interval_ms: Option<u64>,
}

impl NetworkConfig {
	/// Profile for a local development node.
	pub fn local() -> Self {
		Self {
			url: DEFAULT_RPC_URL.to_string(),
			chain_id: Some(LOCAL_CHAIN_ID),
			accounts: Vec::new(),
			poll_interval_ms: None,
		}
	}

	/// Drops blank account entries left behind by unset
	/// `${VAR:-}` placeholders.
	pub(crate) fn normalize(&mut self) {
		self.accounts.retain(|key| !key.is_blank());
	}

	pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigError> {
		if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' url must be an http(s) endpoint, got '{}'",
				self.url
			)));
		}

		if self.chain_id == Some(0) {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' chain_id must be non-zero"
			)));
		}

		for (index, key) in self.accounts.iter().enumerate() {
			key.validate().map_err(|reason| {
				ConfigError::Validation(format!(
					"Network '{name}' account #{index} is invalid: {reason}"
				))
			})?;
		}

		Ok(())
	}
}

/// Hex-encoded secp256k1 private key.
///
/// The key is kept out of `Debug` output so configurations can be logged.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PrivateKey(String);

impl PrivateKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Returns the raw key material.
	pub fn expose(&self) -> &str {
		self.0.trim()
	}

	fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}

	fn validate(&self) -> Result<(), String> {
		let key = self.expose();
		let key = key.strip_prefix("0x").unwrap_or(key);

		if key.len() != 64 {
			return Err("private key must be 64 hex characters (32 bytes)".to_string());
		}
		if !key.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err("private key must be valid hexadecimal".to_string());
		}

		Ok(())
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("PrivateKey(<redacted>)")
	}
}
