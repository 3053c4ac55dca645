//! Configuration module for the NFTticketing deployer.
//!
//! This module provides the structures that describe how contracts are built
//! and where they are deployed. Configuration is read from a TOML file whose
//! values may reference environment variables:
//!
//! - `${VAR}` is replaced by the value of `VAR` and fails if it is unset
//! - `${VAR:-default}` falls back to `default` (which may be empty)
//!
//! Every section is optional; an empty file yields the same configuration as
//! [`Config::default`].

pub mod compiler;
pub mod network;

pub use compiler::{CompilerSettings, OptimizerSettings};
pub use network::{NetworkConfig, PrivateKey};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Contract artifact deployed when the configuration does not name one.
pub const DEFAULT_CONTRACT: &str = "NFTticketing";

/// Directory holding compiled artifacts when the configuration does not name one.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
	/// Settings the external compiler uses to build the artifact.
	#[serde(default)]
	pub compiler: CompilerSettings,
	/// What to deploy and how to wait for it.
	#[serde(default)]
	pub deployment: DeploymentConfig,
	/// Named network profiles.
	#[serde(default = "default_networks")]
	pub networks: BTreeMap<String, NetworkConfig>,
}

/// Settings for the deployment procedure itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeploymentConfig {
	/// Name of the compiled contract artifact.
	#[serde(default = "default_contract")]
	pub contract: String,
	/// Root of the compiled artifacts tree.
	#[serde(default = "default_artifacts")]
	pub artifacts: String,
	/// Network profile used unless another one is selected.
	#[serde(default = "default_network")]
	pub network: String,
	/// Blocks required on top of inclusion before the deployment counts as confirmed.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
}

fn default_contract() -> String {
	DEFAULT_CONTRACT.to_string()
}

fn default_artifacts() -> String {
	DEFAULT_ARTIFACTS_DIR.to_string()
}

fn default_network() -> String {
	network::DEFAULT_NETWORK.to_string()
}

fn default_confirmations() -> u64 {
	1
}

fn default_networks() -> BTreeMap<String, NetworkConfig> {
	BTreeMap::from([(network::DEFAULT_NETWORK.to_string(), NetworkConfig::local())])
}

impl Default for DeploymentConfig {
	fn default() -> Self {
		Self {
			contract: default_contract(),
			artifacts: default_artifacts(),
			network: default_network(),
			confirmations: default_confirmations(),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			compiler: CompilerSettings::default(),
			deployment: DeploymentConfig::default(),
			networks: default_networks(),
		}
	}
}

/// Largest configuration document accepted for interpolation.
const MAX_CONFIG_BYTES: usize = 1 << 20;

/// `${NAME}` or `${NAME:-default}`, with bounded name and default lengths.
const ENV_REFERENCE: &str = r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}";

/// Replaces `${VAR}` and `${VAR:-default}` references with environment values.
///
/// An unset variable without a default is an error naming the first such
/// variable.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	if input.len() > MAX_CONFIG_BYTES {
		return Err(ConfigError::Validation(format!(
			"Configuration is {} bytes, limit is {} bytes",
			input.len(),
			MAX_CONFIG_BYTES
		)));
	}

	let reference = Regex::new(ENV_REFERENCE).map_err(|e| ConfigError::Parse(e.to_string()))?;

	let mut unset: Option<String> = None;
	let resolved = reference.replace_all(input, |caps: &Captures<'_>| {
		let name = &caps[1];
		match (std::env::var(name), caps.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				unset.get_or_insert_with(|| name.to_string());
				String::new()
			},
		}
	});

	match unset {
		Some(name) => Err(ConfigError::Validation(format!(
			"Environment variable '{name}' not found"
		))),
		None => Ok(resolved.into_owned()),
	}
}

impl Config {
	/// Loads configuration from a TOML file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "Loading configuration");

		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Returns the named network profile.
	pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
		self.networks.get(name).ok_or_else(|| {
			let known: Vec<&str> = self.networks.keys().map(String::as_str).collect();
			ConfigError::Validation(format!(
				"Network '{name}' is not configured (known: {})",
				known.join(", ")
			))
		})
	}

	/// Returns the profile named by `deployment.network`.
	pub fn default_network(&self) -> Result<&NetworkConfig, ConfigError> {
		self.network(&self.deployment.network)
	}

	fn normalize(&mut self) {
		self.networks
			.entry(network::DEFAULT_NETWORK.to_string())
			.or_insert_with(NetworkConfig::local);

		for network in self.networks.values_mut() {
			network.normalize();
		}
	}

	/// Validates all sections.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.compiler.validate()?;

		if self.deployment.contract.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Deployment contract name cannot be empty".into(),
			));
		}

		if self.deployment.artifacts.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Artifacts directory cannot be empty".into(),
			));
		}

		if self.deployment.confirmations == 0 {
			return Err(ConfigError::Validation(
				"Deployment confirmations must be at least 1".into(),
			));
		}

		for (name, network) in &self.networks {
			network.validate(name)?;
		}

		self.default_network()?;

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let mut config: Config = toml::from_str(&resolved)?;
		config.normalize();
		config.validate()?;
		Ok(config)
	}
}
