//! Configuration loading and inspection
//!
//! Resolves which configuration file applies and flattens the effective
//! settings into rows for display.

use crate::{constants, types::error::Result};
use std::path::Path;
use ticketing_config::Config;
use tracing::debug;

/// Loads configuration from `path`, from the default file when it exists,
/// or falls back to built-in defaults.
///
/// # Errors
/// An explicitly requested file that is missing or invalid is an error; a
/// missing default file is not.
pub async fn load_config(path: Option<&Path>) -> Result<Config> {
	if let Some(path) = path {
		return Ok(Config::from_file(path).await?);
	}

	let default_path = Path::new(constants::DEFAULT_CONFIG_FILE);
	if default_path.is_file() {
		return Ok(Config::from_file(default_path).await?);
	}

	debug!("No configuration file found, using defaults");
	Ok(Config::default())
}

/// Effective settings for one network, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
	pub compiler: Vec<(String, String)>,
	pub deployment: Vec<(String, String)>,
	pub network: Vec<(String, String)>,
}

/// Flattens the configuration as it applies to `network`.
///
/// # Errors
/// Returns an error if `network` is not configured.
pub fn summarize(config: &Config, network: &str) -> Result<ConfigSummary> {
	let profile = config.network(network)?;

	let compiler = vec![
		("Version".to_string(), config.compiler.version.clone()),
		(
			"Optimizer".to_string(),
			if config.compiler.optimizer.enabled {
				"enabled".to_string()
			} else {
				"disabled".to_string()
			},
		),
		(
			"Optimizer runs".to_string(),
			config.compiler.optimizer.runs.to_string(),
		),
		(
			"solc settings".to_string(),
			config.compiler.solc_settings().to_string(),
		),
	];

	let deployment = vec![
		("Contract".to_string(), config.deployment.contract.clone()),
		("Artifacts".to_string(), config.deployment.artifacts.clone()),
		(
			"Confirmations".to_string(),
			config.deployment.confirmations.to_string(),
		),
	];

	let signer = match profile.accounts.len() {
		0 => "first unlocked node account".to_string(),
		n => format!("configured key (1 of {})", n),
	};

	let network = vec![
		("Name".to_string(), network.to_string()),
		("RPC URL".to_string(), profile.url.clone()),
		(
			"Chain ID".to_string(),
			profile
				.chain_id
				.map(|id| id.to_string())
				.unwrap_or_else(|| "any".to_string()),
		),
		("Signer".to_string(), signer),
	];

	Ok(ConfigSummary {
		compiler,
		deployment,
		network,
	})
}
