//! Solidity compiler settings.
//!
//! These values are inert data handed to the external build tool that turns
//! contract source into the artifact the deployer consumes. Nothing here is
//! computed at runtime; the deployer only compares them against the metadata
//! recorded in an artifact.

use crate::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Compiler release used when the configuration does not name one.
pub const DEFAULT_COMPILER_VERSION: &str = "0.8.21";

/// Optimizer execution-count target used when the configuration does not set one.
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Compiler version and optimizer parameters for contract builds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerSettings {
	/// Solidity release, `MAJOR.MINOR.PATCH`.
	#[serde(default = "default_version")]
	pub version: String,
	/// Bytecode optimizer parameters.
	#[serde(default)]
	pub optimizer: OptimizerSettings,
}

/// Optimizer toggle and its size/runtime-cost tradeoff target.
///
/// Lower `runs` favours smaller deployment bytecode, higher `runs` favours
/// cheaper execution of frequently called functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptimizerSettings {
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	#[serde(default = "default_runs")]
	pub runs: u32,
}

fn default_version() -> String {
	DEFAULT_COMPILER_VERSION.to_string()
}

fn default_enabled() -> bool {
	true
}

fn default_runs() -> u32 {
	DEFAULT_OPTIMIZER_RUNS
}

impl Default for CompilerSettings {
	fn default() -> Self {
		Self {
			version: default_version(),
			optimizer: OptimizerSettings::default(),
		}
	}
}

impl Default for OptimizerSettings {
	fn default() -> Self {
		Self {
			enabled: default_enabled(),
			runs: default_runs(),
		}
	}
}

impl CompilerSettings {
	/// Validates the version string and optimizer parameters.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let re = Regex::new(r"^\d+\.\d+\.\d+$")
			.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;
		if !re.is_match(&self.version) {
			return Err(ConfigError::Validation(format!(
				"Compiler version '{}' must be a MAJOR.MINOR.PATCH release",
				self.version
			)));
		}

		if self.optimizer.runs == 0 {
			return Err(ConfigError::Validation(
				"Optimizer runs must be a positive integer".into(),
			));
		}

		Ok(())
	}

	/// Returns true when a compiler build string reported by an artifact
	/// (e.g. `0.8.21+commit.d9974bed`) refers to the configured release.
	pub fn matches_build(&self, build: &str) -> bool {
		let release = build
			.trim_start_matches('v')
			.split(['+', '-'])
			.next()
			.unwrap_or_default();
		release == self.version
	}

	/// Renders the `settings` fragment of a solc standard-JSON input.
	pub fn solc_settings(&self) -> Value {
		json!({
			"optimizer": {
				"enabled": self.optimizer.enabled,
				"runs": self.optimizer.runs,
			}
		})
	}
}
