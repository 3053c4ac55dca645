//! Constants used by the deployer binary
//!
//! File names, environment variable names and the fixed output prefixes.

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "ticketing.toml";

/// Environment variable names
pub mod env_vars {
	pub const CONFIG: &str = "TICKETING_CONFIG";
	pub const NETWORK: &str = "TICKETING_NETWORK";
	pub const DEBUG: &str = "TICKETING_DEBUG";
}

/// Prefix of the single stderr line written when a deployment fails.
pub const ERROR_PREFIX: &str = "❌ Error in deploy.js:";

/// Process exit status for a successful run.
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status for any failed run.
pub const EXIT_FAILURE: u8 = 1;
