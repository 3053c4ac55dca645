//! Command-line interface definitions and parsing
//!
//! Running the binary without a subcommand deploys the configured contract.
//! Every flag can also come from the environment, so a plain invocation is
//! driven entirely by ambient configuration.

pub mod output;

use crate::constants::{self, env_vars};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(name = "ticketing-deployer")]
#[command(about = "Deploy the NFTticketing contract to an EVM network")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Configuration file (defaults to ./ticketing.toml when present)
	#[arg(global = true, long, env = env_vars::CONFIG)]
	pub config: Option<PathBuf>,

	/// Network profile to deploy to (defaults to deployment.network)
	#[arg(global = true, long, env = env_vars::NETWORK)]
	pub network: Option<String>,

	/// Enable debug logging
	#[arg(global = true, long, env = env_vars::DEBUG)]
	pub debug: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Commands {
	/// Deploy the configured contract (default)
	#[default]
	Deploy,

	/// Show the effective compiler and network configuration
	Config,
}

impl Cli {
	/// The subcommand to run, defaulting to a deployment.
	pub fn command(&self) -> Commands {
		self.command.unwrap_or_default()
	}

	/// The network profile selected on the command line or in configuration.
	pub fn network_name(&self, config: &ticketing_config::Config) -> String {
		self.network
			.clone()
			.unwrap_or_else(|| config.deployment.network.clone())
	}
}

/// Maps the outcome of a run to the process exit status.
pub fn exit_status<T, E>(result: &Result<T, E>) -> u8 {
	match result {
		Ok(_) => constants::EXIT_SUCCESS,
		Err(_) => constants::EXIT_FAILURE,
	}
}
