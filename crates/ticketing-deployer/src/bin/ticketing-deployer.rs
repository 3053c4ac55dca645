//! Main binary entry point for the NFTticketing deployer
//!
//! Parses arguments, sets up logging and runs the selected command. A
//! deployment exits with status 0 on success and 1 on any failure, after
//! writing a single diagnostic line to stderr.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Stderr, Stdout};
use std::process::ExitCode;
use ticketing_deployer::{
	cli::{
		exit_status,
		output::{DeployReport, Display},
		Cli, Commands,
	},
	core::init_logging,
	operations::{load_config, summarize, ContractDeployer},
	Deployment,
};
use tracing::{info, instrument};

#[tokio::main]
async fn main() -> ExitCode {
	// Load environment variables from .env file if it exists
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	init_logging(cli.debug);

	match cli.command() {
		Commands::Deploy => {
			let mut report = DeployReport::new(io::stdout(), io::stderr());
			let result = handle_deploy(&cli, &mut report).await;
			ExitCode::from(report.finish(&result))
		},
		Commands::Config => {
			let result = handle_config(&cli).await;
			if let Err(e) = &result {
				Display::error(&e.to_string());
			}
			ExitCode::from(exit_status(&result))
		},
	}
}

/// Handle the deployment command
#[instrument(skip(cli, report))]
async fn handle_deploy(cli: &Cli, report: &mut DeployReport<Stdout, Stderr>) -> Result<Deployment> {
	let config = load_config(cli.config.as_deref()).await?;
	let network = cli.network_name(&config);
	info!(network = %network, contract = %config.deployment.contract, "Deploying");

	let deployer = ContractDeployer::from_config(&config, &network).await?;
	let deployment = deployer
		.deploy(|event| report.on_event(event))
		.await?;

	// Event and ticket creation happens in the front end, not here
	Ok(deployment)
}

/// Handle the config command
#[instrument(skip(cli))]
async fn handle_config(cli: &Cli) -> Result<()> {
	let config = load_config(cli.config.as_deref()).await?;
	let network = cli.network_name(&config);
	let summary = summarize(&config, &network)?;

	for (title, rows) in [
		("Compiler", &summary.compiler),
		("Deployment", &summary.deployment),
		("Network", &summary.network),
	] {
		Display::header(title);
		for (key, value) in rows {
			Display::kv(key, value);
		}
	}

	Ok(())
}
