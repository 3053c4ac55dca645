//! Logging setup and stage logging helpers
//!
//! Structured logs go to stderr so stdout carries only the deployment lines
//! the caller may parse.

use crate::types::{DeployEvent, DeployStage};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is not set.
///
/// Without `debug` only errors pass, which keeps the failure line the only
/// stderr output of a failed deployment.
pub fn default_directives(debug: bool) -> &'static str {
	if debug {
		"ticketing_deployer=debug,ticketing_config=debug,info"
	} else {
		"error"
	}
}

/// Initialize structured logging with configurable verbosity
///
/// `RUST_LOG` overrides the defaults from [`default_directives`].
pub fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

	let _ = tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.try_init();
}

/// Records a completed deployment stage.
pub fn stage_completed(event: &DeployEvent) {
	match event {
		DeployEvent::SignerAcquired { address } => {
			info!(stage = %event.stage(), signer = %address, "Signer acquired");
		},
		DeployEvent::FactoryObtained {
			contract,
			bytecode_len,
		} => {
			info!(
				stage = %event.stage(),
				contract = %contract,
				bytecode_len = bytecode_len,
				"Contract factory ready"
			);
		},
		DeployEvent::Submitted { tx_hash } => {
			info!(stage = %event.stage(), tx_hash = %tx_hash, "Deployment transaction submitted");
		},
		DeployEvent::Confirmed { receipt } => {
			info!(
				stage = %event.stage(),
				address = %receipt.contract_address,
				block_number = ?receipt.block_number,
				"Deployment confirmed"
			);
		},
	}
}

/// Records the stage a deployment stopped at.
pub fn stage_failed(reached: DeployStage, error: &crate::types::Error) {
	debug!(reached = %reached, error = %error, "Deployment aborted");
}
