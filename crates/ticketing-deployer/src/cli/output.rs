//! Terminal output utilities and formatting
//!
//! The deployment lines on stdout and the failure line on stderr have a
//! fixed shape; the `config` view uses colored headers.

use crate::{
	cli::exit_status,
	constants,
	types::{DeployEvent, Deployment},
};
use alloy_primitives::Address;
use colored::Colorize;
use std::{fmt, io::Write};

/// Terminal display utilities for CLI output
pub struct Display;

impl Display {
	/// Displays a formatted section header with underline
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	/// Displays a key-value pair with formatted labels
	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{}:", key).bold(), value);
	}

	/// Displays an error message with red X symbol to stderr
	pub fn error(message: &str) {
		eprintln!("{}", plain_error_line(message));
	}
}

/// Writes the deployment lines of one run and maps its outcome to an exit
/// status.
///
/// Stdout gets the signer line as soon as it is known and the address line
/// on success. Stderr gets exactly one line on failure. Write errors are
/// ignored; the exit status depends only on the deployment result.
pub struct DeployReport<O, E> {
	stdout: O,
	stderr: E,
}

impl<O: Write, E: Write> DeployReport<O, E> {
	pub fn new(stdout: O, stderr: E) -> Self {
		Self { stdout, stderr }
	}

	/// Stage callback for [`ContractDeployer::deploy`](crate::ContractDeployer::deploy).
	pub fn on_event(&mut self, event: &DeployEvent) {
		if let DeployEvent::SignerAcquired { address } = event {
			let _ = writeln!(self.stdout, "{}", deploying_line(address));
		}
	}

	/// Reports the final outcome and returns the process exit status.
	pub fn finish<D: fmt::Display>(mut self, result: &Result<Deployment, D>) -> u8 {
		match result {
			Ok(deployment) => {
				let _ = writeln!(
					self.stdout,
					"{}",
					deployed_line(&deployment.contract, &deployment.address)
				);
			},
			Err(e) => {
				let _ = writeln!(self.stderr, "{}", error_line(e));
			},
		}
		let _ = self.stdout.flush();
		let _ = self.stderr.flush();

		exit_status(result)
	}
}

/// `Deploying contracts with account: <address>`
pub fn deploying_line(account: &Address) -> String {
	format!("Deploying contracts with account: {}", account)
}

/// `✅ <contract> deployed to: <address>`
pub fn deployed_line(contract: &str, address: &Address) -> String {
	format!("✅ {} deployed to: {}", contract, address)
}

/// `✗ <message>`, for failures outside a deployment
pub fn plain_error_line(message: &str) -> String {
	format!("{} {}", "✗".red().bold(), message.red())
}

/// `❌ Error in deploy.js: <detail>`
pub fn error_line(error: &dyn fmt::Display) -> String {
	format!("{} {}", constants::ERROR_PREFIX, error)
}
