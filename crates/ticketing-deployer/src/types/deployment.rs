//! Deployment progress and results
//!
//! The procedure is strictly linear. Each stage is entered only after the
//! previous one succeeded, and a failure at any stage ends the run.

use alloy_primitives::{Address, TxHash};
use std::fmt;

/// Stages of a single deployment run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeployStage {
	NotStarted,
	SignerAcquired,
	FactoryObtained,
	Submitted,
	Confirmed,
}

impl fmt::Display for DeployStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::NotStarted => "not-started",
			Self::SignerAcquired => "signer-acquired",
			Self::FactoryObtained => "factory-obtained",
			Self::Submitted => "submitted",
			Self::Confirmed => "confirmed",
		};
		f.write_str(name)
	}
}

/// Progress notification emitted when a stage completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
	SignerAcquired { address: Address },
	FactoryObtained { contract: String, bytecode_len: usize },
	Submitted { tx_hash: TxHash },
	Confirmed { receipt: DeploymentReceipt },
}

impl DeployEvent {
	/// The stage this event marks as completed.
	pub fn stage(&self) -> DeployStage {
		match self {
			Self::SignerAcquired { .. } => DeployStage::SignerAcquired,
			Self::FactoryObtained { .. } => DeployStage::FactoryObtained,
			Self::Submitted { .. } => DeployStage::Submitted,
			Self::Confirmed { .. } => DeployStage::Confirmed,
		}
	}
}

/// What the network reports once a creation transaction is included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
	pub tx_hash: TxHash,
	pub contract_address: Address,
	pub block_number: Option<u64>,
}

/// Handle to a confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
	pub contract: String,
	pub address: Address,
	pub deployer: Address,
	pub tx_hash: TxHash,
	pub block_number: Option<u64>,
}
