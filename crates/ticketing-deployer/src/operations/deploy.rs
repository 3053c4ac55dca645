//! Contract deployment operation
//!
//! Runs the one-shot deployment sequence: acquire a signer, build the
//! contract factory from its artifact, submit the creation transaction and
//! wait for it to be confirmed. Each step runs only after the previous one
//! succeeded. Errors are returned as they occur, without retries.

use crate::{
	core::{
		artifacts::ArtifactStore,
		blockchain::{AlloyBackend, DeploymentBackend},
		logging,
	},
	types::{
		deployment::{DeployEvent, DeployStage, Deployment},
		error::Result,
	},
};
use std::sync::Arc;
use ticketing_config::Config;
use tracing::info;

/// Deploys a single named contract through a [`DeploymentBackend`].
#[derive(Clone)]
pub struct ContractDeployer {
	backend: Arc<dyn DeploymentBackend>,
	artifacts: ArtifactStore,
	contract: String,
}

impl ContractDeployer {
	/// Creates a deployer for `contract` using the given backend and artifacts.
	pub fn new(
		backend: Arc<dyn DeploymentBackend>,
		artifacts: ArtifactStore,
		contract: impl Into<String>,
	) -> Self {
		Self {
			backend,
			artifacts,
			contract: contract.into(),
		}
	}

	/// Connects to `network` and prepares a deployer from configuration.
	///
	/// # Errors
	/// Returns an error if the network is not configured or unreachable.
	pub async fn from_config(config: &Config, network: &str) -> Result<Self> {
		let network_config = config.network(network)?;
		let backend =
			AlloyBackend::connect(network, network_config, config.deployment.confirmations).await?;
		let artifacts =
			ArtifactStore::new(&config.deployment.artifacts).with_compiler(config.compiler.clone());

		Ok(Self::new(
			Arc::new(backend),
			artifacts,
			config.deployment.contract.clone(),
		))
	}

	/// Name of the contract this deployer creates.
	pub fn contract(&self) -> &str {
		&self.contract
	}

	/// Runs the deployment, reporting each completed stage to `on_event`.
	///
	/// # Errors
	/// Returns the first error raised by any stage. A missing or invalid
	/// artifact is detected before anything is sent to the network.
	pub async fn deploy<F>(&self, mut on_event: F) -> Result<Deployment>
	where
		F: FnMut(&DeployEvent),
	{
		info!(contract = %self.contract, "Starting contract deployment");

		let mut reached = DeployStage::NotStarted;
		let result = self.run(&mut reached, &mut on_event).await;

		if let Err(e) = &result {
			logging::stage_failed(reached, e);
		}

		result
	}

	async fn run<F>(&self, reached: &mut DeployStage, on_event: &mut F) -> Result<Deployment>
	where
		F: FnMut(&DeployEvent),
	{
		let deployer = self.backend.signer().await?;
		advance(reached, on_event, DeployEvent::SignerAcquired { address: deployer });

		let factory = self.artifacts.contract_factory(&self.contract)?;
		let code = factory.deploy_code();
		advance(
			reached,
			on_event,
			DeployEvent::FactoryObtained {
				contract: factory.name.clone(),
				bytecode_len: code.len(),
			},
		);

		let tx_hash = self.backend.submit(deployer, code).await?;
		advance(reached, on_event, DeployEvent::Submitted { tx_hash });

		let receipt = self.backend.confirm(tx_hash).await?;
		let deployment = Deployment {
			contract: factory.name,
			address: receipt.contract_address,
			deployer,
			tx_hash: receipt.tx_hash,
			block_number: receipt.block_number,
		};
		advance(reached, on_event, DeployEvent::Confirmed { receipt });

		Ok(deployment)
	}
}

fn advance<F>(reached: &mut DeployStage, on_event: &mut F, event: DeployEvent)
where
	F: FnMut(&DeployEvent),
{
	logging::stage_completed(&event);
	*reached = event.stage();
	on_event(&event);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::blockchain::MockDeploymentBackend;
	use crate::types::{DeploymentReceipt, Error};
	use alloy_primitives::{address, b256, Address, TxHash};
	use serde_json::json;
	use std::path::Path;
	use std::time::Duration;
	use tempfile::TempDir;

	const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
	const TX_HASH: TxHash =
		b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
	const BYTECODE: &str = "0x6080604052348015600f57600080fd5b50";

	fn write_artifact(root: &Path) {
		let dir = root.join("contracts/NFTticketing.sol");
		std::fs::create_dir_all(&dir).unwrap();
		let artifact = json!({
			"contractName": "NFTticketing",
			"abi": [],
			"bytecode": BYTECODE,
		});
		std::fs::write(dir.join("NFTticketing.json"), artifact.to_string()).unwrap();
	}

	fn receipt() -> DeploymentReceipt {
		DeploymentReceipt {
			tx_hash: TX_HASH,
			contract_address: CONTRACT,
			block_number: Some(1),
		}
	}

	fn deployer_with<F>(artifacts: &Path, setup: F) -> ContractDeployer
	where
		F: FnOnce(&mut MockDeploymentBackend),
	{
		let mut backend = MockDeploymentBackend::new();
		setup(&mut backend);
		ContractDeployer::new(
			Arc::new(backend),
			ArtifactStore::new(artifacts),
			"NFTticketing",
		)
	}

	#[tokio::test]
	async fn test_deploy_success() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path());

		let deployer = deployer_with(dir.path(), |backend| {
			backend
				.expect_signer()
				.times(1)
				.returning(|| Box::pin(async { Ok(DEPLOYER) }));
			backend
				.expect_submit()
				.times(1)
				.withf(|from, code| *from == DEPLOYER && !code.is_empty())
				.returning(|_, _| Box::pin(async { Ok(TX_HASH) }));
			backend
				.expect_confirm()
				.times(1)
				.withf(|hash| *hash == TX_HASH)
				.returning(|_| Box::pin(async { Ok(receipt()) }));
		});

		let mut stages = Vec::new();
		let deployment = deployer
			.deploy(|event| stages.push(event.stage()))
			.await
			.unwrap();

		assert_eq!(deployment.contract, "NFTticketing");
		assert_eq!(deployment.address, CONTRACT);
		assert_eq!(deployment.deployer, DEPLOYER);
		assert_eq!(deployment.tx_hash, TX_HASH);
		assert_eq!(
			stages,
			vec![
				DeployStage::SignerAcquired,
				DeployStage::FactoryObtained,
				DeployStage::Submitted,
				DeployStage::Confirmed,
			]
		);
	}

	#[tokio::test]
	async fn test_no_signer_stops_before_anything_else() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path());

		let deployer = deployer_with(dir.path(), |backend| {
			backend
				.expect_signer()
				.times(1)
				.returning(|| Box::pin(async { Err(Error::NoSigner("localhost".to_string())) }));
			backend.expect_submit().never();
			backend.expect_confirm().never();
		});

		let mut events = Vec::new();
		let err = deployer
			.deploy(|event| events.push(event.clone()))
			.await
			.unwrap_err();

		assert!(matches!(err, Error::NoSigner(_)));
		assert!(err.to_string().contains("localhost"));
		assert!(events.is_empty());
	}

	#[tokio::test]
	async fn test_missing_artifact_fails_before_submission() {
		let dir = TempDir::new().unwrap();

		let deployer = deployer_with(dir.path(), |backend| {
			backend
				.expect_signer()
				.times(1)
				.returning(|| Box::pin(async { Ok(DEPLOYER) }));
			backend.expect_submit().never();
			backend.expect_confirm().never();
		});

		let mut stages = Vec::new();
		let err = deployer
			.deploy(|event| stages.push(event.stage()))
			.await
			.unwrap_err();

		assert!(matches!(err, Error::ArtifactNotFound { .. }));
		assert_eq!(stages, vec![DeployStage::SignerAcquired]);
	}

	#[tokio::test]
	async fn test_revert_is_reported_unchanged() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path());

		let deployer = deployer_with(dir.path(), |backend| {
			backend
				.expect_signer()
				.returning(|| Box::pin(async { Ok(DEPLOYER) }));
			backend
				.expect_submit()
				.times(1)
				.returning(|_, _| Box::pin(async { Ok(TX_HASH) }));
			backend
				.expect_confirm()
				.times(1)
				.returning(|hash| Box::pin(async move { Err(Error::Reverted(hash)) }));
		});

		let err = deployer.deploy(|_| {}).await.unwrap_err();
		assert!(matches!(err, Error::Reverted(hash) if hash == TX_HASH));
	}

	#[tokio::test]
	async fn test_submission_failure_is_not_retried() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path());

		let deployer = deployer_with(dir.path(), |backend| {
			backend
				.expect_signer()
				.returning(|| Box::pin(async { Ok(DEPLOYER) }));
			backend.expect_submit().times(1).returning(|_, _| {
				Box::pin(async { Err(Error::SubmissionFailed("insufficient funds".to_string())) })
			});
			backend.expect_confirm().never();
		});

		let err = deployer.deploy(|_| {}).await.unwrap_err();
		assert_eq!(err.to_string(), "Failed to send transaction: insufficient funds");
	}

	#[tokio::test]
	async fn test_unconfirmed_transaction_keeps_waiting() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path());

		let deployer = deployer_with(dir.path(), |backend| {
			backend
				.expect_signer()
				.returning(|| Box::pin(async { Ok(DEPLOYER) }));
			backend
				.expect_submit()
				.times(1)
				.returning(|_, _| Box::pin(async { Ok(TX_HASH) }));
			backend
				.expect_confirm()
				.times(1)
				.returning(|_| Box::pin(std::future::pending::<Result<DeploymentReceipt>>()));
		});

		let mut stages = Vec::new();
		let outcome = tokio::time::timeout(
			Duration::from_millis(100),
			deployer.deploy(|event| stages.push(event.stage())),
		)
		.await;

		assert!(outcome.is_err(), "deployment should still be waiting");
		assert_eq!(stages.last(), Some(&DeployStage::Submitted));
	}
}
