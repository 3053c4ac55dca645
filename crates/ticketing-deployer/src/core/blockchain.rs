//! Blockchain access for deployments
//!
//! [`DeploymentBackend`] is the seam between the deployment procedure and the
//! network: acquire a signer, submit a creation transaction, wait for it to be
//! included. [`AlloyBackend`] implements it over JSON-RPC using alloy.

use crate::types::{
	deployment::DeploymentReceipt,
	error::{Error, Result},
};
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::{
	DynProvider, PendingTransactionConfig, PendingTransactionError, Provider, ProviderBuilder,
};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::time::Duration;
use ticketing_config::NetworkConfig;
use tracing::{debug, info};

/// Network operations the deployment procedure depends on.
///
/// `submit` and `confirm` are the only calls that wait on the network for
/// more than a single round trip.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait DeploymentBackend: Send + Sync {
	/// Returns the first available signing identity.
	async fn signer(&self) -> Result<Address>;

	/// Sends a contract creation transaction from `from` and returns its hash
	/// once the node has accepted it.
	async fn submit(&self, from: Address, code: Bytes) -> Result<TxHash>;

	/// Waits until the transaction is included and returns its receipt.
	///
	/// There is no internal timeout; the call waits as long as the network
	/// leaves the transaction pending.
	async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt>;
}

/// Alloy-based EVM deployment backend.
///
/// With a configured private key the provider carries a wallet and signs
/// locally. Without one, transactions are sent from the node's first unlocked
/// account and the node signs them.
pub struct AlloyBackend {
	network: String,
	provider: DynProvider,
	local_signer: Option<Address>,
	confirmations: u64,
}

impl std::fmt::Debug for AlloyBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AlloyBackend")
			.field("network", &self.network)
			.field("local_signer", &self.local_signer)
			.field("confirmations", &self.confirmations)
			.field("provider", &"<DynProvider>")
			.finish()
	}
}

impl AlloyBackend {
	/// Connects to the named network and checks that it is reachable.
	///
	/// # Errors
	/// Returns [`Error::RpcError`] if the URL is invalid or the node does not
	/// answer, [`Error::ChainIdMismatch`] if the node reports a different
	/// chain than configured, and [`Error::InvalidPrivateKey`] for a bad key.
	pub async fn connect(name: &str, network: &NetworkConfig, confirmations: u64) -> Result<Self> {
		let probe = ProviderBuilder::new()
			.connect(&network.url)
			.await
			.map_err(|e| Error::RpcError(format!("Invalid RPC URL {}: {}", network.url, e)))?;

		let chain_id = verify_chain_id(&probe, network).await?;
		let signer = configured_signer(network, chain_id)?;
		let local_signer = signer.as_ref().map(|s| s.address());

		let provider = match signer {
			Some(signer) => ProviderBuilder::new()
				.wallet(EthereumWallet::from(signer))
				.connect(&network.url)
				.await
				.map_err(|e| Error::RpcError(format!("Invalid RPC URL {}: {}", network.url, e)))?
				.erased(),
			None => probe.erased(),
		};

		if let Some(ms) = network.poll_interval_ms {
			provider.client().set_poll_interval(Duration::from_millis(ms));
		}

		info!(network = name, chain_id = chain_id, url = %network.url, "Connected to network");

		Ok(Self {
			network: name.to_string(),
			provider,
			local_signer,
			confirmations,
		})
	}
}

/// Reads the node's chain id and rejects it if the profile pins another one.
async fn verify_chain_id<P: Provider>(provider: &P, network: &NetworkConfig) -> Result<u64> {
	let chain_id = provider
		.get_chain_id()
		.await
		.map_err(|e| Error::RpcError(format!("Failed to connect to {}: {}", network.url, e)))?;

	match network.chain_id {
		Some(configured) if configured != chain_id => Err(Error::ChainIdMismatch {
			configured,
			actual: chain_id,
		}),
		_ => Ok(chain_id),
	}
}

/// Signer for the first configured key, bound to `chain_id`.
fn configured_signer(network: &NetworkConfig, chain_id: u64) -> Result<Option<PrivateKeySigner>> {
	network
		.accounts
		.first()
		.map(|key| {
			key.expose()
				.parse::<PrivateKeySigner>()
				.map(|signer| signer.with_chain_id(Some(chain_id)))
				.map_err(|e| Error::InvalidPrivateKey(e.to_string()))
		})
		.transpose()
}

/// Turns a mined receipt into the deployment outcome.
fn deployment_receipt(receipt: &TransactionReceipt) -> Result<DeploymentReceipt> {
	let tx_hash = receipt.transaction_hash;
	if !receipt.status() {
		return Err(Error::Reverted(tx_hash));
	}

	let contract_address = receipt.contract_address.ok_or_else(|| {
		Error::DeploymentFailed(format!("No contract address in receipt for {}", tx_hash))
	})?;

	Ok(DeploymentReceipt {
		tx_hash,
		contract_address,
		block_number: receipt.block_number,
	})
}

#[async_trait]
impl DeploymentBackend for AlloyBackend {
	async fn signer(&self) -> Result<Address> {
		if let Some(address) = self.local_signer {
			debug!(address = %address, "Using configured signer");
			return Ok(address);
		}

		let accounts = self
			.provider
			.get_accounts()
			.await
			.map_err(|e| Error::RpcError(format!("Failed to list accounts: {}", e)))?;

		let address = accounts
			.first()
			.copied()
			.ok_or_else(|| Error::NoSigner(self.network.clone()))?;

		debug!(address = %address, "Using node account as signer");
		Ok(address)
	}

	async fn submit(&self, from: Address, code: Bytes) -> Result<TxHash> {
		debug!(from = %from, code_len = code.len(), "Sending creation transaction");

		let tx = TransactionRequest::default()
			.from(from)
			.with_deploy_code(code);

		let pending = self
			.provider
			.send_transaction(tx)
			.await
			.map_err(|e| Error::SubmissionFailed(e.to_string()))?;

		Ok(*pending.tx_hash())
	}

	async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt> {
		info!(
			tx_hash = %tx_hash,
			confirmations = self.confirmations,
			"Waiting for deployment confirmation"
		);

		let config = PendingTransactionConfig::new(tx_hash)
			.with_required_confirmations(self.confirmations)
			.with_timeout(None);

		let pending = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| match e {
				PendingTransactionError::FailedToRegister => {
					Error::ConfirmationFailed("Failed to register transaction watcher".to_string())
				},
				other => Error::ConfirmationFailed(other.to_string()),
			})?;

		let confirmed = pending
			.await
			.map_err(|e| Error::ConfirmationFailed(e.to_string()))?;

		let receipt = self
			.provider
			.get_transaction_receipt(confirmed)
			.await
			.map_err(|e| Error::RpcError(format!("Failed to get receipt: {}", e)))?
			.ok_or_else(|| {
				Error::ConfirmationFailed(format!("Receipt for {} not available", confirmed))
			})?;

		deployment_receipt(&receipt)
	}
}
