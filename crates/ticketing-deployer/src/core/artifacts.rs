//! Compiled contract artifacts
//!
//! Locates the JSON artifact an external build tool produced for a contract
//! and turns it into a [`ContractFactory`] holding the ABI and creation
//! bytecode. Both common layouts are understood: `<root>/contracts/<Name>.sol/<Name>.json`
//! with a hex string `bytecode`, and `<root>/<Name>.sol/<Name>.json` with
//! `bytecode.object` plus compiler metadata.

use crate::types::error::{Error, Result};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Bytes};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use ticketing_config::CompilerSettings;
use tracing::debug;

/// Directories that never contain contract artifacts.
const SKIPPED_DIRS: &[&str] = &["build-info", "cache"];

/// Read-only view over a compiled artifacts directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
	root: PathBuf,
	compiler: Option<CompilerSettings>,
}

/// Everything needed to build a creation transaction for one contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
	pub name: String,
	pub source: PathBuf,
	pub abi: JsonAbi,
	pub bytecode: Bytes,
}

impl ContractFactory {
	/// Creation payload for a constructor that takes no arguments.
	pub fn deploy_code(&self) -> Bytes {
		self.bytecode.clone()
	}
}

#[derive(Deserialize)]
struct RawArtifact {
	#[serde(default)]
	abi: JsonAbi,
	bytecode: Option<RawBytecode>,
	metadata: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
	Hex(String),
	Object { object: String },
}

impl RawBytecode {
	fn as_hex(&self) -> &str {
		match self {
			Self::Hex(s) => s,
			Self::Object { object } => object,
		}
	}
}

impl ArtifactStore {
	/// Creates a store rooted at the given artifacts directory.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			compiler: None,
		}
	}

	/// Checks artifacts against these compiler settings when they record
	/// compiler metadata.
	pub fn with_compiler(mut self, compiler: CompilerSettings) -> Self {
		self.compiler = Some(compiler);
		self
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Loads the artifact for `name` and returns its factory.
	///
	/// # Errors
	/// Returns [`Error::ArtifactNotFound`] when no artifact exists and
	/// [`Error::InvalidArtifact`] when it exists but cannot be deployed as is.
	pub fn contract_factory(&self, name: &str) -> Result<ContractFactory> {
		let path = self.locate(name)?;
		debug!(contract = name, path = %path.display(), "Loading contract artifact");

		let content = std::fs::read_to_string(&path)?;
		let raw: RawArtifact = serde_json::from_str(&content)
			.map_err(|e| Error::invalid_artifact(&path, format!("malformed JSON: {}", e)))?;

		if let (Some(compiler), Some(metadata)) = (&self.compiler, &raw.metadata) {
			check_compiler(&path, compiler, metadata)?;
		}

		let bytecode = extract_bytecode(&path, raw.bytecode.as_ref())?;

		if let Some(constructor) = raw.abi.constructor() {
			if !constructor.inputs.is_empty() {
				return Err(Error::invalid_artifact(
					&path,
					format!(
						"constructor expects {} argument(s) but none are supplied",
						constructor.inputs.len()
					),
				));
			}
		}

		Ok(ContractFactory {
			name: name.to_string(),
			source: path,
			abi: raw.abi,
			bytecode,
		})
	}

	/// Finds exactly one `<name>.sol/<name>.json` below the root.
	fn locate(&self, name: &str) -> Result<PathBuf> {
		let not_found = || Error::ArtifactNotFound {
			name: name.to_string(),
			dir: self.root.clone(),
		};

		if !self.root.is_dir() {
			return Err(not_found());
		}

		let mut matches = Vec::new();
		collect_artifacts(&self.root, name, &mut matches)?;
		matches.sort();

		match matches.len() {
			0 => Err(not_found()),
			1 => Ok(matches.remove(0)),
			_ => Err(Error::invalid_artifact(
				&self.root,
				format!(
					"multiple artifacts named {}: {}",
					name,
					matches
						.iter()
						.map(|p| p.display().to_string())
						.collect::<Vec<_>>()
						.join(", ")
				),
			)),
		}
	}
}

fn collect_artifacts(dir: &Path, name: &str, matches: &mut Vec<PathBuf>) -> Result<()> {
	let source_dir = format!("{}.sol", name);
	let file_name = format!("{}.json", name);

	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		if !entry.file_type()?.is_dir() {
			continue;
		}

		let dir_name = entry.file_name();
		let Some(dir_name) = dir_name.to_str() else {
			continue;
		};
		if SKIPPED_DIRS.contains(&dir_name) {
			continue;
		}

		let path = entry.path();
		if dir_name == source_dir {
			let candidate = path.join(&file_name);
			if candidate.is_file() {
				matches.push(candidate);
			}
		} else {
			collect_artifacts(&path, name, matches)?;
		}
	}

	Ok(())
}

fn extract_bytecode(path: &Path, bytecode: Option<&RawBytecode>) -> Result<Bytes> {
	let raw = bytecode
		.map(RawBytecode::as_hex)
		.ok_or_else(|| Error::invalid_artifact(path, "no bytecode found"))?;

	let hex_str = raw.strip_prefix("0x").unwrap_or(raw);
	if hex_str.is_empty() {
		return Err(Error::invalid_artifact(
			path,
			"bytecode is empty (abstract contract or interface)",
		));
	}

	// Unresolved library references are left as `__$...$__` placeholders
	if hex_str.contains("__") {
		return Err(Error::invalid_artifact(
			path,
			"bytecode has unlinked library references",
		));
	}

	hex::decode(hex_str)
		.map(Bytes::from)
		.map_err(|e| Error::invalid_artifact(path, format!("invalid bytecode hex: {}", e)))
}

/// Rejects artifacts built with a different compiler release or optimizer setup.
fn check_compiler(path: &Path, compiler: &CompilerSettings, metadata: &Value) -> Result<()> {
	// Some layouts embed the solc metadata as a JSON string
	let parsed;
	let metadata = match metadata {
		Value::String(s) => {
			parsed = serde_json::from_str::<Value>(s)
				.map_err(|e| Error::invalid_artifact(path, format!("malformed metadata: {}", e)))?;
			&parsed
		},
		other => other,
	};

	if let Some(build) = metadata.pointer("/compiler/version").and_then(Value::as_str) {
		if !compiler.matches_build(build) {
			return Err(Error::invalid_artifact(
				path,
				format!(
					"built with compiler {} but {} is configured",
					build, compiler.version
				),
			));
		}
	}

	if let Some(optimizer) = metadata.pointer("/settings/optimizer") {
		let enabled = optimizer.get("enabled").and_then(Value::as_bool);
		let runs = optimizer.get("runs").and_then(Value::as_u64);

		if enabled.is_some_and(|e| e != compiler.optimizer.enabled)
			|| runs.is_some_and(|r| r != u64::from(compiler.optimizer.runs))
		{
			return Err(Error::invalid_artifact(
				path,
				format!(
					"built with optimizer {} but {} is configured",
					optimizer, compiler.solc_settings()["optimizer"]
				),
			));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use tempfile::TempDir;

	const BYTECODE: &str = "0x6080604052348015600f57600080fd5b50";

	fn write_artifact(root: &Path, relative: &str, name: &str, artifact: Value) -> PathBuf {
		let dir = root.join(relative).join(format!("{}.sol", name));
		std::fs::create_dir_all(&dir).unwrap();
		let path = dir.join(format!("{}.json", name));
		std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();
		path
	}

	fn hardhat_artifact(bytecode: &str) -> Value {
		json!({
			"_format": "hh-sol-artifact-1",
			"contractName": "NFTticketing",
			"sourceName": "contracts/NFTticketing.sol",
			"abi": [
				{ "inputs": [], "stateMutability": "nonpayable", "type": "constructor" }
			],
			"bytecode": bytecode,
			"deployedBytecode": "0x",
			"linkReferences": {},
			"deployedLinkReferences": {}
		})
	}

	fn foundry_artifact(version: &str, runs: u64) -> Value {
		json!({
			"abi": [],
			"bytecode": { "object": BYTECODE, "sourceMap": "", "linkReferences": {} },
			"metadata": {
				"compiler": { "version": version },
				"settings": { "optimizer": { "enabled": true, "runs": runs } }
			}
		})
	}

	#[test]
	fn test_loads_hardhat_layout() {
		let dir = TempDir::new().unwrap();
		let path = write_artifact(dir.path(), "contracts", "NFTticketing", hardhat_artifact(BYTECODE));

		let store = ArtifactStore::new(dir.path());
		let factory = store.contract_factory("NFTticketing").unwrap();

		assert_eq!(factory.name, "NFTticketing");
		assert_eq!(factory.source, path);
		assert_eq!(factory.deploy_code().to_vec(), hex::decode(&BYTECODE[2..]).unwrap());
		assert!(factory.abi.constructor().is_some());
	}

	#[test]
	fn test_loads_foundry_layout_with_matching_compiler() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "", "NFTticketing", foundry_artifact("0.8.21+commit.d9974bed", 200));

		let store = ArtifactStore::new(dir.path()).with_compiler(CompilerSettings::default());
		assert!(store.contract_factory("NFTticketing").is_ok());
	}

	#[test]
	fn test_missing_artifact() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "contracts", "Other", hardhat_artifact(BYTECODE));

		let store = ArtifactStore::new(dir.path());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(matches!(err, Error::ArtifactNotFound { .. }));
		assert!(err.to_string().contains("NFTticketing"));
	}

	#[test]
	fn test_missing_root_directory() {
		let store = ArtifactStore::new("/definitely/not/an/artifacts/dir");
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(matches!(err, Error::ArtifactNotFound { .. }));
	}

	#[test]
	fn test_build_info_is_ignored() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "build-info", "NFTticketing", hardhat_artifact(BYTECODE));

		let store = ArtifactStore::new(dir.path());
		assert!(matches!(
			store.contract_factory("NFTticketing"),
			Err(Error::ArtifactNotFound { .. })
		));
	}

	#[test]
	fn test_ambiguous_artifacts() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "contracts", "NFTticketing", hardhat_artifact(BYTECODE));
		write_artifact(dir.path(), "contracts/legacy", "NFTticketing", hardhat_artifact(BYTECODE));

		let store = ArtifactStore::new(dir.path());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(err.to_string().contains("multiple artifacts"));
	}

	#[test]
	fn test_empty_bytecode_rejected() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "contracts", "NFTticketing", hardhat_artifact("0x"));

		let store = ArtifactStore::new(dir.path());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(err.to_string().contains("empty"));
	}

	#[test]
	fn test_unlinked_library_rejected() {
		let dir = TempDir::new().unwrap();
		let bytecode = "0x73__$d0b5a8ca1a6e1e0b6f4a9b1c0e3d2f7a6b$__6080";
		write_artifact(dir.path(), "contracts", "NFTticketing", hardhat_artifact(bytecode));

		let store = ArtifactStore::new(dir.path());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(err.to_string().contains("unlinked"));
	}

	#[test]
	fn test_constructor_with_arguments_rejected() {
		let dir = TempDir::new().unwrap();
		let mut artifact = hardhat_artifact(BYTECODE);
		artifact["abi"] = json!([{
			"inputs": [{ "internalType": "string", "name": "name", "type": "string" }],
			"stateMutability": "nonpayable",
			"type": "constructor"
		}]);
		write_artifact(dir.path(), "contracts", "NFTticketing", artifact);

		let store = ArtifactStore::new(dir.path());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(err.to_string().contains("constructor expects 1 argument"));
	}

	#[test]
	fn test_compiler_version_mismatch() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "", "NFTticketing", foundry_artifact("0.8.19+commit.7dd6d404", 200));

		let store = ArtifactStore::new(dir.path()).with_compiler(CompilerSettings::default());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(err.to_string().contains("0.8.19"));
	}

	#[test]
	fn test_optimizer_runs_mismatch() {
		let dir = TempDir::new().unwrap();
		write_artifact(dir.path(), "", "NFTticketing", foundry_artifact("0.8.21+commit.d9974bed", 1000));

		let store = ArtifactStore::new(dir.path()).with_compiler(CompilerSettings::default());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(err.to_string().contains("optimizer"));
	}

	#[test]
	fn test_string_metadata_is_parsed() {
		let dir = TempDir::new().unwrap();
		let mut artifact = foundry_artifact("0.8.21+commit.d9974bed", 200);
		artifact["metadata"] = Value::String(artifact["metadata"].to_string());
		write_artifact(dir.path(), "", "NFTticketing", artifact);

		let store = ArtifactStore::new(dir.path()).with_compiler(CompilerSettings::default());
		assert!(store.contract_factory("NFTticketing").is_ok());
	}

	#[test]
	fn test_malformed_json() {
		let dir = TempDir::new().unwrap();
		let sol_dir = dir.path().join("contracts/NFTticketing.sol");
		std::fs::create_dir_all(&sol_dir).unwrap();
		std::fs::write(sol_dir.join("NFTticketing.json"), "{ not json").unwrap();

		let store = ArtifactStore::new(dir.path());
		let err = store.contract_factory("NFTticketing").unwrap_err();
		assert!(matches!(err, Error::InvalidArtifact { .. }));
	}
}
