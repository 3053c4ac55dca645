//! Operation implementations behind the CLI commands

pub mod config;
pub mod deploy;

pub use config::{load_config, summarize, ConfigSummary};
pub use deploy::ContractDeployer;
