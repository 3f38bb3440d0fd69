// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::find_in_parent;
use crate::load_config::resolve_config_path;
use crate::load_config::DEFAULT_CONFIG_NAME;
use crate::network_config::NetworkConfig;
use crate::paths::{PathsConfig, ProjectPaths};
use crate::validation::validate_networks;
use crate::yaml::load_yaml_with_env;
use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::PathBuf};
use tracing::debug;

pub const HARDHAT_NETWORK: &str = "hardhat";
pub const LOCALHOST_NETWORK: &str = "localhost";
pub const HARDHAT_CHAIN_ID: u64 = 31337;
pub const DEPLOYER_ACCOUNT: &str = "deployer";

/// Block explorer used for source verification
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct EtherscanConfig {
    /// Multichain api endpoint. The chain is selected with the `chainid` query parameter.
    pub api_url: String,
    /// Delay between verification status checks
    pub poll_interval_ms: u64,
    /// Number of status checks before giving up on a submitted verification
    pub max_status_checks: u32,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.etherscan.io/v2/api".to_string(),
            poll_interval_ms: 3000,
            max_status_checks: 20,
        }
    }
}

/// The config actually used throughout the app
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Networks on which deployments are treated as throwaway
    development_chains: Vec<String>,
    /// Account name to index into the network's account list
    named_accounts: BTreeMap<String, usize>,
    /// The networks config
    networks: Vec<NetworkConfig>,
    /// Resolved project paths
    paths: ProjectPaths,
    /// Block explorer config
    etherscan: EtherscanConfig,
    /// Where this configuration was read from
    config_file: PathBuf,
}

impl AppConfig {
    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks.iter().find(|n| n.name == name).ok_or_else(|| {
            let known: Vec<&str> = self.networks.iter().map(|n| n.name.as_str()).collect();
            anyhow!(
                "Unknown network '{}'. Configured networks: {}",
                name,
                known.join(", ")
            )
        })
    }

    pub fn networks(&self) -> &Vec<NetworkConfig> {
        &self.networks
    }

    /// Development networks never trigger explorer verification
    pub fn is_development(&self, network_name: &str) -> bool {
        self.development_chains.iter().any(|n| n == network_name)
    }

    /// Get the account index configured for a named account
    pub fn named_account(&self, name: &str) -> Result<usize> {
        self.named_accounts
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Named account '{}' is not configured", name))
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn etherscan(&self) -> &EtherscanConfig {
        &self.etherscan
    }

    /// Get the config file path
    pub fn config_file(&self) -> PathBuf {
        self.config_file.clone()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        UnresolvedAppConfig::default().resolve_at(PathBuf::from(DEFAULT_CONFIG_NAME))
    }
}

/// The configuration file as written, before paths are resolved
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct UnresolvedAppConfig {
    development_chains: Vec<String>,
    named_accounts: BTreeMap<String, usize>,
    networks: Vec<NetworkConfig>,
    paths: PathsConfig,
    etherscan: EtherscanConfig,
    /// The config file as found before initialization this is for testing purposes and you should
    /// not use this in your configurations
    found_config_file: Option<PathBuf>,
}

impl Default for UnresolvedAppConfig {
    fn default() -> Self {
        Self {
            development_chains: vec![HARDHAT_NETWORK.to_string(), LOCALHOST_NETWORK.to_string()],
            named_accounts: BTreeMap::from([(DEPLOYER_ACCOUNT.to_string(), 0)]),
            networks: vec![],
            paths: PathsConfig::default(),
            etherscan: EtherscanConfig::default(),
            found_config_file: None,
        }
    }
}

impl UnresolvedAppConfig {
    /// Validate and resolve paths relative to the folder holding the config file
    pub fn into_resolved(self) -> Result<AppConfig> {
        validate_networks(&self.networks)?;
        let config_file = match &self.found_config_file {
            Some(file) => file.clone(),
            None => env::current_dir()?.join(DEFAULT_CONFIG_NAME),
        };
        Ok(self.resolve_at(config_file))
    }

    fn resolve_at(self, config_file: PathBuf) -> AppConfig {
        let root = config_file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let root = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root
        };

        AppConfig {
            development_chains: self.development_chains,
            named_accounts: self.named_accounts,
            networks: with_builtin_networks(self.networks),
            paths: ProjectPaths::resolve(&root, &self.paths),
            etherscan: self.etherscan,
            config_file,
        }
    }
}

/// `hardhat` and `localhost` are always available unless the file redefines them
fn with_builtin_networks(mut networks: Vec<NetworkConfig>) -> Vec<NetworkConfig> {
    let builtins = [
        NetworkConfig {
            name: HARDHAT_NETWORK.to_string(),
            rpc_url: None,
            chain_id: Some(HARDHAT_CHAIN_ID),
            accounts: vec![],
            block_confirmations: None,
        },
        NetworkConfig {
            name: LOCALHOST_NETWORK.to_string(),
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            chain_id: Some(HARDHAT_CHAIN_ID),
            accounts: vec![],
            block_confirmations: None,
        },
    ];
    for builtin in builtins {
        if !networks.iter().any(|n| n.name == builtin.name) {
            networks.push(builtin);
        }
    }
    networks
}

/// Value struct for passing configuration from the cli to the configuration
#[derive(Default, Serialize, Deserialize, Clone, Debug)]
struct CliOverrides {
    pub found_config_file: Option<PathBuf>,
}

/// Load the config at the config_file or search for it from the cwd if not provided
pub fn load_config(config_file: Option<String>) -> Result<AppConfig> {
    let config_file = config_file.map(PathBuf::from);

    let resolved_config_path = resolve_config_path(
        find_in_parent,       // finding strategy
        env::current_dir()?,  // cwd
        DEFAULT_CONFIG_NAME,  // nftm.config.yaml
        config_file,          // config file passed on the cli
    );

    let loaded_yaml =
        load_yaml_with_env(&resolved_config_path).context("Configuration file not found")?;

    let config: UnresolvedAppConfig =
        Figment::from(Serialized::defaults(&UnresolvedAppConfig::default()))
            .merge(Yaml::string(&loaded_yaml))
            .merge(Serialized::defaults(&CliOverrides {
                found_config_file: Some(resolved_config_path.clone()),
            }))
            .extract()
            .context("Could not parse configuration")?;

    debug!("Loaded configuration from {}", resolved_config_path.display());

    config
        .into_resolved()
        .context(format!("Invalid configuration in {}", resolved_config_path.display()))
}
