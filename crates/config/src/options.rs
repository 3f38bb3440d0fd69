// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{AppConfig, NetworkConfig};

pub const ETHERSCAN_API_KEY_VAR: &str = "ETHERSCAN_API_KEY";
pub const UPDATE_FRONT_END_VAR: &str = "UPDATE_FRONT_END";

/// Process environment switches read once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvGates {
    pub etherscan_api_key: Option<String>,
    pub update_front_end: bool,
}

impl EnvGates {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            etherscan_api_key: non_empty(ETHERSCAN_API_KEY_VAR),
            update_front_end: non_empty(UPDATE_FRONT_END_VAR).is_some(),
        }
    }
}

/// Everything a task needs to know about how it should behave on this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOptions {
    pub update_front_end: bool,
    pub verify_on_explorer: bool,
    pub confirmations: u64,
}

impl TaskOptions {
    pub fn resolve(
        config: &AppConfig,
        network: &NetworkConfig,
        gates: &EnvGates,
        cli_update_front_end: bool,
    ) -> Self {
        Self {
            update_front_end: gates.update_front_end || cli_update_front_end,
            verify_on_explorer: !config.is_development(&network.name)
                && gates.etherscan_api_key.is_some(),
            confirmations: network.confirmations(),
        }
    }
}
