// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::rpc::RpcUrl;
use anyhow::*;
use serde::{Deserialize, Serialize};

/// Confirmations waited for when a network does not set `block_confirmations`
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub name: String,
    /// Leave unset to run against a throwaway anvil node
    #[serde(default)]
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    /// Hex private keys. When empty the node's unlocked accounts are used.
    #[serde(default)]
    pub accounts: Vec<String>,
    pub block_confirmations: Option<u64>,
}

impl NetworkConfig {
    pub fn rpc(&self) -> Result<RpcUrl> {
        let Some(rpc_url) = &self.rpc_url else {
            bail!("Network '{}' has no rpc_url", self.name);
        };
        RpcUrl::parse(rpc_url).with_context(|| format!("Invalid rpc_url for network {}", self.name))
    }

    pub fn confirmations(&self) -> u64 {
        self.block_confirmations
            .unwrap_or(DEFAULT_BLOCK_CONFIRMATIONS)
    }

    pub fn is_ephemeral(&self) -> bool {
        self.rpc_url.is_none()
    }
}
