// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::{bail, Result};
use url::Url;

use crate::NetworkConfig;

/// A url argument that has been parsed on the way in from the cli
#[derive(Clone, Debug)]
pub struct ValidUrl(Url);

impl FromStr for ValidUrl {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ValidUrl(Url::parse(s)?))
    }
}

impl From<ValidUrl> for String {
    fn from(value: ValidUrl) -> Self {
        value.0.to_string()
    }
}

/// Check the network list for mistakes that would otherwise only show up mid deployment
pub fn validate_networks(networks: &[NetworkConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for network in networks {
        if !seen.insert(network.name.as_str()) {
            bail!("Network '{}' is defined more than once", network.name);
        }
        if network.chain_id == Some(0) {
            bail!("Network '{}' has an invalid chain_id of 0", network.name);
        }
        if network.block_confirmations == Some(0) {
            bail!(
                "Network '{}' must wait for at least one block confirmation",
                network.name
            );
        }
        if network.rpc_url.is_some() {
            network.rpc()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(name: &str) -> NetworkConfig {
        NetworkConfig {
            name: name.to_string(),
            rpc_url: Some("http://localhost:8545".to_string()),
            chain_id: Some(31337),
            accounts: vec![],
            block_confirmations: None,
        }
    }

    #[test]
    fn test_duplicate_network_names() {
        let networks = vec![network("localhost"), network("localhost")];
        assert!(validate_networks(&networks).is_err());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut zero_chain = network("a");
        zero_chain.chain_id = Some(0);
        assert!(validate_networks(&[zero_chain]).is_err());

        let mut zero_confirmations = network("b");
        zero_confirmations.block_confirmations = Some(0);
        assert!(validate_networks(&[zero_confirmations]).is_err());

        let mut bad_rpc = network("c");
        bad_rpc.rpc_url = Some("localhost".to_string());
        assert!(validate_networks(&[bad_rpc]).is_err());

        assert!(validate_networks(&[network("d"), network("e")]).is_ok());
    }
}
