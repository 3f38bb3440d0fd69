// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    network::EthereumWallet,
    node_bindings::{Anvil, AnvilInstance},
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use anyhow::{anyhow, bail, Context, Result};
use nftm_config::NetworkConfig;
use tracing::{debug, info};

/// Connection to the network contracts are deployed to
pub struct ChainClient {
    provider: DynProvider,
    accounts: Vec<Address>,
    chain_id: u64,
    /// Throwaway node backing an ephemeral network. Dropping it stops the node.
    _node: Option<AnvilInstance>,
}

impl ChainClient {
    pub async fn connect(network: &NetworkConfig) -> Result<Self> {
        if network.is_ephemeral() {
            return Self::spawn_dev_node(network).await;
        }

        let url = network.rpc()?.to_http()?;
        let (provider, accounts) = if network.accounts.is_empty() {
            // Fall back to the accounts the node manages itself eg. a local hardhat or anvil node
            let provider = ProviderBuilder::new().connect_http(url).erased();
            let accounts = provider
                .get_accounts()
                .await
                .with_context(|| format!("Could not list accounts on network {}", network.name))?;
            (provider, accounts)
        } else {
            let (wallet, accounts) = load_wallet(&network.accounts)?;
            let provider = ProviderBuilder::new()
                .wallet(wallet)
                .with_cached_nonce_management()
                .connect_http(url)
                .erased();
            (provider, accounts)
        };

        let chain_id = provider
            .get_chain_id()
            .await
            .with_context(|| format!("Could not reach network {}", network.name))?;
        check_chain_id(network, chain_id)?;
        debug!(network = %network.name, chain_id, "connected");

        Ok(Self {
            provider,
            accounts,
            chain_id,
            _node: None,
        })
    }

    async fn spawn_dev_node(network: &NetworkConfig) -> Result<Self> {
        let mut anvil = Anvil::new();
        if let Some(chain_id) = network.chain_id {
            anvil = anvil.chain_id(chain_id);
        }
        let node = anvil
            .try_spawn()
            .context("Could not start a local dev node. Is `anvil` installed and on the PATH?")?;
        info!(
            "Started dev node for network {} at {}",
            network.name,
            node.endpoint()
        );

        let provider = ProviderBuilder::new()
            .connect_http(node.endpoint_url())
            .erased();
        let chain_id = provider.get_chain_id().await?;
        check_chain_id(network, chain_id)?;

        Ok(Self {
            provider,
            accounts: node.addresses().to_vec(),
            chain_id,
            _node: Some(node),
        })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Resolve a named account's index to an address
    pub fn account(&self, index: usize) -> Result<Address> {
        self.accounts.get(index).copied().ok_or_else(|| {
            anyhow!(
                "Account #{} is not available. The network exposes {} account(s)",
                index,
                self.accounts.len()
            )
        })
    }
}

fn load_wallet(private_keys: &[String]) -> Result<(EthereumWallet, Vec<Address>)> {
    let mut signers = private_keys.iter().enumerate().map(|(i, key)| {
        key.trim()
            .parse::<PrivateKeySigner>()
            .with_context(|| format!("Account #{} is not a valid private key", i))
    });

    let Some(first) = signers.next() else {
        bail!("No private keys configured");
    };
    let first = first?;
    let mut accounts = vec![first.address()];
    let mut wallet = EthereumWallet::from(first);
    for signer in signers {
        let signer = signer?;
        accounts.push(signer.address());
        wallet.register_signer(signer);
    }
    Ok((wallet, accounts))
}

fn check_chain_id(network: &NetworkConfig, actual: u64) -> Result<()> {
    match network.chain_id {
        Some(expected) if expected != actual => bail!(
            "Network {} is configured with chain_id {} but the node reports {}",
            network.name,
            expected,
            actual
        ),
        _ => Ok(()),
    }
}
