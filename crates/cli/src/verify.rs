// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, bail, Result};
use nftm_config::{AppConfig, EnvGates, ETHERSCAN_API_KEY_VAR};
use nftm_evm::{ArtifactStore, DeploymentStore, EtherscanVerifier, Verifier};

pub async fn execute(config: &AppConfig, network_name: &str, contract_name: &str) -> Result<()> {
    let network = config.network(network_name)?;
    if config.is_development(&network.name) {
        bail!(
            "{} is a development network. Contracts there cannot be verified",
            network.name
        );
    }

    let Some(api_key) = EnvGates::from_env().etherscan_api_key else {
        bail!("{} must be set to verify contracts", ETHERSCAN_API_KEY_VAR);
    };

    let store = DeploymentStore::new(&config.paths().deployments, &network.name);
    let Some(record) = store.load(contract_name).await? else {
        bail!(
            "No deployment found for: {} in {}",
            contract_name,
            store.dir().display()
        );
    };
    let chain_id = match store.chain_id().await? {
        Some(chain_id) => chain_id,
        None => network
            .chain_id
            .ok_or_else(|| anyhow!("Chain id of network {} is unknown", network.name))?,
    };

    let verifier = EtherscanVerifier::new(
        config.etherscan(),
        api_key,
        chain_id,
        ArtifactStore::new(&config.paths().artifacts),
    )?;
    verifier
        .verify(&record.contract_name, record.address, &record.args)
        .await?;

    println!("{}: {} verified", record.contract_name, record.address);
    Ok(())
}
