// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use nftm_config::validation::ValidUrl;
use nftm_config::{AppConfig, EnvGates, TaskOptions, DEPLOYER_ACCOUNT, ETHERSCAN_API_KEY_VAR};
use nftm_evm::{AlloyDeployer, ArtifactStore, ChainClient, DeploymentStore, EtherscanVerifier};
use nftm_tasks::{TaskContext, TaskRunner};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn execute(
    config: &AppConfig,
    network_name: &str,
    tags: Vec<String>,
    update_front_end: bool,
    rpc_url: Option<ValidUrl>,
) -> Result<()> {
    let mut network = config.network(network_name)?.clone();
    if let Some(rpc_url) = rpc_url {
        network.rpc_url = Some(rpc_url.into());
    }

    let runner = TaskRunner::with_default_tasks();
    // Bad tags should fail before anything touches the chain
    runner.select(&tags)?;

    let gates = EnvGates::from_env();
    let options = TaskOptions::resolve(config, &network, &gates, update_front_end);
    if !config.is_development(&network.name) && gates.etherscan_api_key.is_none() {
        warn!(
            "{} is not set. Contracts on {} will not be verified",
            ETHERSCAN_API_KEY_VAR, network.name
        );
    }

    let client = ChainClient::connect(&network).await?;
    let deployer_account = client.account(config.named_account(DEPLOYER_ACCOUNT)?)?;
    let artifacts = ArtifactStore::new(&config.paths().artifacts);

    let mut ctx = TaskContext::new(
        network.name.clone(),
        client.chain_id(),
        options,
        deployer_account,
        config.paths().clone(),
        Arc::new(AlloyDeployer::new(
            client.provider().clone(),
            artifacts.clone(),
        )),
    );

    if options.verify_on_explorer {
        if let Some(api_key) = gates.etherscan_api_key {
            ctx = ctx.with_verifier(Arc::new(EtherscanVerifier::new(
                config.etherscan(),
                api_key,
                client.chain_id(),
                artifacts,
            )?));
        }
    }

    // Deployments on a throwaway node are gone with the node
    if !network.is_ephemeral() {
        ctx = ctx.with_store(DeploymentStore::new(
            &config.paths().deployments,
            &network.name,
        ));
    }

    let executed = runner.run(&tags, &mut ctx).await?;
    info!("Ran {} on {}", executed.join(", "), network.name);

    for record in ctx.deployments.iter() {
        println!("{}: {}", record.contract_name, record.address);
    }

    Ok(())
}
