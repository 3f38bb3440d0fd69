// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{AddressMap, DeployTask, TaskContext, NFT, NFT_MARKETPLACE};
use anyhow::{Context, Result};
use async_trait::async_trait;
use nftm_config::ProjectPaths;
use nftm_evm::Deployments;
use tokio::fs;
use tracing::{debug, info};

/// Publishes deployed addresses and abis to the front end
pub struct UpdateFrontEnd;

#[async_trait]
impl DeployTask for UpdateFrontEnd {
    fn id(&self) -> &'static str {
        "99-update-front-end"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["all", "frontend"]
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<()> {
        if !ctx.options.update_front_end {
            debug!("Front end update not requested");
            return Ok(());
        }

        info!("Updating to front end...");
        update_contract_addresses(&ctx.deployments, ctx.chain_id, &ctx.paths).await?;
        update_abi(&ctx.deployments, &ctx.paths).await?;
        info!("Front end updated!");
        Ok(())
    }
}

/// Merge the marketplace and NFT addresses into the front end's address map
pub async fn update_contract_addresses(
    deployments: &Deployments,
    chain_id: u64,
    paths: &ProjectPaths,
) -> Result<()> {
    let marketplace = deployments.require(NFT_MARKETPLACE)?;
    let nft = deployments.require(NFT)?;

    let mut map = AddressMap::load(&paths.front_end_contracts_file).await?;
    map.sync_chain(
        chain_id,
        &[
            (NFT_MARKETPLACE, marketplace.address),
            (NFT, nft.address),
        ],
    );
    map.save(&paths.front_end_contracts_file).await
}

/// Overwrite the abi file of each contract
pub async fn update_abi(deployments: &Deployments, paths: &ProjectPaths) -> Result<()> {
    fs::create_dir_all(&paths.front_end_abi_dir).await?;
    for name in [NFT_MARKETPLACE, NFT] {
        let record = deployments.require(name)?;
        let path = paths.front_end_abi_file(name);
        fs::write(&path, record.abi_json()?)
            .await
            .with_context(|| format!("Could not write abi to {}", path.display()))?;
    }
    Ok(())
}
