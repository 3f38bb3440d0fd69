// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DeployTask, TaskContext};
use anyhow::Result;
use async_trait::async_trait;
use nftm_evm::ConstructorArg;
use tracing::info;

pub const NFT_MARKETPLACE: &str = "NFTMarketplace";
pub const NFT: &str = "NFT";

/// Deploys the marketplace and then the NFT collection bound to it
pub struct DeployNftMarketplace;

#[async_trait]
impl DeployTask for DeployNftMarketplace {
    fn id(&self) -> &'static str {
        "01-deploy-nft-marketplace"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["all", "nftmarketplace"]
    }

    async fn run(&self, ctx: &mut TaskContext) -> Result<()> {
        info!("deployer : {}", ctx.deployer_account);

        let marketplace_args = vec![];
        let marketplace = ctx.deploy(NFT_MARKETPLACE, marketplace_args.clone()).await?;

        let nft_args = vec![ConstructorArg::from(marketplace.address)];
        let nft = ctx.deploy(NFT, nft_args.clone()).await?;

        if ctx.options.verify_on_explorer {
            let verifier = ctx.verifier()?;
            info!("Verifying {}...", NFT_MARKETPLACE);
            verifier
                .verify(NFT_MARKETPLACE, marketplace.address, &marketplace_args)
                .await?;
            info!("Verifying {}...", NFT);
            verifier.verify(NFT, nft.address, &nft_args).await?;
        }
        info!("----------------------------------------------------");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{context, options, MockDeployer, MockVerifier};
    use alloy::primitives::Address;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_deploys_nft_against_marketplace() -> Result<()> {
        let dir = tempdir()?;
        let deployer = Arc::new(MockDeployer::default());
        let mut ctx = context(dir.path(), 11155111, options(false, false), deployer.clone());

        DeployNftMarketplace.run(&mut ctx).await?;

        assert_eq!(deployer.deployed(), vec![NFT_MARKETPLACE, NFT]);
        let requests = deployer.requests.lock().unwrap().clone();
        assert!(requests[0].args.is_empty());
        assert_eq!(requests[1].args, vec![Address::with_last_byte(1).into()]);
        assert!(requests.iter().all(|r| r.confirmations == 1));
        assert!(requests.iter().all(|r| r.from == crate::mocks::DEPLOYER));

        assert_eq!(
            ctx.deployments.require(NFT_MARKETPLACE)?.address,
            Address::with_last_byte(1)
        );
        assert_eq!(ctx.deployments.require(NFT)?.address, Address::with_last_byte(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_verifies_each_contract_once() -> Result<()> {
        let dir = tempdir()?;
        let deployer = Arc::new(MockDeployer::default());
        let verifier = Arc::new(MockVerifier::default());
        let mut ctx = context(dir.path(), 11155111, options(false, true), deployer)
            .with_verifier(verifier.clone());

        DeployNftMarketplace.run(&mut ctx).await?;

        let calls = verifier.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                (NFT_MARKETPLACE.to_string(), Address::with_last_byte(1), vec![]),
                (
                    NFT.to_string(),
                    Address::with_last_byte(2),
                    vec![Address::with_last_byte(1).into()]
                ),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_skips_verification_when_disabled() -> Result<()> {
        let dir = tempdir()?;
        let verifier = Arc::new(MockVerifier::default());
        let mut ctx = context(
            dir.path(),
            31337,
            options(false, false),
            Arc::new(MockDeployer::default()),
        )
        .with_verifier(verifier.clone());

        DeployNftMarketplace.run(&mut ctx).await?;

        assert!(verifier.calls.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_verification_requires_explorer() -> Result<()> {
        let dir = tempdir()?;
        let mut ctx = context(
            dir.path(),
            11155111,
            options(false, true),
            Arc::new(MockDeployer::default()),
        );
        assert!(DeployNftMarketplace.run(&mut ctx).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_verification_fails_the_task() -> Result<()> {
        let dir = tempdir()?;
        let deployer = Arc::new(MockDeployer::default());
        let verifier = Arc::new(MockVerifier::rejecting());
        let mut ctx = context(dir.path(), 11155111, options(false, true), deployer.clone())
            .with_verifier(verifier.clone());

        let err = DeployNftMarketplace.run(&mut ctx).await.unwrap_err();

        assert!(err.to_string().contains("Unable to verify"));
        assert_eq!(deployer.deployed(), vec![NFT_MARKETPLACE, NFT]);
        assert_eq!(ctx.deployments.len(), 2);
        let calls = verifier.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, NFT_MARKETPLACE);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_deployment_stops_the_task() -> Result<()> {
        let dir = tempdir()?;
        let deployer = Arc::new(MockDeployer::failing_on(NFT_MARKETPLACE));
        let verifier = Arc::new(MockVerifier::default());
        let mut ctx = context(dir.path(), 11155111, options(false, true), deployer.clone())
            .with_verifier(verifier.clone());

        let err = DeployNftMarketplace.run(&mut ctx).await.unwrap_err();

        assert!(err.to_string().contains("reverted"));
        assert!(deployer.deployed().is_empty());
        assert!(ctx.deployments.is_empty());
        assert!(verifier.calls.lock().unwrap().is_empty());
        Ok(())
    }
}
