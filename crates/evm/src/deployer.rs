// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{encode_constructor_args, ArtifactStore, ConstructorArg, DeploymentRecord};
use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Everything needed to deploy a single contract
#[derive(Debug, Clone, PartialEq)]
pub struct DeployRequest {
    pub contract_name: String,
    pub from: Address,
    pub args: Vec<ConstructorArg>,
    /// Blocks to wait for on top of the deployment before it counts as done
    pub confirmations: u64,
}

/// Deploys compiled contracts to a network
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    async fn deploy(&self, request: DeployRequest) -> Result<DeploymentRecord>;
}

/// Deploys Hardhat artifacts through an alloy provider
pub struct AlloyDeployer {
    provider: DynProvider,
    artifacts: ArtifactStore,
}

impl AlloyDeployer {
    pub fn new(provider: DynProvider, artifacts: ArtifactStore) -> Self {
        Self {
            provider,
            artifacts,
        }
    }
}

#[async_trait]
impl ContractDeployer for AlloyDeployer {
    async fn deploy(&self, request: DeployRequest) -> Result<DeploymentRecord> {
        let name = &request.contract_name;
        let artifact = self.artifacts.load(name)?;

        let mut code = artifact.creation_code()?.to_vec();
        code.extend_from_slice(
            &encode_constructor_args(&artifact.abi, &request.args)
                .with_context(|| format!("Invalid constructor arguments for {}", name))?,
        );

        let tx = TransactionRequest::default()
            .with_from(request.from)
            .with_deploy_code(Bytes::from(code));

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .with_context(|| format!("Failed to submit deployment of {}", name))?;
        let tx_hash = *pending.tx_hash();
        info!("deploying \"{}\" (tx: {})...", name, tx_hash);

        let receipt = pending
            .with_required_confirmations(request.confirmations)
            .get_receipt()
            .await
            .with_context(|| format!("Failed waiting for deployment of {} (tx: {})", name, tx_hash))?;

        if !receipt.status() {
            bail!("Deployment of {} reverted (tx: {})", name, tx_hash);
        }
        let Some(address) = receipt.contract_address() else {
            bail!(
                "Receipt for {} has no contract address (tx: {})",
                name,
                tx_hash
            );
        };

        info!(
            "deployed \"{}\" at {} with {} gas",
            name,
            address,
            receipt.gas_used()
        );

        Ok(DeploymentRecord {
            contract_name: name.clone(),
            address,
            args: request.args,
            abi: artifact.abi,
            transaction_hash: Some(tx_hash),
            block_number: receipt.block_number(),
            gas_used: Some(receipt.gas_used()),
            confirmations: request.confirmations,
        })
    }
}
