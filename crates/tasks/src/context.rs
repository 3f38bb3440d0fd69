// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use nftm_config::{ProjectPaths, TaskOptions};
use nftm_evm::{
    ConstructorArg, ContractDeployer, DeployRequest, DeploymentRecord, DeploymentStore,
    Deployments, Verifier,
};
use std::sync::Arc;
use tracing::debug;

/// State shared by the tasks of one run
pub struct TaskContext {
    pub network: String,
    pub chain_id: u64,
    pub options: TaskOptions,
    pub deployer_account: Address,
    pub deployments: Deployments,
    pub paths: ProjectPaths,
    deployer: Arc<dyn ContractDeployer>,
    verifier: Option<Arc<dyn Verifier>>,
    store: Option<DeploymentStore>,
}

impl TaskContext {
    pub fn new(
        network: impl Into<String>,
        chain_id: u64,
        options: TaskOptions,
        deployer_account: Address,
        paths: ProjectPaths,
        deployer: Arc<dyn ContractDeployer>,
    ) -> Self {
        Self {
            network: network.into(),
            chain_id,
            options,
            deployer_account,
            deployments: Deployments::new(),
            paths,
            deployer,
            verifier: None,
            store: None,
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn Verifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Persist every deployment of this run to the given store
    pub fn with_store(mut self, store: DeploymentStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store(&self) -> Option<&DeploymentStore> {
        self.store.as_ref()
    }

    /// Deploy a contract from the deployer account and register it under its name
    pub async fn deploy(
        &mut self,
        contract_name: &str,
        args: Vec<ConstructorArg>,
    ) -> Result<DeploymentRecord> {
        let record = self
            .deployer
            .deploy(DeployRequest {
                contract_name: contract_name.to_string(),
                from: self.deployer_account,
                args,
                confirmations: self.options.confirmations,
            })
            .await?;

        if let Some(store) = &self.store {
            store.save(&record).await?;
        }
        self.deployments.insert(record.clone());
        Ok(record)
    }

    pub fn verifier(&self) -> Result<&Arc<dyn Verifier>> {
        self.verifier
            .as_ref()
            .ok_or_else(|| anyhow!("Verification was requested but no explorer is configured"))
    }

    /// Make deployments saved by earlier runs resolvable by name
    pub async fn load_saved_deployments(&mut self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.ensure_chain_id(self.chain_id).await?;
        for record in store.load_all().await?.iter() {
            if self.deployments.get(&record.contract_name).is_none() {
                debug!(
                    "Loaded saved deployment of {} at {}",
                    record.contract_name, record.address
                );
                self.deployments.insert(record.clone());
            }
        }
        Ok(())
    }
}
