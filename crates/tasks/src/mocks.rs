// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::TaskContext;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{address, Address};
use anyhow::{bail, Result};
use async_trait::async_trait;
use nftm_config::{PathsConfig, ProjectPaths, TaskOptions};
use nftm_evm::{ConstructorArg, ContractDeployer, DeployRequest, DeploymentRecord, Verifier};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Hands out sequential addresses and remembers every request
#[derive(Default)]
pub struct MockDeployer {
    pub requests: Mutex<Vec<DeployRequest>>,
    pub fail_on: Option<&'static str>,
}

impl MockDeployer {
    pub fn failing_on(contract_name: &'static str) -> Self {
        Self {
            fail_on: Some(contract_name),
            ..Default::default()
        }
    }

    pub fn deployed(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.contract_name.clone())
            .collect()
    }
}

pub fn abi_for(contract_name: &str) -> JsonAbi {
    serde_json::from_str(&format!(
        r#"[{{"type":"function","name":"name{contract_name}","inputs":[],"outputs":[{{"name":"","type":"string"}}],"stateMutability":"view"}}]"#
    ))
    .unwrap()
}

#[async_trait]
impl ContractDeployer for MockDeployer {
    async fn deploy(&self, request: DeployRequest) -> Result<DeploymentRecord> {
        if self.fail_on == Some(request.contract_name.as_str()) {
            bail!("transaction reverted");
        }
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        let address = Address::with_last_byte(requests.len() as u8);
        Ok(DeploymentRecord {
            abi: abi_for(&request.contract_name),
            contract_name: request.contract_name,
            address,
            args: request.args,
            transaction_hash: None,
            block_number: Some(requests.len() as u64),
            gas_used: Some(21000),
            confirmations: request.confirmations,
        })
    }
}

#[derive(Default)]
pub struct MockVerifier {
    pub calls: Mutex<Vec<(String, Address, Vec<ConstructorArg>)>>,
    pub rejects: bool,
}

impl MockVerifier {
    pub fn rejecting() -> Self {
        Self {
            rejects: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    async fn verify(
        &self,
        contract_name: &str,
        address: Address,
        args: &[ConstructorArg],
    ) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((contract_name.to_string(), address, args.to_vec()));
        if self.rejects {
            bail!("Verification of {} was rejected: Fail - Unable to verify", address);
        }
        Ok(())
    }
}

pub fn options(update_front_end: bool, verify_on_explorer: bool) -> TaskOptions {
    TaskOptions {
        update_front_end,
        verify_on_explorer,
        confirmations: 1,
    }
}

pub fn context(
    root: &Path,
    chain_id: u64,
    options: TaskOptions,
    deployer: Arc<MockDeployer>,
) -> TaskContext {
    TaskContext::new(
        "sepolia",
        chain_id,
        options,
        DEPLOYER,
        ProjectPaths::resolve(root, &PathsConfig::default()),
        deployer,
    )
}
