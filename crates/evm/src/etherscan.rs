// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{encode_constructor_args, ArtifactStore, ConstructorArg, VerifyError};
use alloy::primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;
use nftm_config::EtherscanConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Publishes contract source to a block explorer
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(
        &self,
        contract_name: &str,
        address: Address,
        args: &[ConstructorArg],
    ) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    message: String,
    result: Value,
}

impl ApiResponse {
    fn is_ok(&self) -> bool {
        self.status == "1"
    }

    fn result_str(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed(String),
}

/// Map a `checkverifystatus` result onto an outcome
pub fn interpret_status(result: &str) -> VerificationStatus {
    let lower = result.to_lowercase();
    if lower.contains("pending") {
        VerificationStatus::Pending
    } else if lower.starts_with("pass") || lower.contains("already verified") {
        VerificationStatus::Verified
    } else {
        VerificationStatus::Failed(result.to_string())
    }
}

/// `getsourcecode` returns one entry per contract with an empty `SourceCode` when unverified
fn is_source_published(result: &Value) -> bool {
    result
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("SourceCode"))
        .and_then(Value::as_str)
        .is_some_and(|source| !source.is_empty())
}

/// Fields for a `verifysourcecode` submission
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRequest {
    pub address: Address,
    pub source_code: String,
    pub contract_name: String,
    pub compiler_version: String,
    pub constructor_arguments: String,
}

impl VerificationRequest {
    fn form(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", api_key.to_string()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", self.address.to_string()),
            ("sourceCode", self.source_code.clone()),
            ("codeformat", "solidity-standard-json-input".to_string()),
            ("contractname", self.contract_name.clone()),
            ("compilerversion", self.compiler_version.clone()),
            // sic, the explorer api spells it this way
            ("constructorArguements", self.constructor_arguments.clone()),
        ]
    }
}

/// Etherscan style verification through the multichain api
pub struct EtherscanVerifier {
    client: Client,
    api_url: String,
    api_key: String,
    chain_id: u64,
    artifacts: ArtifactStore,
    poll_interval: Duration,
    max_status_checks: u32,
}

impl EtherscanVerifier {
    pub fn new(
        config: &EtherscanConfig,
        api_key: String,
        chain_id: u64,
        artifacts: ArtifactStore,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            chain_id,
            artifacts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_status_checks: config.max_status_checks,
        })
    }

    /// Assemble the submission from the compiler output for the contract
    pub fn build_request(
        &self,
        contract_name: &str,
        address: Address,
        args: &[ConstructorArg],
    ) -> Result<VerificationRequest> {
        let artifact = self.artifacts.load(contract_name)?;
        let build_info = self.artifacts.build_info(contract_name)?;
        let encoded_args = encode_constructor_args(&artifact.abi, args)?;

        Ok(VerificationRequest {
            address,
            source_code: serde_json::to_string(&build_info.input)?,
            contract_name: artifact.fully_qualified_name(),
            compiler_version: build_info.compiler_version(),
            constructor_arguments: hex::encode(encoded_args),
        })
    }

    async fn get(&self, query: &[(&str, &str)]) -> Result<ApiResponse, VerifyError> {
        let chain_id = self.chain_id.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("chainid", chain_id.as_str()), ("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn is_verified(&self, address: Address) -> Result<bool, VerifyError> {
        let address = address.to_string();
        let response = self
            .get(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", &address),
            ])
            .await?;
        if !response.is_ok() {
            return Err(VerifyError::Api(format!(
                "{}: {}",
                response.message,
                response.result_str()
            )));
        }
        Ok(is_source_published(&response.result))
    }

    /// Returns the submission guid or `None` when the explorer already has the source
    async fn submit(&self, request: &VerificationRequest) -> Result<Option<String>, VerifyError> {
        let chain_id = self.chain_id.to_string();
        let response: ApiResponse = self
            .client
            .post(&self.api_url)
            .query(&[("chainid", chain_id.as_str())])
            .form(&request.form(&self.api_key))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = response.result_str();
        if response.is_ok() {
            return Ok(Some(result));
        }
        if result.to_lowercase().contains("already verified") {
            return Ok(None);
        }
        Err(VerifyError::Api(format!("{}: {}", response.message, result)))
    }

    async fn wait_for_result(&self, address: Address, guid: &str) -> Result<(), VerifyError> {
        for check in 1..=self.max_status_checks {
            sleep(self.poll_interval).await;
            let response = self
                .get(&[
                    ("module", "contract"),
                    ("action", "checkverifystatus"),
                    ("guid", guid),
                ])
                .await?;
            let result = response.result_str();
            debug!(%address, check, "verification status: {}", result);

            match interpret_status(&result) {
                VerificationStatus::Pending => continue,
                VerificationStatus::Verified => return Ok(()),
                VerificationStatus::Failed(reason) => {
                    return Err(VerifyError::Rejected { address, reason })
                }
            }
        }
        Err(VerifyError::Timeout {
            address,
            checks: self.max_status_checks,
        })
    }
}

#[async_trait]
impl Verifier for EtherscanVerifier {
    async fn verify(
        &self,
        contract_name: &str,
        address: Address,
        args: &[ConstructorArg],
    ) -> Result<()> {
        if self.is_verified(address).await? {
            info!("{} at {} is already verified", contract_name, address);
            return Ok(());
        }

        let request = self.build_request(contract_name, address, args)?;
        let Some(guid) = self.submit(&request).await? else {
            info!("{} at {} is already verified", contract_name, address);
            return Ok(());
        };
        info!(
            "Submitted source code for {} at {} for verification (guid: {})",
            request.contract_name, address, guid
        );

        self.wait_for_result(address, &guid).await?;
        info!("Successfully verified {} at {}", contract_name, address);
        Ok(())
    }
}
