// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DeploymentRecord, Deployments};
use anyhow::{bail, Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const CHAIN_ID_FILE: &str = ".chainId";

/// Saved deployments for one network laid out as `<deployments>/<network>/<Contract>.json`
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    dir: PathBuf,
}

impl DeploymentStore {
    pub fn new(deployments_root: &Path, network_name: &str) -> Self {
        Self {
            dir: deployments_root.join(network_name),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, contract_name: &str) -> PathBuf {
        self.dir.join(format!("{contract_name}.json"))
    }

    /// The chain id the saved deployments belong to
    pub async fn chain_id(&self) -> Result<Option<u64>> {
        let path = self.dir.join(CHAIN_ID_FILE);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents.trim().parse().with_context(|| {
                format!("Invalid chain id in {}", path.display())
            })?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark the folder as belonging to a chain. Saved deployments from another chain are an error.
    pub async fn ensure_chain_id(&self, chain_id: u64) -> Result<()> {
        match self.chain_id().await? {
            Some(saved) if saved != chain_id => bail!(
                "Deployments in {} belong to chain {} but the network reports chain {}",
                self.dir.display(),
                saved,
                chain_id
            ),
            Some(_) => Ok(()),
            None => {
                fs::create_dir_all(&self.dir).await?;
                fs::write(self.dir.join(CHAIN_ID_FILE), chain_id.to_string()).await?;
                Ok(())
            }
        }
    }

    pub async fn save(&self, record: &DeploymentRecord) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.record_path(&record.contract_name);
        fs::write(&path, serde_json::to_string_pretty(record)?)
            .await
            .with_context(|| format!("Could not save deployment to {}", path.display()))?;
        debug!("Saved {} deployment to {}", record.contract_name, path.display());
        Ok(())
    }

    pub async fn load(&self, contract_name: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract_name);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(parse_record(&path, &contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load_all(&self) -> Result<Deployments> {
        let mut deployments = Deployments::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(deployments),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = fs::read_to_string(&path).await?;
            deployments.insert(parse_record(&path, &contents)?);
        }

        Ok(deployments)
    }
}

/// Records written by hardhat-deploy carry no contract name. It is the file name there.
fn parse_record(path: &Path, contents: &str) -> Result<DeploymentRecord> {
    let mut record: DeploymentRecord = serde_json::from_str(contents)
        .with_context(|| format!("Could not parse deployment {}", path.display()))?;
    if record.contract_name.is_empty() {
        record.contract_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(String::from)
            .with_context(|| format!("No contract name for deployment {}", path.display()))?;
    }
    Ok(record)
}
