// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Marker the solidity compiler leaves where a library address still has to be linked
const LINK_PLACEHOLDER: &str = "__$";

/// A Hardhat compiler artifact (`artifacts/contracts/<Source>.sol/<Name>.json`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    bytecode: String,
}

impl ContractArtifact {
    /// Creation code without constructor arguments
    pub fn creation_code(&self) -> Result<Bytes> {
        if self.bytecode.contains(LINK_PLACEHOLDER) {
            bail!(
                "{} has unlinked library references and cannot be deployed directly",
                self.contract_name
            );
        }
        let code = hex::decode(self.bytecode.trim_start_matches("0x"))
            .with_context(|| format!("Invalid bytecode in artifact for {}", self.contract_name))?;
        if code.is_empty() {
            bail!(
                "{} has no bytecode. Is it an abstract contract or an interface?",
                self.contract_name
            );
        }
        Ok(code.into())
    }

    /// Fully qualified name as the explorer expects it eg. `contracts/NFT.sol:NFT`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: String,
}

/// The compiler run that produced an artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    /// Standard json input handed to solc
    pub input: serde_json::Value,
}

impl BuildInfo {
    /// Compiler version in the form the explorer expects eg. `v0.8.7+commit.e28d00a7`
    pub fn compiler_version(&self) -> String {
        format!("v{}", self.solc_long_version)
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the artifact for a contract by name anywhere under the artifacts folder
    pub fn artifact_path(&self, contract_name: &str) -> Result<PathBuf> {
        let pattern = format!(
            "{}/**/{}.json",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            glob::Pattern::escape(contract_name)
        );
        let matches: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| entry.ok())
            .filter(|path| !path.starts_with(self.root.join("build-info")))
            .collect();

        match matches.as_slice() {
            [] => Err(anyhow!(
                "No artifact found for {} under {}. Have the contracts been compiled?",
                contract_name,
                self.root.display()
            )),
            [path] => Ok(path.clone()),
            many => Err(anyhow!(
                "Found {} artifacts named {}: {:?}",
                many.len(),
                contract_name,
                many
            )),
        }
    }

    pub fn load(&self, contract_name: &str) -> Result<ContractArtifact> {
        let path = self.artifact_path(contract_name)?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Could not read artifact {}", path.display()))?;
        let artifact: ContractArtifact = serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse artifact {}", path.display()))?;
        Ok(artifact)
    }

    /// Follow the artifact's debug file to the build info it was compiled in
    pub fn build_info(&self, contract_name: &str) -> Result<BuildInfo> {
        let artifact_path = self.artifact_path(contract_name)?;
        let dbg_path = artifact_path.with_file_name(format!("{contract_name}.dbg.json"));
        let dbg: DebugFile = serde_json::from_str(
            &fs::read_to_string(&dbg_path)
                .with_context(|| format!("Could not read {}", dbg_path.display()))?,
        )?;

        let parent = dbg_path
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent folder", dbg_path.display()))?;
        let build_info_path = parent.join(&dbg.build_info);
        let contents = fs::read_to_string(&build_info_path)
            .with_context(|| format!("Could not read build info {}", build_info_path.display()))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn artifact_json(name: &str, bytecode: &str) -> String {
        format!(
            r#"{{
  "_format": "hh-sol-artifact-1",
  "contractName": "{name}",
  "sourceName": "contracts/{name}.sol",
  "abi": [],
  "bytecode": "{bytecode}",
  "deployedBytecode": "0x",
  "linkReferences": {{}},
  "deployedLinkReferences": {{}}
}}"#
        )
    }

    #[test]
    fn test_load_and_build_info() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("artifacts");
        write(
            &root.join("contracts/NFT.sol/NFT.json"),
            &artifact_json("NFT", "0x6080"),
        );
        write(
            &root.join("contracts/NFT.sol/NFT.dbg.json"),
            r#"{"_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc123.json"}"#,
        );
        write(
            &root.join("build-info/abc123.json"),
            r#"{"solcVersion": "0.8.7", "solcLongVersion": "0.8.7+commit.e28d00a7", "input": {"language": "Solidity", "sources": {}}}"#,
        );

        let store = ArtifactStore::new(&root);
        let artifact = store.load("NFT")?;
        assert_eq!(artifact.fully_qualified_name(), "contracts/NFT.sol:NFT");
        assert_eq!(artifact.creation_code()?, Bytes::from(vec![0x60, 0x80]));

        let build_info = store.build_info("NFT")?;
        assert_eq!(build_info.compiler_version(), "v0.8.7+commit.e28d00a7");
        assert_eq!(build_info.input["language"], "Solidity");

        assert!(store.load("NFTMarketplace").is_err());
        Ok(())
    }

    #[test]
    fn test_undeployable_bytecode() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("artifacts");
        write(
            &root.join("contracts/IMarket.sol/IMarket.json"),
            &artifact_json("IMarket", "0x"),
        );
        write(
            &root.join("contracts/Linked.sol/Linked.json"),
            &artifact_json("Linked", "0x6080__$3f925933ac313a1c84f3f4c25b9ea43c90$__"),
        );

        let store = ArtifactStore::new(&root);
        assert!(store.load("IMarket")?.creation_code().is_err());
        assert!(store.load("Linked")?.creation_code().is_err());
        Ok(())
    }

    #[test]
    fn test_ambiguous_name() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("artifacts");
        write(
            &root.join("contracts/a/Token.sol/Token.json"),
            &artifact_json("Token", "0x00"),
        );
        write(
            &root.join("contracts/b/Token.sol/Token.json"),
            &artifact_json("Token", "0x00"),
        );
        let store = ArtifactStore::new(&root);
        let err = store.artifact_path("Token").unwrap_err();
        assert!(err.to_string().contains("Found 2 artifacts"));
        Ok(())
    }
}
