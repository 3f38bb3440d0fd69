// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// The front end's record of deployed addresses: chain id -> contract name -> addresses
/// in deployment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressMap(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl AddressMap {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// A missing file reads as an empty map
    pub async fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path).await {
            Ok(contents) => Self::from_json(&contents)
                .with_context(|| format!("Could not parse address map {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Could not read address map {}", path.display()))
            }
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, self.to_json()?)
            .await
            .with_context(|| format!("Could not write address map {}", path.display()))
    }

    /// Record the given deployments on a chain. Addresses already listed for a contract are
    /// skipped and every other entry is left alone.
    pub fn sync_chain(&mut self, chain_id: u64, contracts: &[(&str, Address)]) {
        let chain = self.0.entry(chain_id.to_string()).or_default();
        for (name, address) in contracts {
            let address = address.to_string();
            let addresses = chain.entry(name.to_string()).or_default();
            if !addresses
                .iter()
                .any(|known| known.eq_ignore_ascii_case(&address))
            {
                addresses.push(address);
            }
        }
    }

    pub fn addresses(&self, chain_id: &str, contract_name: &str) -> Option<&[String]> {
        self.0
            .get(chain_id)
            .and_then(|chain| chain.get(contract_name))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use tempfile::tempdir;

    const MARKETPLACE: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const NFT_V1: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const NFT_V2: Address = address!("0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");

    #[test]
    fn test_appends_only_new_addresses() -> Result<()> {
        let mut map = AddressMap::from_json(&format!(
            r#"{{"31337":{{"NFTMarketplace":["{MARKETPLACE}"],"NFT":["{NFT_V1}"]}}}}"#
        ))?;

        map.sync_chain(31337, &[("NFTMarketplace", MARKETPLACE), ("NFT", NFT_V2)]);

        assert_eq!(
            map.addresses("31337", "NFTMarketplace"),
            Some(&[MARKETPLACE.to_string()][..])
        );
        assert_eq!(
            map.addresses("31337", "NFT"),
            Some(&[NFT_V1.to_string(), NFT_V2.to_string()][..])
        );
        Ok(())
    }

    #[test]
    fn test_creates_missing_chain() -> Result<()> {
        let mut map = AddressMap::from_json(&format!(
            r#"{{"31337":{{"NFTMarketplace":["{MARKETPLACE}"],"NFT":["{NFT_V1}"]}}}}"#
        ))?;
        let before = map.clone();

        map.sync_chain(5, &[("NFTMarketplace", NFT_V1), ("NFT", NFT_V2)]);

        assert_eq!(
            map.addresses("5", "NFTMarketplace"),
            Some(&[NFT_V1.to_string()][..])
        );
        assert_eq!(map.addresses("5", "NFT"), Some(&[NFT_V2.to_string()][..]));
        assert_eq!(
            map.addresses("31337", "NFT"),
            before.addresses("31337", "NFT")
        );
        assert_eq!(
            map.addresses("31337", "NFTMarketplace"),
            Some(&[MARKETPLACE.to_string()][..])
        );
        Ok(())
    }

    #[test]
    fn test_duplicates_ignore_case() -> Result<()> {
        let lower = MARKETPLACE.to_string().to_lowercase();
        let mut map = AddressMap::from_json(&format!(
            r#"{{"5":{{"NFTMarketplace":["{lower}"]}}}}"#
        ))?;

        map.sync_chain(5, &[("NFTMarketplace", MARKETPLACE), ("NFT", NFT_V1)]);

        assert_eq!(map.addresses("5", "NFTMarketplace"), Some(&[lower][..]));
        assert_eq!(map.addresses("5", "NFT"), Some(&[NFT_V1.to_string()][..]));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_and_save() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("pages/constants/networkMapping.json");

        let mut map = AddressMap::load(&path).await?;
        assert_eq!(map, AddressMap::default());

        map.sync_chain(31337, &[("NFTMarketplace", MARKETPLACE), ("NFT", NFT_V1)]);
        map.save(&path).await?;

        let written = std::fs::read_to_string(&path)?;
        assert!(!written.contains('\n'));
        assert_eq!(AddressMap::load(&path).await?, map);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("networkMapping.json");
        std::fs::write(&path, "not json")?;
        assert!(AddressMap::load(&path).await.is_err());
        Ok(())
    }
}
