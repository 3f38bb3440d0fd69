// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project layout as written in the configuration file. Relative entries are resolved against
/// the directory holding the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Hardhat compiler output
    pub artifacts: PathBuf,
    /// Saved deployment records, one folder per network
    pub deployments: PathBuf,
    /// The front end's address map
    pub front_end_contracts_file: PathBuf,
    /// Folder receiving one `<Contract>.json` abi file per contract
    pub front_end_abi_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("artifacts"),
            deployments: PathBuf::from("deployments"),
            front_end_contracts_file: PathBuf::from("pages/constants/networkMapping.json"),
            front_end_abi_dir: PathBuf::from("pages/constants/abi"),
        }
    }
}

/// Fully qualified project paths
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub artifacts: PathBuf,
    pub deployments: PathBuf,
    pub front_end_contracts_file: PathBuf,
    pub front_end_abi_dir: PathBuf,
}

impl ProjectPaths {
    pub fn resolve(root: &Path, config: &PathsConfig) -> Self {
        Self {
            root: clean(root),
            artifacts: relative_to(root, &config.artifacts),
            deployments: relative_to(root, &config.deployments),
            front_end_contracts_file: relative_to(root, &config.front_end_contracts_file),
            front_end_abi_dir: relative_to(root, &config.front_end_abi_dir),
        }
    }

    /// Where the abi for the given contract is written
    pub fn front_end_abi_file(&self, contract_name: &str) -> PathBuf {
        self.front_end_abi_dir.join(format!("{contract_name}.json"))
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return PathBuf::from(path);
    }
    clean(root.join(path))
}
