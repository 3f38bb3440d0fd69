// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "nftm.config.yaml";

/// Strategy used to look for the config file when none is passed on the cli
pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Closest file with the given name in `start` or any folder above it
pub fn find_in_parent(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Work out which config file to read. The cli argument wins, then the closest file above the
/// cwd, and finally the cwd itself so that the not found error names a sensible location.
pub fn resolve_config_path(
    find: FindInParent,
    cwd: impl Into<PathBuf>,
    filename: &str,
    cli_file: Option<PathBuf>,
) -> PathBuf {
    let cwd = cwd.into();
    match cli_file {
        Some(file) if file.is_absolute() => file,
        Some(file) => clean(cwd.join(file)),
        None => find(&cwd, filename).unwrap_or_else(|| clean(cwd.join(filename))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
        None
    }

    fn found(_: &Path, _: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/project/nftm.config.yaml"))
    }

    #[test]
    fn test_resolve_config_path() {
        let cwd = PathBuf::from("/project/pages");
        let resolve = |find: FindInParent, cli: Option<&str>| {
            resolve_config_path(find, cwd.clone(), DEFAULT_CONFIG_NAME, cli.map(PathBuf::from))
        };

        assert_eq!(
            resolve(not_found, None),
            PathBuf::from("/project/pages/nftm.config.yaml")
        );
        assert_eq!(
            resolve(found, None),
            PathBuf::from("/project/nftm.config.yaml")
        );
        // the cli argument beats a discovered file
        assert_eq!(
            resolve(found, Some("/etc/nftm/testnet.yaml")),
            PathBuf::from("/etc/nftm/testnet.yaml")
        );
        assert_eq!(
            resolve(found, Some("../deploy/testnet.yaml")),
            PathBuf::from("/project/deploy/testnet.yaml")
        );
    }

    #[test]
    fn test_find_in_parent_walks_up() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("pages/constants");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "networks: []")?;

        assert_eq!(
            find_in_parent(&nested, DEFAULT_CONFIG_NAME),
            Some(dir.path().join(DEFAULT_CONFIG_NAME))
        );
        assert_eq!(find_in_parent(&nested, "missing.yaml"), None);
        Ok(())
    }
}
