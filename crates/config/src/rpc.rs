// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, bail, Context, Result};
use std::fmt;
use url::Url;

/// A network's JSON-RPC endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcUrl(Url);

impl RpcUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).with_context(|| format!("'{}' is not a valid url", raw))?;
        if !matches!(url.scheme(), "http" | "https" | "ws" | "wss") {
            bail!(
                "Unsupported rpc scheme '{}'. Expected http(s):// or ws(s)://",
                url.scheme()
            );
        }
        if url.host_str().is_none() {
            bail!("Rpc url '{}' has no host", raw);
        }
        Ok(Self(url))
    }

    /// Deployments only need request/response calls so websocket endpoints are reached over
    /// their http counterpart
    pub fn to_http(&self) -> Result<Url> {
        let scheme = match self.0.scheme() {
            "ws" => "http",
            "wss" => "https",
            _ => return Ok(self.0.clone()),
        };
        let mut url = self.0.clone();
        url.set_scheme(scheme)
            .map_err(|_| anyhow!("Could not switch {} to {}", self.0, scheme))?;
        Ok(url)
    }
}

impl fmt::Display for RpcUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() -> Result<()> {
        assert!(RpcUrl::parse("ftp://localhost:8545").is_err());
        assert!(RpcUrl::parse("not a url").is_err());

        let rpc = RpcUrl::parse(" http://127.0.0.1:8545 ")?;
        assert_eq!(rpc.to_string(), "http://127.0.0.1:8545/");
        Ok(())
    }

    #[test]
    fn test_websocket_to_http() -> Result<()> {
        let rpc = RpcUrl::parse("wss://eth-sepolia.example.org/v2/key")?;
        assert_eq!(
            rpc.to_http()?.as_str(),
            "https://eth-sepolia.example.org/v2/key"
        );

        let rpc = RpcUrl::parse("ws://localhost:8545")?;
        assert_eq!(rpc.to_http()?.as_str(), "http://localhost:8545/");

        let rpc = RpcUrl::parse("https://rpc.sepolia.org")?;
        assert_eq!(rpc.to_http()?.as_str(), "https://rpc.sepolia.org/");
        Ok(())
    }
}
