// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Explorer returned an error: {0}")]
    Api(String),

    #[error("Verification of {address} was rejected: {reason}")]
    Rejected { address: Address, reason: String },

    #[error("Verification of {address} was still pending after {checks} status checks")]
    Timeout { address: Address, checks: u32 },
}
