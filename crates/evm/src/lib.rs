// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod artifacts;
mod deployer;
mod deployment;
mod error;
mod etherscan;
mod provider;
mod store;

pub use artifacts::*;
pub use deployer::*;
pub use deployment::*;
pub use error::*;
pub use etherscan::*;
pub use provider::*;
pub use store::*;
