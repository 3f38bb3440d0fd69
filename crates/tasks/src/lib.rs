// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod address_map;
mod context;
mod deploy_nft_marketplace;
#[cfg(test)]
mod mocks;
mod runner;
mod traits;
mod update_front_end;

pub use address_map::*;
pub use context::*;
pub use deploy_nft_marketplace::*;
pub use runner::*;
pub use traits::*;
pub use update_front_end::*;
