// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod app_config;
pub mod load_config;
pub mod network_config;
mod options;
pub mod paths;
pub mod rpc;
pub mod validation;
mod yaml;

pub use app_config::*;
pub use network_config::*;
pub use options::*;
pub use paths::*;
pub use rpc::*;
