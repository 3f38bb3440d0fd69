// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::TaskContext;
use anyhow::Result;
use async_trait::async_trait;

/// A tagged deployment step. Tasks run in ascending `id` order.
#[async_trait]
pub trait DeployTask: Send + Sync {
    fn id(&self) -> &'static str;

    fn tags(&self) -> &'static [&'static str];

    async fn run(&self, ctx: &mut TaskContext) -> Result<()>;
}
