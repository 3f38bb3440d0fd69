// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DeployNftMarketplace, DeployTask, TaskContext, UpdateFrontEnd};
use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use tracing::info;

/// Runs deployment tasks in id order, optionally narrowed down by tag
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<Box<dyn DeployTask>>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_tasks() -> Self {
        Self::new()
            .register(DeployNftMarketplace)
            .register(UpdateFrontEnd)
    }

    pub fn register(mut self, task: impl DeployTask + 'static) -> Self {
        self.tasks.push(Box::new(task));
        self.tasks.sort_by_key(|t| t.id());
        self
    }

    /// Every tag known to the registered tasks
    pub fn tags(&self) -> BTreeSet<&'static str> {
        self.tasks
            .iter()
            .flat_map(|t| t.tags().iter().copied())
            .collect()
    }

    /// Tasks carrying any of the given tags. No tags selects every task.
    pub fn select(&self, tags: &[String]) -> Result<Vec<&dyn DeployTask>> {
        let known = self.tags();
        let unknown: Vec<&str> = tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !known.contains(*tag))
            .collect();
        if !unknown.is_empty() {
            bail!(
                "Unknown tag(s): {}. Available tags: {}",
                unknown.join(", "),
                known.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        Ok(self
            .tasks
            .iter()
            .filter(|task| {
                tags.is_empty()
                    || task
                        .tags()
                        .iter()
                        .any(|tag| tags.iter().any(|wanted| wanted == tag))
            })
            .map(|task| task.as_ref())
            .collect())
    }

    /// Run the selected tasks one after the other. The first failure ends the run.
    pub async fn run(&self, tags: &[String], ctx: &mut TaskContext) -> Result<Vec<&'static str>> {
        let selected = self.select(tags)?;
        ctx.load_saved_deployments().await?;

        let mut executed = Vec::with_capacity(selected.len());
        for task in selected {
            info!("Running {} on {}", task.id(), ctx.network);
            task.run(ctx)
                .await
                .with_context(|| format!("Task {} failed", task.id()))?;
            executed.push(task.id());
        }
        Ok(executed)
    }
}
