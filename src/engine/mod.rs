// src/engine/mod.rs

//! Orchestration engine.
//!
//! One [`Engine::sync`] call validates the resource set, derives the
//! dependency graph and its topological order, then either builds resources
//! in concurrent waves ([`build`]) or deletes them sequentially in reverse
//! order ([`teardown`]). Nothing survives the call.
//!
//! - [`context`] holds the cancellable [`SyncContext`].
//! - [`resolver`] validates dependencies and propagates field values.
//! - [`error_map`] aggregates per-resource failures.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::model::{EngineSection, ResourceDescriptor};
use crate::dag::sort;
use crate::errors::{Result, SyncError};
use crate::resource::{Factory, Resource};
use crate::types::WaveScan;

pub mod build;
pub mod context;
pub mod error_map;
pub mod resolver;
pub mod teardown;

pub use context::SyncContext;
pub use error_map::ErrorMap;
pub use resolver::BuildCache;

/// Engine settings, passed explicitly instead of living in globals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub wave_scan: WaveScan,
    /// Wave budget for construction. `None` means one wave per resource,
    /// enough for any acyclic set.
    pub max_attempts: Option<usize>,
}

impl From<&EngineSection> for EngineConfig {
    fn from(section: &EngineSection) -> Self {
        Self {
            wave_scan: section.wave_scan,
            max_attempts: section.max_attempts,
        }
    }
}

/// Result of a successful sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Non-empty statuses returned by `update`, keyed by resource name.
    /// Always empty for deletion.
    pub statuses: BTreeMap<String, String>,
    /// Number of construction waves run.
    pub waves: usize,
}

impl SyncReport {
    pub fn status(&self, name: &str) -> Option<&str> {
        self.statuses.get(name).map(|s| s.as_str())
    }
}

/// Execution order computed without running anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub construction: Vec<String>,
    pub deletion: Vec<String>,
    /// Resources the sort could not place (they sit on or behind a cycle).
    pub unordered: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build (`to_delete == false`) or tear down (`to_delete == true`) the
    /// given resources.
    ///
    /// Validation failures are returned before any resource is touched.
    pub async fn sync(
        &self,
        ctx: &SyncContext,
        resources: &[Arc<dyn Resource>],
        to_delete: bool,
    ) -> Result<SyncReport> {
        info!(resources = resources.len(), to_delete, "starting sync");

        resolver::validate(resources)?;
        let graph = resolver::build_graph(resources);
        debug!(%graph, "dependency graph built");
        let order = sort(&graph);

        if to_delete {
            teardown::teardown(ctx, resources, &order).await
        } else {
            build::construct(ctx, resources, &graph, &order, &self.config).await
        }
    }

    /// Create resources for `descriptors` through `factory`, then
    /// [`Engine::sync`] them.
    pub async fn sync_descriptors(
        &self,
        ctx: &SyncContext,
        descriptors: &[ResourceDescriptor],
        factory: &dyn Factory,
        to_delete: bool,
    ) -> Result<SyncReport> {
        let resources = instantiate(descriptors, factory)?;
        self.sync(ctx, &resources, to_delete).await
    }

    /// Validate and order `resources` without calling them.
    pub fn plan(&self, resources: &[Arc<dyn Resource>]) -> Result<Plan> {
        resolver::validate(resources)?;
        let graph = resolver::build_graph(resources);
        let order = sort(&graph);

        let construction: Vec<String> = order
            .iter()
            .map(|&i| resources[i].name().to_string())
            .collect();
        let deletion = construction.iter().rev().cloned().collect();

        let mut placed = vec![false; resources.len()];
        for &i in &order {
            placed[i] = true;
        }
        let unordered = resources
            .iter()
            .zip(placed)
            .filter(|(_, placed)| !placed)
            .map(|(r, _)| r.name().to_string())
            .collect();

        Ok(Plan {
            construction,
            deletion,
            unordered,
        })
    }
}

/// Turn every descriptor into a resource, failing on the first unknown type.
pub fn instantiate(
    descriptors: &[ResourceDescriptor],
    factory: &dyn Factory,
) -> Result<Vec<Arc<dyn Resource>>> {
    descriptors
        .iter()
        .map(|desc| {
            factory
                .create(desc)
                .ok_or_else(|| SyncError::UnknownResourceType {
                    name: desc.name.clone(),
                    kind: desc.kind.clone(),
                })
        })
        .collect()
}
