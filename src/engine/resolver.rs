// src/engine/resolver.rs

//! Dependency validation, graph construction and value propagation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing::trace;

use crate::dag::Graph;
use crate::errors::ValidationError;
use crate::resource::{Dependency, Resource};

/// Resources completed so far in one construction pass, keyed by name.
///
/// Only grows; dropped at the end of the pass.
#[derive(Clone, Default)]
pub struct BuildCache {
    built: HashMap<String, Arc<dyn Resource>>,
}

impl fmt::Debug for BuildCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.built.keys().collect();
        names.sort_unstable();
        f.debug_struct("BuildCache").field("built", &names).finish()
    }
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Arc<dyn Resource>) {
        self.built.insert(resource.name().to_string(), resource);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.built.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Resource>> {
        self.built.get(name)
    }

    pub fn len(&self) -> usize {
        self.built.len()
    }

    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }

    /// Whether every dependency of `resource` has been built.
    pub fn is_ready(&self, resource: &dyn Resource) -> bool {
        resource
            .dependencies()
            .iter()
            .all(|dep| self.contains(&dep.from_resource))
    }

    /// Cache holding only the upstream resources of `resource`.
    ///
    /// Handed to a wave task so it can propagate values without sharing the
    /// coordinator's cache.
    pub fn upstream_of(&self, resource: &dyn Resource) -> BuildCache {
        let built = resource
            .dependencies()
            .iter()
            .filter_map(|dep| {
                self.built
                    .get(&dep.from_resource)
                    .map(|r| (dep.from_resource.clone(), Arc::clone(r)))
            })
            .collect();
        BuildCache { built }
    }
}

/// Check every declared dependency against the resource set.
///
/// Fails on the first problem found:
/// - empty or duplicate resource names,
/// - a dependency with only one of `from_field` / `to_field` set,
/// - a dependency on a resource not in the set,
/// - a value-carrying dependency naming a field that either side lacks.
///
/// No resource operation is invoked.
pub fn validate(resources: &[Arc<dyn Resource>]) -> Result<(), ValidationError> {
    let index = index_names(resources)?;

    for res in resources {
        for dep in res.dependencies() {
            validate_dependency(res.as_ref(), dep, resources, &index)?;
        }
    }

    Ok(())
}

fn index_names(resources: &[Arc<dyn Resource>]) -> Result<HashMap<&str, usize>, ValidationError> {
    let mut index = HashMap::with_capacity(resources.len());
    for (i, res) in resources.iter().enumerate() {
        let name = res.name();
        if name.is_empty() {
            return Err(ValidationError::EmptyName(i));
        }
        if index.insert(name, i).is_some() {
            return Err(ValidationError::DuplicateResource(name.to_string()));
        }
    }
    Ok(index)
}

fn validate_dependency(
    res: &dyn Resource,
    dep: &Dependency,
    resources: &[Arc<dyn Resource>],
    index: &HashMap<&str, usize>,
) -> Result<(), ValidationError> {
    if dep.is_half_paired() {
        return Err(ValidationError::FieldPairing {
            resource: res.name().to_string(),
            from_resource: dep.from_resource.clone(),
            from_field: dep.from_field.clone(),
            to_field: dep.to_field.clone(),
        });
    }

    let Some(&upstream) = index.get(dep.from_resource.as_str()) else {
        return Err(ValidationError::UnknownResource {
            resource: res.name().to_string(),
            from_resource: dep.from_resource.clone(),
        });
    };

    if !dep.carries_value() {
        return Ok(());
    }

    if !resources[upstream].has_field(&dep.from_field) {
        return Err(ValidationError::MissingField {
            resource: dep.from_resource.clone(),
            field: dep.from_field.clone(),
            referenced_by: res.name().to_string(),
        });
    }

    if !res.has_field(&dep.to_field) {
        return Err(ValidationError::MissingField {
            resource: res.name().to_string(),
            field: dep.to_field.clone(),
            referenced_by: res.name().to_string(),
        });
    }

    Ok(())
}

/// One vertex per resource (by position), one edge per dependency pointing
/// from the dependency to the dependent.
///
/// Assumes `resources` passed [`validate`]; unknown names are skipped.
pub fn build_graph(resources: &[Arc<dyn Resource>]) -> Graph {
    let index: HashMap<&str, usize> = resources
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name(), i))
        .collect();

    let mut graph = Graph::new(resources.len());
    for (i, res) in resources.iter().enumerate() {
        for dep in res.dependencies() {
            if let Some(&from) = index.get(dep.from_resource.as_str()) {
                graph.add_edge(from, i);
            }
        }
    }
    graph
}

/// Copy the value named by `dep` from its built upstream into `downstream`.
///
/// Ordering-only dependencies are a no-op.
pub fn propagate(
    downstream: &dyn Resource,
    dep: &Dependency,
    cache: &BuildCache,
) -> anyhow::Result<()> {
    if !dep.carries_value() {
        return Ok(());
    }

    let upstream = cache.get(&dep.from_resource).ok_or_else(|| {
        anyhow!(
            "dependency '{}' of '{}' has not been built",
            dep.from_resource,
            downstream.name()
        )
    })?;

    let value = upstream.read_field(&dep.from_field).ok_or_else(|| {
        anyhow!(
            "resource '{}' has no value for field '{}'",
            dep.from_resource,
            dep.from_field
        )
    })?;

    trace!(
        from = %dep.from_resource,
        from_field = %dep.from_field,
        to = %downstream.name(),
        to_field = %dep.to_field,
        "propagating field value"
    );

    downstream
        .write_field(&dep.to_field, value)
        .with_context(|| {
            format!(
                "writing field '{}' of '{}' from '{}.{}'",
                dep.to_field,
                downstream.name(),
                dep.from_resource,
                dep.from_field
            )
        })
}
