// src/engine/build.rs

//! Wave-based concurrent construction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::dag::{Graph, find_cycle_member};
use crate::engine::error_map::ErrorMap;
use crate::engine::resolver::{BuildCache, propagate};
use crate::engine::{EngineConfig, SyncContext, SyncReport};
use crate::errors::{Result, SyncError};
use crate::resource::Resource;
use crate::types::WaveScan;

/// Build every resource, one wave of ready resources at a time.
///
/// - Each wave runs its resources concurrently and waits for all of them.
/// - The cache and error map are only touched between waves.
/// - Any failure ends construction after the wave that produced it.
/// - The number of waves is bounded by `config.max_attempts`, or the number
///   of resources.
pub(crate) async fn construct(
    ctx: &SyncContext,
    resources: &[Arc<dyn Resource>],
    graph: &Graph,
    order: &[usize],
    config: &EngineConfig,
) -> Result<SyncReport> {
    let total = resources.len();
    let mut attempts_remaining = config.max_attempts.unwrap_or(total);
    let mut resources_remaining = total;

    let mut cache = BuildCache::new();
    let mut statuses: BTreeMap<String, String> = BTreeMap::new();
    let mut waves = 0usize;

    if order.len() < total {
        warn!(
            ordered = order.len(),
            total,
            "topological order is incomplete; some resources can never become ready"
        );
    }

    while attempts_remaining > 0 && resources_remaining > 0 {
        let wave = select_wave(resources, order, &cache, config.wave_scan);
        if wave.is_empty() {
            // Nothing is ready now, so nothing will be ready later.
            debug!("no resource is ready; stopping early");
            break;
        }

        waves += 1;
        let names: Vec<&str> = wave.iter().map(|&i| resources[i].name()).collect();
        debug!(wave = waves, resources = ?names, "executing wave");

        let results = run_wave(ctx, resources, &wave, &cache).await;

        let mut errors = ErrorMap::new();
        let mut built = 0usize;
        for (idx, outcome) in results {
            let res = &resources[idx];
            match outcome {
                Ok(status) => {
                    debug!(resource = %res.name(), status = %status, "resource built");
                    if !status.is_empty() {
                        statuses.insert(res.name().to_string(), status);
                    }
                    cache.insert(Arc::clone(res));
                    built += 1;
                }
                Err(err) => {
                    warn!(resource = %res.name(), error = %err, "error executing resource update");
                    errors.insert(res.name(), err);
                }
            }
        }

        resources_remaining -= built;
        errors.into_result().map_err(SyncError::Resources)?;
        attempts_remaining -= 1;
    }

    if resources_remaining > 0 {
        let remaining: Vec<String> = resources
            .iter()
            .filter(|r| !cache.contains(r.name()))
            .map(|r| r.name().to_string())
            .collect();
        let cycle = find_cycle_member(graph).map(|v| resources[v].name().to_string());
        warn!(?remaining, ?cycle, waves, "construction attempts exhausted");
        return Err(SyncError::AttemptsExhausted { remaining, cycle });
    }

    info!(resources = total, waves, "construction finished");
    Ok(SyncReport { statuses, waves })
}

/// Indices from `order` that are not built yet and whose dependencies all
/// are.
///
/// With [`WaveScan::Conservative`] scanning stops at the first unbuilt
/// resource that is not ready.
fn select_wave(
    resources: &[Arc<dyn Resource>],
    order: &[usize],
    cache: &BuildCache,
    scan: WaveScan,
) -> Vec<usize> {
    let mut wave = Vec::new();

    for &i in order {
        let res = resources[i].as_ref();
        if cache.contains(res.name()) {
            continue;
        }

        if cache.is_ready(res) {
            wave.push(i);
        } else if scan == WaveScan::Conservative {
            break;
        }
    }

    wave
}

/// Run one wave and wait for every task.
///
/// Each task first propagates dependency values, then calls `update`. A
/// panicking task is reported as that resource's error.
async fn run_wave(
    ctx: &SyncContext,
    resources: &[Arc<dyn Resource>],
    wave: &[usize],
    cache: &BuildCache,
) -> Vec<(usize, anyhow::Result<String>)> {
    let mut set: JoinSet<anyhow::Result<String>> = JoinSet::new();
    let mut task_index = HashMap::with_capacity(wave.len());

    for &idx in wave {
        let resource = Arc::clone(&resources[idx]);
        let upstream = cache.upstream_of(resource.as_ref());
        let ctx = ctx.clone();

        let handle = set.spawn(async move {
            for dep in resource.dependencies() {
                propagate(resource.as_ref(), dep, &upstream)?;
            }
            resource.update(&ctx).await
        });
        task_index.insert(handle.id(), idx);
    }

    let mut results = Vec::with_capacity(wave.len());
    while let Some(joined) = set.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                if let Some(&idx) = task_index.get(&id) {
                    results.push((idx, outcome));
                }
            }
            Err(join_err) => {
                if let Some(&idx) = task_index.get(&join_err.id()) {
                    let name = resources[idx].name();
                    let err = anyhow!("update task for '{name}' failed: {join_err}");
                    results.push((idx, Err(err)));
                }
            }
        }
    }

    results
}
