// src/engine/teardown.rs

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::{SyncContext, SyncReport};
use crate::errors::{Result, SyncError};
use crate::resource::Resource;

/// Delete resources one at a time in reverse topological order.
///
/// Stops at the first failing `delete` and returns its error; resources
/// later in the reverse order are left untouched.
pub(crate) async fn teardown(
    ctx: &SyncContext,
    resources: &[Arc<dyn Resource>],
    order: &[usize],
) -> Result<SyncReport> {
    if order.len() < resources.len() {
        warn!(
            ordered = order.len(),
            total = resources.len(),
            "topological order is incomplete; resources on a cycle will not be deleted"
        );
    }

    let reversed: Vec<usize> = order.iter().rev().copied().collect();
    let names: Vec<&str> = reversed.iter().map(|&i| resources[i].name()).collect();
    info!(order = ?names, "order of deletion");

    for idx in reversed {
        let res = &resources[idx];
        debug!(resource = %res.name(), "deleting resource");
        if let Err(source) = res.delete(ctx).await {
            warn!(resource = %res.name(), error = %source, "delete failed; aborting teardown");
            return Err(SyncError::Delete {
                name: res.name().to_string(),
                source,
            });
        }
    }

    Ok(SyncReport::default())
}
