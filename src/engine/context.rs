// src/engine/context.rs

use tokio_util::sync::CancellationToken;

/// Per-call context handed to every resource operation and to the waiter.
///
/// Cheap to clone; clones share the same cancellation state. The engine
/// never cancels on its own, it only forwards the context.
#[derive(Debug, Clone)]
pub struct SyncContext {
    cancel: CancellationToken,
}

impl SyncContext {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    /// Wrap an existing token, e.g. one owned by a long-lived service.
    pub fn from_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Request cancellation for this context and every child.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// A context cancelled together with `self`, but which can also be
    /// cancelled on its own.
    pub fn child(&self) -> SyncContext {
        Self {
            cancel: self.cancel.child_token(),
        }
    }
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::new()
    }
}
