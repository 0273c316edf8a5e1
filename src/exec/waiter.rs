// src/exec/waiter.rs

//! Bounded, cancellable polling.
//!
//! Resource implementations use a [`Waiter`] to block until some externally
//! observed condition holds, e.g. a stream reporting `ACTIVE`:
//!
//! ```no_run
//! # use std::time::Duration;
//! # use syncgraph::engine::SyncContext;
//! # use syncgraph::exec::Waiter;
//! # async fn demo(ctx: &SyncContext) -> Result<(), syncgraph::exec::WaitError> {
//! let mut waiter = Waiter::new(|| "CREATING".to_string())
//!     .acceptor(|state: &String| state == "ACTIVE")
//!     .max_attempts(40)
//!     .delay(Duration::from_secs(15));
//! let state = waiter.wait(ctx).await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace};

use crate::engine::SyncContext;

pub const DEFAULT_MAX_ATTEMPTS: usize = 20;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Why a [`Waiter`] gave up.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    #[error("exceeded wait attempts ({attempts})")]
    Exhausted { attempts: usize },

    #[error("waiter context canceled after {attempts} attempt(s)")]
    Cancelled { attempts: usize },
}

impl WaitError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, WaitError::Exhausted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitError::Cancelled { .. })
    }

    /// Number of times the action ran.
    pub fn attempts(&self) -> usize {
        match self {
            WaitError::Exhausted { attempts } | WaitError::Cancelled { attempts } => *attempts,
        }
    }
}

/// Predicate deciding whether an observation means "done".
pub struct Acceptor<T> {
    matcher: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Acceptor<T> {
    pub fn new(matcher: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            matcher: Box::new(matcher),
        }
    }

    pub fn matches(&self, observation: &T) -> bool {
        (self.matcher)(observation)
    }
}

impl<T> fmt::Debug for Acceptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acceptor").finish_non_exhaustive()
    }
}

/// Runs an action until an acceptor matches, the attempt budget is spent, or
/// the context is cancelled.
///
/// The action runs inline and may block; the only suspension point is the
/// delay between attempts, which is raced against cancellation.
pub struct Waiter<T> {
    acceptors: Vec<Acceptor<T>>,
    max_attempts: usize,
    delay: Duration,
    action: Box<dyn FnMut() -> T + Send>,
}

impl<T> fmt::Debug for Waiter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("acceptors", &self.acceptors.len())
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl<T> Waiter<T> {
    /// Waiter around `action` with no acceptors, [`DEFAULT_MAX_ATTEMPTS`] and
    /// [`DEFAULT_DELAY`].
    pub fn new(action: impl FnMut() -> T + Send + 'static) -> Self {
        Self {
            acceptors: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            action: Box::new(action),
        }
    }

    pub fn acceptor(mut self, matcher: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.acceptors.push(Acceptor::new(matcher));
        self
    }

    pub fn with_acceptors(mut self, acceptors: Vec<Acceptor<T>>) -> Self {
        self.acceptors.extend(acceptors);
        self
    }

    /// Attempt budget; values below 1 are treated as 1.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Poll until satisfied. Returns the accepted observation.
    ///
    /// - The action always runs at least once, even on a cancelled context.
    /// - After `max_attempts` non-matching observations this returns
    ///   [`WaitError::Exhausted`] without sleeping again.
    /// - Cancellation during a delay returns [`WaitError::Cancelled`]
    ///   immediately.
    pub async fn wait(&mut self, ctx: &SyncContext) -> Result<T, WaitError> {
        let mut attempt = 0usize;

        loop {
            attempt += 1;

            if let Some(observation) = self.observe() {
                debug!(attempt, "waiter satisfied");
                return Ok(observation);
            }

            if attempt >= self.max_attempts {
                debug!(attempts = attempt, "waiter exhausted");
                return Err(WaitError::Exhausted { attempts: attempt });
            }

            trace!(attempt, delay = ?self.delay, "waiter sleeping before next attempt");
            tokio::select! {
                biased;

                _ = ctx.cancelled() => {
                    debug!(attempts = attempt, "waiter cancelled");
                    return Err(WaitError::Cancelled { attempts: attempt });
                }
                _ = tokio::time::sleep(self.delay) => {}
            }
        }
    }

    fn observe(&mut self) -> Option<T> {
        let observation = (self.action)();
        if self.acceptors.iter().any(|a| a.matches(&observation)) {
            Some(observation)
        } else {
            None
        }
    }
}
