// src/exec/mod.rs

//! Execution helpers for resource implementations.
//!
//! Neither is used by the engine itself:
//!
//! - [`waiter`] polls an action until an acceptor matches, with a bounded
//!   number of attempts and a cancellable delay.
//! - [`pool`] runs jobs on a fixed number of background workers fed by a
//!   bounded queue.

pub mod pool;
pub mod waiter;

pub use pool::{PoolConfig, PoolError, WorkerPool};
pub use waiter::{Acceptor, WaitError, Waiter};
