// src/exec/pool.rs

//! Fixed-size worker pool over a bounded FIFO queue.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub workers: usize,
    pub queue_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            queue_size: 1000,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("work queue is full ({0} jobs queued)")]
    QueueFull(usize),

    #[error("work queue is closed")]
    Closed,
}

/// Background workers draining a shared bounded queue.
///
/// Jobs start in FIFO order; at most `workers` run at once. A panicking job
/// is logged and does not take its worker down. [`WorkerPool::shutdown`]
/// closes the queue and waits until every queued and running job is done.
pub struct WorkerPool {
    tx: mpsc::Sender<Job>,
    workers: JoinSet<()>,
    config: PoolConfig,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("queued", &self.queued())
            .finish()
    }
}

impl WorkerPool {
    /// Spawn the workers. Must be called from within a Tokio runtime.
    ///
    /// Zero workers or a zero-length queue are raised to 1.
    pub fn start(config: PoolConfig) -> Self {
        let config = PoolConfig {
            workers: config.workers.max(1),
            queue_size: config.queue_size.max(1),
        };

        let (tx, rx) = mpsc::channel::<Job>(config.queue_size);
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for id in 0..config.workers {
            let rx = Arc::clone(&rx);
            workers.spawn(worker_loop(id, rx));
        }

        info!(
            workers = config.workers,
            queue_size = config.queue_size,
            "worker pool started"
        );

        Self {
            tx,
            workers,
            config,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Jobs waiting in the queue (not counting running ones).
    pub fn queued(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Enqueue a job, waiting for space if the queue is full.
    pub async fn place<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tx
            .send(Box::pin(job))
            .await
            .map_err(|_| PoolError::Closed)
    }

    /// Enqueue a job, failing immediately if the queue is full.
    pub fn try_place<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tx.try_send(Box::pin(job)).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => PoolError::QueueFull(self.config.queue_size),
            mpsc::error::TrySendError::Closed(_) => PoolError::Closed,
        })
    }

    /// Close the queue and wait for all workers to drain it and exit.
    pub async fn shutdown(self) {
        let Self {
            tx, mut workers, ..
        } = self;
        drop(tx);

        while let Some(res) = workers.join_next().await {
            if let Err(e) = res {
                warn!(error = %e, "worker task ended abnormally");
            }
        }

        info!("worker pool stopped");
    }
}

async fn worker_loop(id: usize, rx: Arc<Mutex<mpsc::Receiver<Job>>>) {
    debug!(worker = id, "worker started");

    loop {
        let job = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };

        let Some(job) = job else {
            break;
        };

        // Run on its own task so a panic is contained to the job.
        if let Err(e) = tokio::spawn(job).await {
            warn!(worker = id, error = %e, "job panicked");
        }
    }

    debug!(worker = id, "worker finished (queue closed)");
}
