//! Reusable worker pool
//!
//! This module provides a pool of worker handles with:
//! - Lazy creation of workers when no idle worker is available
//! - FIFO reuse of released workers
//! - Safe termination of idle workers only
//! - Usage statistics

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::ids::{IdGenerator, IdStrategy, WorkerId};

/// Error types for worker pool operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("Worker is still in use and cannot be terminated: {0}")]
    ResourceInUse(WorkerId),

    #[error("Worker not found in pool: {0}")]
    NotFound(WorkerId),
}

/// Configuration for worker pool behavior
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// How new worker identifiers are generated
    pub id_strategy: IdStrategy,

    /// Prefix used for generated identifiers
    pub id_prefix: String,

    /// Generator attempts before falling back to a counter-derived id
    pub max_id_attempts: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Sequential,
            id_prefix: "worker".to_string(),
            max_id_attempts: 8,
        }
    }
}

/// Statistics for a worker pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Total workers created
    pub total_created: u64,

    /// Total acquisitions served by an idle worker
    pub total_reused: u64,

    /// Total successful releases
    pub total_released: u64,

    /// Total workers terminated
    pub total_terminated: u64,

    /// Workers currently idle
    pub available: usize,

    /// Workers currently checked out
    pub in_use: usize,
}

/// Point-in-time view of both collections, in their internal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub available: Vec<WorkerId>,
    pub in_use: Vec<WorkerId>,
}

/// A handle to a pooled worker
///
/// Handles are plain values; the pool tracks them by identifier. Releasing
/// or terminating a handle the pool no longer knows about is detected by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WorkerHandle {
    id: WorkerId,
}

impl WorkerHandle {
    fn new(id: WorkerId) -> Self {
        Self { id }
    }

    /// The worker's identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Describe the unit of work this worker performs
    pub fn describe(&self) -> String {
        format!("Worker {} is doing work", self.id)
    }
}

impl fmt::Display for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Pool internals guarded by a single lock
struct PoolState {
    /// Idle workers in release order
    available: VecDeque<WorkerHandle>,

    /// Checked-out workers
    in_use: Vec<WorkerHandle>,

    /// Identifier source
    ids: Box<dyn IdGenerator>,

    /// Pool configuration
    config: PoolConfig,

    /// Pool statistics
    stats: PoolStats,
}

impl PoolState {
    fn is_live(&self, id: &str) -> bool {
        self.available.iter().any(|w| w.id == id) || self.in_use.iter().any(|w| w.id == id)
    }

    /// Generate an identifier not held by any live worker
    fn fresh_id(&mut self) -> WorkerId {
        for attempt in 1..=self.config.max_id_attempts {
            let candidate = self.ids.next_id();
            if !self.is_live(&candidate) {
                return candidate;
            }
            warn!(
                worker_id = %candidate,
                attempt = attempt,
                "Generated worker id collides with a live worker"
            );
        }

        // The live set is finite, so counting upwards always terminates.
        let mut n = self.stats.total_created + 1;
        loop {
            let candidate = format!("{}-{}", self.config.id_prefix, n);
            if !self.is_live(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn acquire(&mut self) -> WorkerHandle {
        if let Some(worker) = self.available.pop_front() {
            self.stats.total_reused += 1;
            debug!(worker_id = %worker.id, "Reusing idle worker");
            self.in_use.push(worker.clone());
            return worker;
        }

        let worker = WorkerHandle::new(self.fresh_id());
        self.stats.total_created += 1;
        info!(
            worker_id = %worker.id,
            total_created = self.stats.total_created,
            "Created new worker"
        );
        self.in_use.push(worker.clone());
        worker
    }

    fn release(&mut self, worker: &WorkerHandle) -> bool {
        match self.in_use.iter().position(|w| w.id == worker.id) {
            Some(pos) => {
                let worker = self.in_use.remove(pos);
                debug!(worker_id = %worker.id, "Released worker");
                self.available.push_back(worker);
                self.stats.total_released += 1;
                true
            }
            None => {
                debug!(worker_id = %worker.id, "Ignoring release of worker that is not in use");
                false
            }
        }
    }

    fn terminate(&mut self, worker: &WorkerHandle) -> Result<(), PoolError> {
        if self.in_use.iter().any(|w| w.id == worker.id) {
            warn!(worker_id = %worker.id, "Refusing to terminate worker in use");
            return Err(PoolError::ResourceInUse(worker.id.clone()));
        }

        let pos = self
            .available
            .iter()
            .position(|w| w.id == worker.id)
            .ok_or_else(|| PoolError::NotFound(worker.id.clone()))?;

        self.available.remove(pos);
        self.stats.total_terminated += 1;
        info!(worker_id = %worker.id, "Terminated worker");
        Ok(())
    }

    fn stats(&self) -> PoolStats {
        let mut stats = self.stats.clone();
        stats.available = self.available.len();
        stats.in_use = self.in_use.len();
        stats
    }
}

/// Thread-safe pool of reusable workers
///
/// Cloning the pool is cheap; clones share the same workers.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<Mutex<PoolState>>,
}

impl WorkerPool {
    /// Create a pool whose identifiers follow `config.id_strategy`
    pub fn new(config: PoolConfig) -> Self {
        let ids = config.id_strategy.generator(&config.id_prefix);
        Self::with_generator(config, ids)
    }

    /// Create a pool with a caller-supplied identifier generator
    pub fn with_generator(config: PoolConfig, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolState {
                available: VecDeque::new(),
                in_use: Vec::new(),
                ids,
                config,
                stats: PoolStats::default(),
            })),
        }
    }

    // Every critical section leaves both collections consistent, so a
    // poisoned lock still guards valid state.
    fn state(&self) -> MutexGuard<'_, PoolState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check out a worker, creating one if none is idle
    pub fn acquire(&self) -> WorkerHandle {
        self.state().acquire()
    }

    /// Return a worker to the pool
    ///
    /// Returns `false` (and changes nothing) if the worker is not checked out.
    pub fn release(&self, worker: &WorkerHandle) -> bool {
        self.state().release(worker)
    }

    /// Permanently remove an idle worker
    pub fn terminate(&self, worker: &WorkerHandle) -> Result<(), PoolError> {
        self.state().terminate(worker)
    }

    /// Number of idle workers
    pub fn available_count(&self) -> usize {
        self.state().available.len()
    }

    /// Number of checked-out workers
    pub fn in_use_count(&self) -> usize {
        self.state().in_use.len()
    }

    /// Total pool population
    pub fn total(&self) -> usize {
        let state = self.state();
        state.available.len() + state.in_use.len()
    }

    pub fn is_available(&self, worker: &WorkerHandle) -> bool {
        self.state().available.iter().any(|w| w.id == worker.id)
    }

    pub fn is_in_use(&self, worker: &WorkerHandle) -> bool {
        self.state().in_use.iter().any(|w| w.id == worker.id)
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        self.state().stats()
    }

    /// Copy of both collections, taken under one lock
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state();
        PoolSnapshot {
            available: state.available.iter().map(|w| w.id.clone()).collect(),
            in_use: state.in_use.iter().map(|w| w.id.clone()).collect(),
        }
    }

    /// Create `count` workers up front and leave them idle
    pub fn prewarm(&self, count: usize) {
        let mut state = self.state();
        for _ in 0..count {
            let worker = WorkerHandle::new(state.fresh_id());
            state.stats.total_created += 1;
            state.available.push_back(worker);
        }
        if count > 0 {
            info!(count = count, "Pre-warmed worker pool");
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("WorkerPool")
            .field("available", &snapshot.available)
            .field("in_use", &snapshot.in_use)
            .finish()
    }
}
