//! Worker pooling module
//!
//! This module provides:
//! - A pool of reusable worker handles with lazy creation
//! - FIFO recycling of released workers
//! - Termination of idle workers, refused while a worker is checked out
//! - Pluggable worker identifier generation

pub mod ids;
pub mod worker;

pub use ids::{IdGenerator, IdStrategy, RandomIds, SequentialIds, WorkerId};
pub use worker::{PoolConfig, PoolError, PoolSnapshot, PoolStats, WorkerHandle, WorkerPool};
