//! Example demonstrating worker pool usage
//!
//! This example shows how to:
//! 1. Configure a worker pool
//! 2. Acquire and release workers
//! 3. Handle a refused termination of a busy worker
//! 4. Monitor pool statistics

use poolchain::pool::{IdStrategy, PoolConfig, PoolError, WorkerPool};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let pool = WorkerPool::new(PoolConfig {
        id_strategy: IdStrategy::Random,
        id_prefix: "demo".to_string(),
        ..PoolConfig::default()
    });

    // Two workers are created on demand
    let first = pool.acquire();
    let second = pool.acquire();
    println!("{}", first.describe());
    println!("{}", second.describe());

    // The released worker is handed out again
    pool.release(&first);
    let reused = pool.acquire();
    info!("Reused worker: {}", reused);
    assert_eq!(reused, first);

    // A busy worker cannot be terminated
    match pool.terminate(&second) {
        Ok(()) => info!("Terminated {}", second),
        Err(PoolError::ResourceInUse(id)) => warn!("Worker {} is busy, not terminating", id),
        Err(e) => return Err(e.into()),
    }

    // Once released, it can
    pool.release(&second);
    pool.terminate(&second)?;
    info!("Terminated {}", second);

    // Print statistics
    println!("\n=== FINAL STATISTICS ===\n");
    let stats = pool.stats();
    println!("  Total created: {}", stats.total_created);
    println!("  Total reused: {}", stats.total_reused);
    println!("  Total released: {}", stats.total_released);
    println!("  Total terminated: {}", stats.total_terminated);
    println!("  Available: {}", stats.available);
    println!("  In use: {}", stats.in_use);

    Ok(())
}
