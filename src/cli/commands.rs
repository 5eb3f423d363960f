use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use super::args::OutputFormat;
use crate::chain::{ChainReport, NodeOutcome, Severity};
use crate::core::Core;
use crate::pool::{PoolStats, WorkerHandle};

/// Outcome of a scripted pool session
#[derive(Debug, Serialize)]
pub struct PoolSession {
    pub acquired: Vec<String>,
    pub released: Vec<String>,
    pub terminated: Vec<String>,
    pub errors: Vec<String>,
    pub stats: PoolStats,
}

/// Serializable form of a chain report
#[derive(Debug, Serialize)]
pub struct LogSummary {
    pub severity: Severity,
    pub visited: Vec<NodeOutcome>,
    pub errors: Vec<String>,
}

impl From<&ChainReport> for LogSummary {
    fn from(report: &ChainReport) -> Self {
        Self {
            severity: report.severity,
            visited: report.visited.clone(),
            errors: report.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Acquire `acquire` workers, release the first `release`, and optionally
/// try to terminate one idle and one busy worker
pub fn run_pool_session(core: &Core, acquire: usize, release: usize, terminate: bool) -> PoolSession {
    let pool = &core.pool;

    let workers: Vec<WorkerHandle> = (0..acquire).map(|_| pool.acquire()).collect();
    for worker in &workers {
        debug!("{}", worker.describe());
    }

    let released: Vec<WorkerHandle> = workers
        .iter()
        .take(release)
        .filter(|w| pool.release(w))
        .cloned()
        .collect();

    let mut terminated = Vec::new();
    let mut errors = Vec::new();

    if terminate {
        let idle = released.first();
        let busy = workers.iter().find(|w| pool.is_in_use(w));
        for worker in idle.into_iter().chain(busy) {
            match pool.terminate(worker) {
                Ok(()) => terminated.push(worker.id().to_string()),
                Err(e) => errors.push(e.to_string()),
            }
        }
    }

    PoolSession {
        acquired: workers.iter().map(|w| w.id().to_string()).collect(),
        released: released.iter().map(|w| w.id().to_string()).collect(),
        terminated,
        errors,
        stats: pool.stats(),
    }
}

/// Execute pool command
pub fn cmd_pool(
    core: &Core,
    acquire: usize,
    release: usize,
    terminate: bool,
    format: &OutputFormat,
) -> Result<()> {
    info!(acquire = acquire, release = release, terminate = terminate, "Running pool session");
    let session = run_pool_session(core, acquire, release, terminate);

    match format {
        OutputFormat::Text => {
            for id in &session.acquired {
                println!("acquired   {}", id);
            }
            for id in &session.released {
                println!("released   {}", id);
            }
            for id in &session.terminated {
                println!("terminated {}", id);
            }
            for err in &session.errors {
                println!("error      {}", err);
            }
            let stats = &session.stats;
            println!(
                "available={} in_use={} created={} reused={} terminated={}",
                stats.available,
                stats.in_use,
                stats.total_created,
                stats.total_reused,
                stats.total_terminated
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
    }

    Ok(())
}

/// Execute log command
pub fn cmd_log(core: &Core, severity: Severity, message: &str, format: &OutputFormat) -> Result<()> {
    let report = core.log(severity, message);
    let summary = LogSummary::from(&report);

    match format {
        OutputFormat::Text => {
            for node in &summary.visited {
                let action = if node.wrote { "wrote" } else { "passed" };
                println!("{:<8} {:<8} {}", node.threshold, node.sink, action);
            }
            for err in &summary.errors {
                println!("error: {}", err);
            }
            for queued in core.email().drain() {
                println!("email to {}: {}", queued.to, queued.body);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if !report.is_ok() {
        anyhow::bail!("{} sink write(s) failed", report.errors.len());
    }
    Ok(())
}

/// Execute chain command
pub fn cmd_chain(core: &Core, format: &OutputFormat) -> Result<()> {
    let nodes: Vec<(Severity, &str)> = core
        .chain()
        .iter()
        .map(|node| (node.threshold(), node.sink_name()))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("profile: {}", core.config.chain.profile);
            let layout: Vec<String> = nodes
                .iter()
                .map(|(threshold, sink)| format!("{}({})", sink, threshold))
                .collect();
            println!("{}", layout.join(" -> "));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
    }

    Ok(())
}
