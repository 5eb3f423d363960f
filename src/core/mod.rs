use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::chain::{build_chain, ChainReport, ChainSinks, ConsoleSink, EmailSink, FileSink, Handler, Severity};
use crate::config::Config;
use crate::pool::WorkerPool;

/// Application state shared by the CLI commands
///
/// The pool and the chain are independent; `Core` only builds both from
/// one configuration.
pub struct Core {
    pub config: Arc<Config>,
    pub pool: WorkerPool,
    chain: Handler,
    /// Handle on the FATAL node's outbox (shares the chain's queue)
    email: EmailSink,
}

impl Core {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let pool = WorkerPool::new(config.pool.pool_config());
        pool.prewarm(config.pool.prewarm);

        if let Some(parent) = config.chain.log_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context(format!(
                    "Failed to create log directory: {:?}",
                    parent
                ))?;
            }
        }

        let email = EmailSink::new(config.chain.email_recipient.clone());
        let sinks = ChainSinks {
            console: Box::new(ConsoleSink),
            file: Box::new(FileSink::new(config.chain.log_file.clone())),
            email: Box::new(email.clone()),
        };
        let chain = build_chain(config.chain.profile, sinks);

        info!(
            profile = %config.chain.profile,
            id_strategy = ?config.pool.id_strategy,
            prewarm = config.pool.prewarm,
            "Core initialized"
        );

        Ok(Self {
            config,
            pool,
            chain,
            email,
        })
    }

    /// Head of the configured handler chain
    pub fn chain(&self) -> &Handler {
        &self.chain
    }

    /// Send one message through the configured chain
    pub fn log(&self, severity: Severity, message: &str) -> ChainReport {
        self.chain.log(severity, message)
    }

    /// Email node outbox
    pub fn email(&self) -> &EmailSink {
        &self.email
    }
}
