use clap::{Parser, Subcommand};

use crate::chain::{ChainProfile, Severity};

/// poolchain - reusable worker pool and severity-filtered handler chain
#[derive(Parser, Debug)]
#[command(name = "poolchain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (falls back to POOLCHAIN_* environment variables)
    #[arg(long, global = true, env = "POOLCHAIN_CONFIG")]
    pub config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an acquire/release/terminate session against the worker pool
    Pool {
        /// Number of workers to acquire
        #[arg(long, default_value = "2")]
        acquire: usize,

        /// Number of acquired workers to release again
        #[arg(long, default_value = "1")]
        release: usize,

        /// Try to terminate one idle and one busy worker
        #[arg(long)]
        terminate: bool,
    },

    /// Send a message through the handler chain
    Log {
        /// Message severity (trace, info, debug, warning, error, fatal)
        #[arg(value_name = "SEVERITY")]
        severity: Severity,

        /// Message text
        #[arg(value_name = "MESSAGE")]
        message: String,

        /// Chain layout override (uat, debug)
        #[arg(long)]
        profile: Option<ChainProfile>,
    },

    /// Show the configured chain layout
    Chain {
        /// Chain layout override (uat, debug)
        #[arg(long)]
        profile: Option<ChainProfile>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Commands::Pool { acquire, release, .. } = &self.command {
            if release > acquire {
                anyhow::bail!(
                    "Cannot release {} workers when only {} were acquired",
                    release,
                    acquire
                );
            }
        }
        Ok(())
    }
}
