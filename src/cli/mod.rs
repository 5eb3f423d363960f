//! CLI module for poolchain
//!
//! # Usage
//!
//! ```bash
//! # Acquire three workers, release one, try to terminate idle and busy ones
//! poolchain pool --acquire 3 --release 1 --terminate
//!
//! # Send a message through the configured chain
//! poolchain log error "disk almost full"
//!
//! # Show the chain layout for a profile
//! poolchain chain --profile debug --format json
//! ```

pub mod args;
pub mod commands;

use anyhow::{Context, Result};
use tracing::{debug, info};

use args::{Cli, Commands};
use commands::*;

use crate::config;
use crate::core::Core;

/// Run the CLI application
pub fn run() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(&cli.log_level);

    // Validate arguments
    cli.validate().context("Invalid arguments")?;

    debug!("CLI arguments: {:?}", cli);

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Commands::Log { profile: Some(profile), .. } | Commands::Chain { profile: Some(profile) } =
        &cli.command
    {
        config.chain.profile = *profile;
    }

    let core = Core::new(config)?;

    match cli.command {
        Commands::Pool {
            acquire,
            release,
            terminate,
        } => {
            cmd_pool(&core, acquire, release, terminate, &cli.format)?;
        }
        Commands::Log {
            severity, message, ..
        } => {
            cmd_log(&core, severity, &message, &cli.format)?;
        }
        Commands::Chain { .. } => {
            cmd_chain(&core, &cli.format)?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

/// Initialize logging; `RUST_LOG` takes precedence over `--log-level`
fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
