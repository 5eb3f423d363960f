//! Named chain layouts
//!
//! - `uat`: console (DEBUG) -> file (ERROR) -> email (FATAL)
//! - `debug`: console (DEBUG) -> file (ERROR)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use super::handler::Handler;
use super::severity::Severity;
use super::sink::{ConsoleSink, EmailSink, FileSink, Sink};

/// Chain layout selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainProfile {
    #[default]
    Uat,
    Debug,
}

impl ChainProfile {
    pub fn name(&self) -> &'static str {
        match self {
            ChainProfile::Uat => "uat",
            ChainProfile::Debug => "debug",
        }
    }

    /// Node thresholds in link order
    pub fn thresholds(&self) -> &'static [Severity] {
        match self {
            ChainProfile::Uat => &[Severity::Debug, Severity::Error, Severity::Fatal],
            ChainProfile::Debug => &[Severity::Debug, Severity::Error],
        }
    }
}

impl fmt::Display for ChainProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ChainProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uat" => Ok(ChainProfile::Uat),
            "debug" => Ok(ChainProfile::Debug),
            other => Err(format!("unknown chain profile: {}", other)),
        }
    }
}

/// Sinks used by the named layouts
///
/// Each slot is boxed so callers (and tests) can substitute their own sink
/// for any position while keeping the profile's thresholds.
pub struct ChainSinks {
    pub console: Box<dyn Sink>,
    pub file: Box<dyn Sink>,
    pub email: Box<dyn Sink>,
}

impl ChainSinks {
    /// Standard console, file and email sinks
    pub fn standard(log_file: impl Into<PathBuf>, email_recipient: impl Into<String>) -> Self {
        Self {
            console: Box::new(ConsoleSink),
            file: Box::new(FileSink::new(log_file)),
            email: Box::new(EmailSink::new(email_recipient)),
        }
    }
}

/// Assemble the chain for `profile` and return its head
pub fn build_chain(profile: ChainProfile, sinks: ChainSinks) -> Handler {
    let ChainSinks { console, file, email } = sinks;

    let mut head = Handler::with_sink(Severity::Debug, console);
    let tail = head.set_next(Handler::with_sink(Severity::Error, file));
    if profile == ChainProfile::Uat {
        tail.set_next(Handler::with_sink(Severity::Fatal, email));
    }

    info!(profile = %profile, nodes = head.len(), "Assembled handler chain");
    head
}
