//! Severity-filtered handler chain
//!
//! This module provides:
//! - An ordered severity scale
//! - Handler nodes that own their successor and write on an exact
//!   severity match
//! - Console, file, email and in-memory sinks
//! - Named chain layouts (`uat`, `debug`)
//!
//! # Example Usage
//!
//! ```rust
//! use poolchain::chain::{Handler, MemorySink, Severity};
//!
//! let console = MemorySink::new("console");
//! let file = MemorySink::new("file");
//!
//! let mut head = Handler::new(Severity::Debug, console.clone());
//! head.set_next(Handler::new(Severity::Error, file.clone()));
//!
//! let report = head.log(Severity::Error, "disk almost full");
//! assert_eq!(report.written_by(), vec!["file"]);
//! assert!(console.messages().is_empty());
//! ```

pub mod factory;
pub mod handler;
pub mod severity;
pub mod sink;

pub use factory::{build_chain, ChainProfile, ChainSinks};
pub use handler::{ChainError, ChainReport, Handler, NodeOutcome};
pub use severity::Severity;
pub use sink::{ConsoleSink, EmailMessage, EmailSink, FileSink, FnSink, MemorySink, Sink, SinkError};
