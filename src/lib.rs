//! poolchain - reusable worker pool and severity-filtered handler chain

pub mod chain;
pub mod cli;
pub mod config;
pub mod core;
pub mod pool;

pub use crate::core::Core;
pub use config::Config;
