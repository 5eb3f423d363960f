//! Worker identifier generation
//!
//! The pool asks an [`IdGenerator`] for a new identifier every time it has to
//! create a worker. Uniqueness among live workers is checked by the pool, so
//! generators only need to be "unlikely to repeat".

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for a worker
pub type WorkerId = String;

/// Source of fresh worker identifiers
pub trait IdGenerator: Send {
    /// Produce the next candidate identifier
    fn next_id(&mut self) -> WorkerId;
}

/// Monotonically increasing `prefix-N` identifiers
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("worker")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> WorkerId {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Random `prefix-xxxxxxxx` identifiers
#[derive(Debug, Clone)]
pub struct RandomIds {
    prefix: String,
    len: usize,
}

impl RandomIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            len: 8,
        }
    }

    /// Set the length of the random suffix
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len.max(1);
        self
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> WorkerId {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.len)
            .map(char::from)
            .collect();
        format!("{}-{}", self.prefix, suffix.to_lowercase())
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> WorkerId + Send,
{
    fn next_id(&mut self) -> WorkerId {
        self()
    }
}

/// Identifier policy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Random,
}

impl IdStrategy {
    /// Build a boxed generator for this strategy
    pub fn generator(&self, prefix: &str) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Sequential => Box::new(SequentialIds::new(prefix)),
            IdStrategy::Random => Box::new(RandomIds::new(prefix)),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(IdStrategy::Sequential),
            "random" => Ok(IdStrategy::Random),
            other => Err(format!("unknown id strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_increase() {
        let mut ids = SequentialIds::new("w");
        assert_eq!(ids.next_id(), "w-1");
        assert_eq!(ids.next_id(), "w-2");
        assert_eq!(ids.next_id(), "w-3");
    }

    #[test]
    fn test_random_ids_shape() {
        let mut ids = RandomIds::new("w").with_len(12);
        let id = ids.next_id();
        assert!(id.starts_with("w-"));
        assert_eq!(id.len(), "w-".len() + 12);
    }

    #[test]
    fn test_closure_generator() {
        let mut n = 0;
        let mut ids = move || {
            n += 10;
            format!("c{}", n)
        };
        assert_eq!(IdGenerator::next_id(&mut ids), "c10");
        assert_eq!(IdGenerator::next_id(&mut ids), "c20");
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Random".parse::<IdStrategy>(), Ok(IdStrategy::Random));
        assert_eq!("seq".parse::<IdStrategy>(), Ok(IdStrategy::Sequential));
        assert!("uuid".parse::<IdStrategy>().is_err());
    }
}
