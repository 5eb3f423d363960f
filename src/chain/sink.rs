//! Message sinks
//!
//! A sink is the capability a handler node uses to record a message. The
//! chain never looks past the [`Sink`] trait, so console, file and email
//! delivery are interchangeable.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Error types for sink writes
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// Destination for messages handled by a chain node
pub trait Sink: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Record one message
    fn write(&self, message: &str) -> Result<(), SinkError>;
}

/// Writes messages to standard output
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Console::Message -> {}", message)?;
        Ok(())
    }
}

/// Appends timestamped lines to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        writeln!(file, "[{}] {}", now, message)?;

        debug!(path = %self.path.display(), "Appended message to file");
        Ok(())
    }
}

/// A message queued for email delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub body: String,
}

/// Queues messages for email delivery
///
/// Transport is outside this crate; messages accumulate in an outbox that
/// callers drain and hand to their mail system.
#[derive(Debug, Clone)]
pub struct EmailSink {
    recipient: String,
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl EmailSink {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            outbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Messages queued so far
    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all queued messages
    pub fn drain(&self) -> Vec<EmailMessage> {
        std::mem::take(&mut *self.outbox.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Sink for EmailSink {
    fn name(&self) -> &str {
        "email"
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        if self.recipient.trim().is_empty() {
            return Err(SinkError::Rejected("no email recipient configured".to_string()));
        }

        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EmailMessage {
                to: self.recipient.clone(),
                body: message.to_string(),
            });

        info!(to = %self.recipient, "Queued email message");
        Ok(())
    }
}

/// Collects messages in memory
///
/// Clones share the same buffer, so a clone kept outside the chain can
/// inspect what the node wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    name: String,
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        Ok(())
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F> {
    name: String,
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn(&str) -> Result<(), SinkError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(&str) -> Result<(), SinkError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        (self.f)(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new("mem");
        let observer = sink.clone();

        sink.write("first").unwrap();
        sink.write("second").unwrap();

        assert_eq!(observer.messages(), vec!["first", "second"]);
        assert_eq!(observer.name(), "mem");
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");
        let sink = FileSink::new(&path);

        sink.write("one").unwrap();
        sink.write("two").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] one"));
        assert!(lines[1].ends_with("] two"));
    }

    #[test]
    fn test_file_sink_reports_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.log");
        let sink = FileSink::new(path);

        assert!(matches!(sink.write("lost"), Err(SinkError::Io(_))));
    }

    #[test]
    fn test_email_sink_outbox() {
        let sink = EmailSink::new("ops@example.com");
        sink.write("disk on fire").unwrap();

        let queued = sink.drain();
        assert_eq!(
            queued,
            vec![EmailMessage {
                to: "ops@example.com".to_string(),
                body: "disk on fire".to_string(),
            }]
        );
        assert!(sink.outbox().is_empty());
    }

    #[test]
    fn test_email_sink_without_recipient_rejects() {
        let sink = EmailSink::new("  ");
        assert!(matches!(sink.write("x"), Err(SinkError::Rejected(_))));
    }

    #[test]
    fn test_fn_sink() {
        let sink = FnSink::new("closure", |msg: &str| {
            if msg.is_empty() {
                Err(SinkError::Rejected("empty".to_string()))
            } else {
                Ok(())
            }
        });
        assert!(sink.write("ok").is_ok());
        assert!(sink.write("").is_err());
        assert_eq!(sink.name(), "closure");
    }
}
