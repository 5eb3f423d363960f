//! Handler nodes and chain traversal
//!
//! Each [`Handler`] owns its successor, so a chain is a singly linked list
//! that cannot contain a cycle. A message is offered to every node in link
//! order; a node writes it only when the message severity equals the node's
//! threshold.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::severity::Severity;
use super::sink::{Sink, SinkError};

/// Chain traversal error types
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Sink '{sink}' at {threshold} failed to write: {source}")]
    SinkWriteFailed {
        threshold: Severity,
        sink: String,
        #[source]
        source: SinkError,
    },
}

/// What a single node did with a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeOutcome {
    pub threshold: Severity,
    pub sink: String,
    pub wrote: bool,
}

/// Result of sending one message through a chain
#[derive(Debug)]
pub struct ChainReport {
    /// Severity of the message
    pub severity: Severity,

    /// Every visited node, in link order
    pub visited: Vec<NodeOutcome>,

    /// Failed writes; these never stop traversal
    pub errors: Vec<ChainError>,
}

impl ChainReport {
    fn new(severity: Severity) -> Self {
        Self {
            severity,
            visited: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when every attempted write succeeded
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the sinks that wrote the message
    pub fn written_by(&self) -> Vec<&str> {
        self.visited
            .iter()
            .filter(|node| node.wrote)
            .map(|node| node.sink.as_str())
            .collect()
    }
}

/// One link in a severity-filtered chain
pub struct Handler {
    threshold: Severity,
    sink: Box<dyn Sink>,
    next: Option<Box<Handler>>,
}

impl Handler {
    /// Create a detached node
    pub fn new(threshold: Severity, sink: impl Sink + 'static) -> Self {
        Self::with_sink(threshold, Box::new(sink))
    }

    /// Create a detached node from an already boxed sink
    pub fn with_sink(threshold: Severity, sink: Box<dyn Sink>) -> Self {
        Self {
            threshold,
            sink,
            next: None,
        }
    }

    /// Attach `next` as this node's successor and return the successor
    ///
    /// The returned reference is the new tail, so successive calls extend the
    /// chain; keep the head yourself. Calling this twice on the same node
    /// replaces (and drops) the previous successor.
    pub fn set_next(&mut self, next: Handler) -> &mut Handler {
        if self.next.is_some() {
            warn!(threshold = %self.threshold, "Replacing existing successor");
        }
        &mut **self.next.insert(Box::new(next))
    }

    /// Build a chain from nodes in order and return its head
    pub fn chain(nodes: impl IntoIterator<Item = Handler>) -> Option<Handler> {
        let mut nodes: Vec<Handler> = nodes.into_iter().collect();
        let mut head = nodes.pop()?;
        while let Some(mut prev) = nodes.pop() {
            prev.next = Some(Box::new(head));
            head = prev;
        }
        Some(head)
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    pub fn next(&self) -> Option<&Handler> {
        self.next.as_deref()
    }

    /// Iterate over this node and all successors
    pub fn iter(&self) -> impl Iterator<Item = &Handler> {
        std::iter::successors(Some(self), |node| node.next())
    }

    /// Number of nodes from here to the end of the chain
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Thresholds from here to the end of the chain, in link order
    pub fn thresholds(&self) -> Vec<Severity> {
        self.iter().map(|node| node.threshold).collect()
    }

    /// Offer `message` to this node and every successor
    pub fn log(&self, severity: Severity, message: &str) -> ChainReport {
        let mut report = ChainReport::new(severity);

        for node in self.iter() {
            let wrote = node.handle(severity, message, &mut report);
            report.visited.push(NodeOutcome {
                threshold: node.threshold,
                sink: node.sink.name().to_string(),
                wrote,
            });
        }

        debug!(
            severity = %severity,
            visited = report.visited.len(),
            errors = report.errors.len(),
            "Chain traversal complete"
        );
        report
    }

    /// Write if the severity matches; returns whether a write succeeded
    fn handle(&self, severity: Severity, message: &str, report: &mut ChainReport) -> bool {
        if severity != self.threshold {
            trace!(threshold = %self.threshold, severity = %severity, "Forwarding message");
            return false;
        }

        match self.sink.write(message) {
            Ok(()) => true,
            Err(source) => {
                warn!(
                    threshold = %self.threshold,
                    sink = self.sink.name(),
                    error = %source,
                    "Sink write failed"
                );
                report.errors.push(ChainError::SinkWriteFailed {
                    threshold: self.threshold,
                    sink: self.sink.name().to_string(),
                    source,
                });
                false
            }
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|node| (node.threshold, node.sink.name())))
            .finish()
    }
}

// Unlink iteratively so long chains don't recurse on drop.
impl Drop for Handler {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}
