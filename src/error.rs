//! Error types for the queue, graph, shortest-path and loader layers.
//!
//! Every recoverable condition is returned as a value. Nothing in the
//! library panics on bad input.

use thiserror::Error;

/// Failures of the adaptable priority queues.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The handle was wiped by a previous removal, or no longer sits at the
    /// heap position it claims.
    #[error("handle does not refer to a live queue entry")]
    StaleHandle,

    /// The searchable queue already holds an entry with this payload.
    #[error("payload is already queued")]
    DuplicatePayload,

    /// The searchable queue has no entry with this payload.
    #[error("payload is not queued")]
    UnknownPayload,
}

/// Failures of graph mutation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    #[error("a vertex with this label already exists")]
    DuplicateVertex,

    #[error("vertex is not in the graph")]
    UnknownVertex,
}

/// Failures of shortest-path queries and path reconstruction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    #[error("vertex is not in the graph")]
    UnknownVertex,

    /// The target never entered the closed set.
    #[error("target is unreachable from source")]
    Unreachable,

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Failures while reading a graph file or a CSV edge list.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: edge refers to unknown vertex {label}")]
    UnknownVertex { line: usize, label: i64 },

    #[error("line {line}: {source}")]
    Graph { line: usize, source: GraphError },
}
