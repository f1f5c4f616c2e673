//! Error types for the upstream employee client.
//!
//! # Design
//! Three upstream failure kinds share one `UpstreamError`. Absence of a
//! record is not an error and never appears here: lookups return `Option`.

use thiserror::Error;

/// Failure raised by the upstream client. Every variant names the logical
/// operation that failed, e.g. "fetching all employees".
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered 429. Not retried here.
    #[error("rate limit exceeded while {operation}")]
    RateLimited { operation: &'static str },

    /// Any other non-success status, a response body that failed to decode,
    /// or a request that could not be encoded. `status` is `None` only in the
    /// last case, where nothing was sent.
    #[error("failed {operation}: {message}")]
    RequestFailed {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// No response at all: refused connection, DNS failure, timeout.
    #[error("unable to connect to upstream while {operation}: {message}")]
    Unreachable {
        operation: &'static str,
        message: String,
    },
}

/// Discriminant of `UpstreamError`, for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    RateLimited,
    UpstreamRequestFailed,
    UpstreamUnreachable,
}

impl UpstreamError {
    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            UpstreamError::RateLimited { .. } => UpstreamErrorKind::RateLimited,
            UpstreamError::RequestFailed { .. } => UpstreamErrorKind::UpstreamRequestFailed,
            UpstreamError::Unreachable { .. } => UpstreamErrorKind::UpstreamUnreachable,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            UpstreamError::RateLimited { operation }
            | UpstreamError::RequestFailed { operation, .. }
            | UpstreamError::Unreachable { operation, .. } => operation,
        }
    }
}

/// Failure reported by a `Transport`.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No response arrived: refused connection, DNS failure, timeout.
    #[error("{0}")]
    Connect(String),

    /// A status line arrived but its body could not be read.
    #[error("unreadable response body (HTTP {status}): {message}")]
    UnreadableBody { status: u16, message: String },
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }
}
