//! Error taxonomy for the invocation adapter.
//!
//! Transport-level classification exists for message clarity only; callers
//! are not expected to branch on it. Remote JSON-RPC `error` objects are not
//! represented here — they are data, carried verbatim in
//! [`InvocationResult`](crate::types::InvocationResult).

use thiserror::Error;

/// Sub-classification of a transport failure. Affects the rendered message,
/// never control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// 401/403 from the runtime data plane.
    PermissionDenied,
    /// 404 — the runtime identifier resolved to nothing.
    EndpointNotFound,
    /// Everything else: connection failures, 5xx, malformed endpoint.
    Generic,
}

impl TransportErrorKind {
    /// Classify an HTTP status into a kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => TransportErrorKind::PermissionDenied,
            404 => TransportErrorKind::EndpointNotFound,
            _ => TransportErrorKind::Generic,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TransportErrorKind::PermissionDenied => "permission denied",
            TransportErrorKind::EndpointNotFound => "endpoint not found",
            TransportErrorKind::Generic => "transport failure",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// Endpoint identifier missing or malformed. Surfaces on first use, not
    /// at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-2xx status or connection-level failure. The remote's message is
    /// preserved verbatim.
    #[error("{}: {message}", .kind.label())]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The configured deadline elapsed before the transport resolved. This
    /// is a client-side giveup; no cancellation is sent to the remote side.
    #[error("invocation timed out after {ms} ms")]
    Timeout { ms: u64 },

    /// Reply body could not be decoded as a JSON-RPC envelope while strict
    /// decoding is enabled. With the default lenient mode the body degrades
    /// to a raw-text success instead.
    #[error("undecodable reply: {0}")]
    Decode(String),
}

impl InvokeError {
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        InvokeError::Transport {
            kind: TransportErrorKind::from_status(status),
            message: message.into(),
        }
    }

    pub fn generic_transport(message: impl Into<String>) -> Self {
        InvokeError::Transport {
            kind: TransportErrorKind::Generic,
            message: message.into(),
        }
    }
}

pub type InvokeResult<T> = Result<T, InvokeError>;
