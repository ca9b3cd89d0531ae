//! Shared types for the invocation adapter.

use serde::{Deserialize, Serialize};

/// Normalized outcome of a single invocation, independent of which transport
/// or reply shape produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationResult {
    pub success: bool,
    /// Decoded payload on success. Structure is opaque to the adapter and
    /// determined by the remote method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Human-readable message when the remote side reported a JSON-RPC error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error code carried over from the remote side, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Correlation id echoed back by the remote side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    /// Set when the reply body could not be decoded as a JSON-RPC envelope
    /// and `data` holds the undecoded text verbatim.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub raw: bool,
}

impl InvocationResult {
    pub fn success(data: serde_json::Value, id: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            id,
            raw: false,
        }
    }

    pub fn remote_error(
        message: String,
        code: Option<i64>,
        id: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            code,
            id,
            raw: false,
        }
    }

    /// Lenient fallback: the reply was not a JSON-RPC envelope, so the text
    /// is handed back undecoded rather than failing the call.
    pub fn raw_text(body: String) -> Self {
        Self {
            success: true,
            data: Some(serde_json::Value::String(body)),
            error: None,
            code: None,
            id: None,
            raw: true,
        }
    }
}

/// Adapter-instance-scoped liveness state. Diagnostic only; updated
/// last-writer-wins by concurrent probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
    Error,
}

/// Snapshot returned by [`AgentRuntimeInvoker::status`](crate::invoker::AgentRuntimeInvoker::status).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: ConnectionStatus,
    pub endpoint: String,
    pub qualifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// RFC3339 timestamp of when the snapshot was taken.
    pub timestamp: String,
}
