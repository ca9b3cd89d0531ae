//! JSON-RPC 2.0 envelope construction and reply normalization.
//!
//! One builder for the outgoing request and one total function mapping the
//! heterogeneous reply shapes (text, drained byte stream, structured value)
//! into an [`InvocationResult`]. Normalization never fails in lenient mode:
//! a body that is not a JSON-RPC envelope degrades to a raw-text success.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::{InvokeError, InvokeResult};
use crate::transport::RawReply;
use crate::types::InvocationResult;

/// Generate a fresh correlation id for an outgoing call. Unique per call;
/// collision resistance is for log correlation, not correctness.
pub fn new_request_id(method: &str) -> String {
    format!("{}_{}", method, Uuid::new_v4())
}

/// Build the outgoing JSON-RPC 2.0 envelope.
///
/// The caller's params are preserved exactly; the adapter injects a
/// `_meta.progressToken` (epoch milliseconds) used by the remote side for
/// progress correlation and never inspected here.
pub fn build_envelope(id: &str, method: &str, params: &Map<String, Value>) -> Value {
    let mut params = params.clone();
    params.insert(
        "_meta".to_string(),
        json!({ "progressToken": chrono::Utc::now().timestamp_millis() }),
    );

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Expected reply envelope when the remote method answers in JSON-RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcReply {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Normalize a raw transport reply into an [`InvocationResult`].
///
/// Total over the three reply shapes. With `strict` disabled (the default),
/// a body that fails to parse as structured data is returned as a raw-text
/// success rather than an error; with `strict` enabled it becomes
/// [`InvokeError::Decode`].
pub fn normalize_reply(reply: RawReply, strict: bool) -> InvokeResult<InvocationResult> {
    let text = match reply {
        RawReply::Text(text) => text,
        // Byte streams arrive fully drained by the transport; decode lossily
        // rather than refusing on a stray invalid sequence.
        RawReply::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        RawReply::Json(value) => return Ok(normalize_value(value)),
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(normalize_value(value)),
        Err(e) if strict => Err(InvokeError::Decode(format!(
            "{} (body: {})",
            e,
            snippet(&text, 200)
        ))),
        Err(_) => {
            log::debug!("reply body is not JSON; returning raw text");
            Ok(InvocationResult::raw_text(text))
        }
    }
}

/// Truncate a body for an error message without splitting a multibyte
/// character.
fn snippet(text: &str, max_bytes: usize) -> &str {
    let mut end = text.len().min(max_bytes);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn normalize_value(value: Value) -> InvocationResult {
    match serde_json::from_value::<JsonRpcReply>(value.clone()) {
        Ok(reply) => {
            if let Some(err) = reply.error {
                InvocationResult::remote_error(err.message, err.code, reply.id)
            } else if let Some(result) = reply.result {
                InvocationResult::success(result, reply.id)
            } else {
                // No result field: hand back the whole body.
                InvocationResult::success(value, reply.id)
            }
        }
        // Structured but not envelope-shaped (e.g. a bare array): whole body.
        Err(_) => InvocationResult::success(value, None),
    }
}
