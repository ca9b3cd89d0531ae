//! Transports for delivering a serialized envelope to an agent runtime.
//!
//! The two concrete transports answer the same capability trait and are
//! selected at construction time; call sites never branch on which one is
//! underneath. Both address the runtime by its percent-escaped identifier
//! and carry the qualifier as a query parameter.
//!
//! - [`ManagedTransport`] speaks the managed invocation API: the envelope is
//!   base64-encoded into the request body and the reply body (which may be a
//!   JSON document or an event-stream payload) is drained to completion
//!   before being handed to normalization.
//! - [`DirectTransport`] POSTs the envelope as-is with a bearer credential.

use async_trait::async_trait;
use base64::Engine;

use crate::error::{InvokeError, InvokeResult};

/// A reply body as produced by a transport, before normalization.
#[derive(Debug, Clone)]
pub enum RawReply {
    /// Body already read as text.
    Text(String),
    /// Fully drained byte stream.
    Bytes(Vec<u8>),
    /// Already-structured value (transports that decode in place).
    Json(serde_json::Value),
}

/// Capability interface both transports implement: deliver one serialized
/// envelope, return one raw reply. No retries, no shared per-call state.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn send(&self, envelope_json: &str) -> InvokeResult<RawReply>;

    /// Endpoint description for status reporting and logs.
    fn endpoint(&self) -> &str;
}

/// Percent-escape the reserved characters of a runtime identifier so it can
/// be used as a URL path segment (`:` and `/`, per the runtime data plane).
pub fn escape_runtime_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Build the invocation URL for a runtime hosted on the managed data plane.
pub fn invocation_url(region: &str, runtime_id: &str, qualifier: &str) -> String {
    format!(
        "https://bedrock-agentcore.{}.amazonaws.com/runtimes/{}/invocations?qualifier={}",
        region,
        escape_runtime_id(runtime_id),
        qualifier
    )
}

async fn fail_from_response(response: reqwest::Response) -> InvokeError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error response".to_string());
    InvokeError::transport(status, format!("HTTP {}: {}", status, body))
}

/// Managed invocation transport: base64 payload, fixed content-type/accept
/// pair, reply drained as bytes.
pub struct ManagedTransport {
    client: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
}

impl ManagedTransport {
    pub fn new(
        client: reqwest::Client,
        region: &str,
        runtime_id: &str,
        qualifier: &str,
        bearer_token: Option<String>,
    ) -> Self {
        Self {
            client,
            url: invocation_url(region, runtime_id, qualifier),
            bearer_token,
        }
    }

    /// Base64 form of the envelope as submitted on the wire.
    pub fn encode_payload(envelope_json: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(envelope_json)
    }
}

#[async_trait]
impl AgentTransport for ManagedTransport {
    async fn send(&self, envelope_json: &str) -> InvokeResult<RawReply> {
        let payload = Self::encode_payload(envelope_json);
        log::debug!("managed invoke: {} ({} payload bytes)", self.url, payload.len());

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .body(payload);

        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| InvokeError::generic_transport(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(fail_from_response(response).await);
        }

        // Drain the body fully before normalization; the reply may arrive as
        // a chunked event stream and must never be partially consumed.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| InvokeError::generic_transport(format!("stream error: {}", e)))?
        {
            body.extend_from_slice(&chunk);
        }

        Ok(RawReply::Bytes(body))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Direct HTTPS transport: envelope POSTed verbatim with a bearer credential.
pub struct DirectTransport {
    client: reqwest::Client,
    url: String,
    bearer_token: String,
}

impl DirectTransport {
    /// `endpoint` is either a pre-resolved invocation URL or an ARN-like
    /// identifier resolved against the given region.
    pub fn new(
        client: reqwest::Client,
        region: &str,
        endpoint: &str,
        qualifier: &str,
        bearer_token: String,
    ) -> Self {
        let url = if endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            invocation_url(region, endpoint, qualifier)
        };
        Self {
            client,
            url,
            bearer_token,
        }
    }
}

#[async_trait]
impl AgentTransport for DirectTransport {
    async fn send(&self, envelope_json: &str) -> InvokeResult<RawReply> {
        log::debug!("direct invoke: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.bearer_token)
            .body(envelope_json.to_string())
            .send()
            .await
            .map_err(|e| InvokeError::generic_transport(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(fail_from_response(response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| InvokeError::generic_transport(format!("failed to read reply: {}", e)))?;

        Ok(RawReply::Text(text))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
