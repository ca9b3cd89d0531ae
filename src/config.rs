//! Adapter configuration.
//!
//! Everything is optional with defaults; a missing or malformed endpoint is
//! deliberately not validated here and surfaces as a transport failure on
//! the first `invoke` instead.

use serde::{Deserialize, Serialize};

/// Which concrete transport the invoker is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Managed invocation API (base64 payload).
    Managed,
    /// Direct HTTPS POST with a bearer credential.
    Direct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Runtime identifier: an ARN-like string, or for the direct transport a
    /// pre-resolved invocation URL.
    pub endpoint: String,
    /// Region of the managed data plane.
    pub region: String,
    /// Version/alias selector for which deployed revision receives the call.
    pub qualifier: String,
    /// Bearer credential, if the caller has one.
    pub bearer_token: Option<String>,
    /// Per-call deadline in milliseconds.
    pub timeout_ms: u64,
    pub transport: TransportKind,
    /// Fail with a decode error on non-envelope replies instead of the
    /// lenient raw-text fallback.
    pub strict_decode: bool,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: "us-east-1".to_string(),
            qualifier: "DEFAULT".to_string(),
            bearer_token: None,
            timeout_ms: 120_000,
            transport: TransportKind::Managed,
            strict_decode: false,
        }
    }
}

impl InvokerConfig {
    /// Read configuration from the environment. Every variable is optional;
    /// an absent endpoint only fails once the first invocation goes out.
    ///
    /// Variables: `AGENT_ARN`, `AGENT_RUNTIME_REGION` (fallback
    /// `AWS_REGION`), `AGENT_QUALIFIER`, `BEARER_TOKEN`, `AGENT_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable variable
    /// lookup, so the resolution rules can be tested without touching the
    /// process environment.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(arn) = lookup("AGENT_ARN") {
            config.endpoint = arn;
        }
        if let Some(region) = lookup("AGENT_RUNTIME_REGION").or_else(|| lookup("AWS_REGION")) {
            config.region = region;
        }
        if let Some(qualifier) = lookup("AGENT_QUALIFIER") {
            config.qualifier = qualifier;
        }
        if let Some(token) = lookup("BEARER_TOKEN") {
            config.bearer_token = Some(token);
        }
        if let Some(ms) = lookup("AGENT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            config.timeout_ms = ms;
        }
        // A bearer token with no explicit choice means the direct transport.
        if config.bearer_token.is_some() {
            config.transport = TransportKind::Direct;
        }

        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_strict_decode(mut self, strict: bool) -> Self {
        self.strict_decode = strict;
        self
    }
}
