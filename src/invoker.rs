//! The invocation adapter proper.
//!
//! One `invoke` is exactly one round trip: fresh correlation id, envelope,
//! transport delivery raced against the configured deadline, reply
//! normalization. No retries, no queue, no shared per-call state; any number
//! of invocations may be in flight concurrently. The only instance-scoped
//! mutable state is the diagnostic connection status, fed by `probe`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::{InvokerConfig, TransportKind};
use crate::envelope::{build_envelope, new_request_id, normalize_reply};
use crate::error::{InvokeError, InvokeResult};
use crate::transport::{AgentTransport, DirectTransport, ManagedTransport};
use crate::types::{ConnectionStatus, InvocationResult, StatusReport};

struct Diagnostics {
    status: ConnectionStatus,
    last_error: Option<String>,
}

/// Adapter over one remote agent runtime, bound to one transport at
/// construction time.
pub struct AgentRuntimeInvoker {
    config: InvokerConfig,
    transport: Arc<dyn AgentTransport>,
    // Last-writer-wins diagnostics; never load-bearing.
    diagnostics: Mutex<Diagnostics>,
}

impl AgentRuntimeInvoker {
    /// Build an invoker with the transport selected by the config. The
    /// endpoint is not validated here; a bad identifier surfaces on the
    /// first invocation.
    pub fn new(config: InvokerConfig) -> Self {
        let client = reqwest::Client::new();
        let transport: Arc<dyn AgentTransport> = match config.transport {
            TransportKind::Managed => Arc::new(ManagedTransport::new(
                client,
                &config.region,
                &config.endpoint,
                &config.qualifier,
                config.bearer_token.clone(),
            )),
            TransportKind::Direct => Arc::new(DirectTransport::new(
                client,
                &config.region,
                &config.endpoint,
                &config.qualifier,
                config.bearer_token.clone().unwrap_or_default(),
            )),
        };
        Self::with_transport(config, transport)
    }

    /// Build an invoker over an explicit transport (tests substitute mocks
    /// here).
    pub fn with_transport(config: InvokerConfig, transport: Arc<dyn AgentTransport>) -> Self {
        Self {
            config,
            transport,
            diagnostics: Mutex::new(Diagnostics {
                status: ConnectionStatus::Disconnected,
                last_error: None,
            }),
        }
    }

    /// Invoke a remote method once and normalize the reply.
    ///
    /// Remote JSON-RPC errors come back as `Ok` with `success == false`;
    /// `Err` is reserved for configuration, transport, timeout and (under
    /// strict decoding) decode failures. A timeout is a client-side giveup:
    /// the remote call is abandoned, not cancelled.
    pub async fn invoke(
        &self,
        method: &str,
        params: Map<String, Value>,
    ) -> InvokeResult<InvocationResult> {
        if self.config.endpoint.is_empty() {
            let err = InvokeError::Configuration(
                "no endpoint identifier configured (set AGENT_ARN or use with_endpoint)"
                    .to_string(),
            );
            self.record_error(&err);
            return Err(err);
        }

        let id = new_request_id(method);
        let envelope = build_envelope(&id, method, &params);
        let body = serde_json::to_string(&envelope)
            .map_err(|e| InvokeError::generic_transport(format!("envelope serialization: {}", e)))?;

        log::debug!("invoke {} (id {})", method, id);

        let deadline = Duration::from_millis(self.config.timeout_ms);
        let reply = match tokio::time::timeout(deadline, self.transport.send(&body)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                self.record_error(&err);
                return Err(err);
            }
            Err(_) => {
                let err = InvokeError::Timeout {
                    ms: self.config.timeout_ms,
                };
                log::warn!("invoke {} (id {}) abandoned: {}", method, id, err);
                self.record_error(&err);
                return Err(err);
            }
        };

        normalize_reply(reply, self.config.strict_decode)
    }

    /// Liveness probe: a zero-argument `ping` through the invoke path. Flips
    /// the connection status and never errors out.
    pub async fn probe(&self) -> bool {
        match self.invoke("ping", Map::new()).await {
            Ok(result) if result.success => {
                self.set_status(ConnectionStatus::Connected, None);
                true
            }
            Ok(result) => {
                let message = result
                    .error
                    .unwrap_or_else(|| "ping answered with an error".to_string());
                self.set_status(ConnectionStatus::Error, Some(message));
                false
            }
            Err(err) => {
                self.set_status(ConnectionStatus::Error, Some(err.to_string()));
                false
            }
        }
    }

    /// Reset the connection status to disconnected (clearing the last
    /// failure), then re-probe.
    pub async fn refresh(&self) -> bool {
        self.set_status(ConnectionStatus::Disconnected, None);
        self.probe().await
    }

    /// Diagnostic snapshot of the adapter instance.
    pub fn status(&self) -> StatusReport {
        let diagnostics = self.diagnostics.lock().unwrap();
        StatusReport {
            status: diagnostics.status,
            endpoint: self.transport.endpoint().to_string(),
            qualifier: self.config.qualifier.clone(),
            last_error: diagnostics.last_error.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    fn set_status(&self, status: ConnectionStatus, last_error: Option<String>) {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.status = status;
        diagnostics.last_error = last_error;
    }

    fn record_error(&self, err: &InvokeError) {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.last_error = Some(err.to_string());
    }
}
