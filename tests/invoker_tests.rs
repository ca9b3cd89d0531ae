//! Tests for the agent runtime invocation adapter
//!
//! This module tests:
//! - Envelope shape: caller params preserved, _meta.progressToken injected
//! - Normalization totality across reply shapes
//! - Timeout race with a never-resolving transport
//! - Connection status transitions via probe/refresh
//! - Correlation id uniqueness
//! - Endpoint escaping as surfaced through the status report
//!
//! Run with: cargo test --test invoker_tests -- --nocapture

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use agent_runtime_invoker::{
    AgentRuntimeInvoker, AgentTransport, InvokeError, InvokeResult, InvokerConfig, RawReply,
    ConnectionStatus, TransportKind,
};

// =============================================================================
// Test fixtures
// =============================================================================

fn test_config() -> InvokerConfig {
    InvokerConfig::default()
        .with_endpoint("arn:aws:bedrock-agentcore:us-east-1:123456789012:runtime/test_agent")
        .with_timeout_ms(1_000)
}

fn params(v: Value) -> Map<String, Value> {
    v.as_object().expect("object literal").clone()
}

fn rpc_ok(id: &str, result: Value) -> RawReply {
    RawReply::Text(json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string())
}

/// Replies with a canned raw reply and records every envelope it was asked
/// to deliver.
struct CapturingTransport {
    reply: RawReply,
    bodies: Mutex<Vec<String>>,
}

impl CapturingTransport {
    fn new(reply: RawReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            bodies: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .map(|b| serde_json::from_str(b).expect("captured body is JSON"))
            .collect()
    }
}

#[async_trait]
impl AgentTransport for CapturingTransport {
    async fn send(&self, envelope_json: &str) -> InvokeResult<RawReply> {
        self.bodies.lock().unwrap().push(envelope_json.to_string());
        Ok(self.reply.clone())
    }

    fn endpoint(&self) -> &str {
        "mock://capturing"
    }
}

/// Never resolves; exercises the timeout race.
struct NeverTransport;

#[async_trait]
impl AgentTransport for NeverTransport {
    async fn send(&self, _envelope_json: &str) -> InvokeResult<RawReply> {
        futures::future::pending::<InvokeResult<RawReply>>().await
    }

    fn endpoint(&self) -> &str {
        "mock://never"
    }
}

/// Pops one scripted outcome per call; exhausting the script is a test bug.
struct ScriptedTransport {
    script: Mutex<VecDeque<InvokeResult<RawReply>>>,
}

impl ScriptedTransport {
    fn new(outcomes: Vec<InvokeResult<RawReply>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into()),
        })
    }
}

#[async_trait]
impl AgentTransport for ScriptedTransport {
    async fn send(&self, _envelope_json: &str) -> InvokeResult<RawReply> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted transport ran out of outcomes")
    }

    fn endpoint(&self) -> &str {
        "mock://scripted"
    }
}

// =============================================================================
// Envelope shape through the invoke path
// =============================================================================

mod envelope_shape {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn caller_params_preserved_and_meta_injected() {
        let transport = CapturingTransport::new(rpc_ok("x", json!({})));
        let invoker = AgentRuntimeInvoker::with_transport(test_config(), transport.clone());

        invoker
            .invoke(
                "tools/call",
                params(json!({ "name": "scan", "arguments": { "depth": 3 } })),
            )
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        let envelope = &sent[0];
        assert_eq!(envelope["jsonrpc"], "2.0");
        assert_eq!(envelope["method"], "tools/call");
        assert!(envelope["id"].as_str().unwrap().starts_with("tools/call_"));

        let sent_params = envelope["params"].as_object().unwrap();
        assert_eq!(sent_params.len(), 3);
        assert_eq!(sent_params["name"], "scan");
        assert_eq!(sent_params["arguments"]["depth"], 3);
        assert!(sent_params["_meta"]["progressToken"].is_i64());
    }

    #[tokio::test]
    async fn thousand_invocations_use_distinct_ids() {
        let transport = CapturingTransport::new(rpc_ok("x", json!({})));
        let invoker = AgentRuntimeInvoker::with_transport(test_config(), transport.clone());

        for _ in 0..1000 {
            invoker.invoke("tools/list", Map::new()).await.unwrap();
        }

        let ids: HashSet<String> = transport
            .sent()
            .iter()
            .map(|e| e["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}

// =============================================================================
// Normalization totality
// =============================================================================

mod normalization {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn jsonrpc_error_reply_is_ok_with_success_false() {
        let reply = RawReply::Text(
            json!({
                "jsonrpc": "2.0",
                "id": "r1",
                "error": { "message": "findings store unavailable", "code": -32000 }
            })
            .to_string(),
        );
        let invoker =
            AgentRuntimeInvoker::with_transport(test_config(), CapturingTransport::new(reply));

        let result = invoker.invoke("wiz/issues", Map::new()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("findings store unavailable"));
        assert_eq!(result.code, Some(-32000));
    }

    #[tokio::test]
    async fn free_text_reply_degrades_to_raw_success() {
        let reply = RawReply::Text("cold start, try again shortly".to_string());
        let invoker =
            AgentRuntimeInvoker::with_transport(test_config(), CapturingTransport::new(reply));

        let result = invoker.invoke("tools/list", Map::new()).await.unwrap();
        assert!(result.success);
        assert!(result.raw);
        assert_eq!(result.data, Some(json!("cold start, try again shortly")));
    }

    #[tokio::test]
    async fn free_text_reply_errors_under_strict_decode() {
        let reply = RawReply::Text("not an envelope".to_string());
        let invoker = AgentRuntimeInvoker::with_transport(
            test_config().with_strict_decode(true),
            CapturingTransport::new(reply),
        );

        let err = invoker.invoke("tools/list", Map::new()).await.unwrap_err();
        assert!(matches!(err, InvokeError::Decode(_)));
    }

    #[tokio::test]
    async fn byte_stream_reply_is_drained_and_decoded() {
        let body = json!({ "jsonrpc": "2.0", "id": "r2", "result": { "tools": [] } });
        let reply = RawReply::Bytes(body.to_string().into_bytes());
        let invoker =
            AgentRuntimeInvoker::with_transport(test_config(), CapturingTransport::new(reply));

        let result = invoker.invoke("tools/list", Map::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap()["tools"], json!([]));
    }
}

// =============================================================================
// Timeout race
// =============================================================================

mod timeout {
    use super::*;

    #[tokio::test]
    async fn never_resolving_transport_times_out() {
        let timeout_ms = 50;
        let invoker = AgentRuntimeInvoker::with_transport(
            test_config().with_timeout_ms(timeout_ms),
            Arc::new(NeverTransport),
        );

        let started = Instant::now();
        let err = invoker.invoke("tools/list", Map::new()).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, InvokeError::Timeout { ms } if ms == timeout_ms));
        assert!(elapsed >= Duration::from_millis(timeout_ms));
        // Generous upper bound: the point is it does not hang.
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn timeout_is_recorded_as_last_error() {
        let invoker = AgentRuntimeInvoker::with_transport(
            test_config().with_timeout_ms(10),
            Arc::new(NeverTransport),
        );

        let _ = invoker.invoke("tools/list", Map::new()).await;
        let report = invoker.status();
        assert!(report.last_error.unwrap().contains("timed out"));
    }
}

// =============================================================================
// Connection status transitions
// =============================================================================

mod status_transitions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn starts_disconnected() {
        let invoker = AgentRuntimeInvoker::with_transport(
            test_config(),
            CapturingTransport::new(rpc_ok("p", json!({ "pong": true }))),
        );
        assert_eq!(invoker.status().status, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn probe_then_failure_then_refresh() {
        let transport = ScriptedTransport::new(vec![
            // First probe succeeds.
            Ok(rpc_ok("p1", json!({ "pong": true }))),
            // Second probe: the remote answers with a JSON-RPC error.
            Ok(RawReply::Text(
                json!({
                    "jsonrpc": "2.0",
                    "id": "p2",
                    "error": { "message": "runtime draining", "code": -32001 }
                })
                .to_string(),
            )),
            // Probe issued by refresh succeeds again.
            Ok(rpc_ok("p3", json!({ "pong": true }))),
        ]);
        let invoker = AgentRuntimeInvoker::with_transport(test_config(), transport);

        assert!(invoker.probe().await);
        assert_eq!(invoker.status().status, ConnectionStatus::Connected);

        assert!(!invoker.probe().await);
        let report = invoker.status();
        assert_eq!(report.status, ConnectionStatus::Error);
        assert_eq!(report.last_error.as_deref(), Some("runtime draining"));

        assert!(invoker.refresh().await);
        let report = invoker.status();
        assert_eq!(report.status, ConnectionStatus::Connected);
        assert!(report.last_error.is_none());
    }

    #[tokio::test]
    async fn transport_failure_marks_error_status() {
        let transport = ScriptedTransport::new(vec![Err(InvokeError::transport(
            403,
            "AccessDeniedException",
        ))]);
        let invoker = AgentRuntimeInvoker::with_transport(test_config(), transport);

        assert!(!invoker.probe().await);
        let report = invoker.status();
        assert_eq!(report.status, ConnectionStatus::Error);
        assert!(report
            .last_error
            .unwrap()
            .contains("permission denied: AccessDeniedException"));
    }
}

// =============================================================================
// Configuration surface
// =============================================================================

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn missing_endpoint_fails_on_first_use_not_construction() {
        let invoker = AgentRuntimeInvoker::new(
            InvokerConfig::default().with_timeout_ms(100),
        );

        let err = invoker.invoke("tools/list", Map::new()).await.unwrap_err();
        assert!(matches!(err, InvokeError::Configuration(_)));
        assert!(invoker.status().last_error.is_some());
    }

    #[tokio::test]
    async fn status_report_carries_escaped_endpoint_and_qualifier() {
        let invoker = AgentRuntimeInvoker::new(
            InvokerConfig::default()
                .with_endpoint("arn:aws:foo/bar")
                .with_transport(TransportKind::Direct)
                .with_bearer_token("tok"),
        );

        let report = invoker.status();
        assert!(report.endpoint.contains("arn%3Aaws%3Afoo%2Fbar"));
        assert!(report.endpoint.ends_with("?qualifier=DEFAULT"));
        assert_eq!(report.qualifier, "DEFAULT");
    }
}
