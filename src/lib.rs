//! Invocation adapter for ARN-addressed agent runtimes.
//!
//! Turns a `(method, params)` pair into exactly one JSON-RPC 2.0 round trip
//! to a remote agent runtime, over one of two interchangeable transports,
//! races the call against a configured deadline and normalizes the
//! heterogeneous reply shapes into a uniform [`InvocationResult`].
//!
//! ## Architecture
//!
//! - **Envelope**: `envelope.rs` - request construction and reply normalization
//! - **Transport**: `transport.rs` - managed and direct transports behind one trait
//! - **Invoker**: `invoker.rs` - the adapter: invoke, probe, status, refresh
//! - **Config**: `config.rs` - env-driven configuration with defaults
//! - **Cache**: `cache.rs` - explicitly reloadable payload cache
//!
//! The adapter is single-shot by design: it never retries, never suppresses
//! a failure silently, and keeps no per-call state beyond the diagnostic
//! connection status.

pub mod cache;
pub mod config;
pub mod envelope;
pub mod error;
pub mod invoker;
pub mod transport;
pub mod types;

pub use cache::ResponseCache;
pub use config::{InvokerConfig, TransportKind};
pub use envelope::{build_envelope, new_request_id, normalize_reply, JsonRpcError, JsonRpcReply};
pub use error::{InvokeError, InvokeResult, TransportErrorKind};
pub use invoker::AgentRuntimeInvoker;
pub use transport::{AgentTransport, DirectTransport, ManagedTransport, RawReply};
pub use types::{ConnectionStatus, InvocationResult, StatusReport};
