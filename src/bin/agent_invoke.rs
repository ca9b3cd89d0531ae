//! One-shot debugging binary: invoke a method on a remote agent runtime and
//! print the normalized result.
//!
//! Configuration comes from the environment (`AGENT_ARN`, `BEARER_TOKEN`,
//! `AGENT_RUNTIME_REGION`, ...) with flag overrides.

use anyhow::Context;
use clap::Parser;

use agent_runtime_invoker::{AgentRuntimeInvoker, InvokerConfig, TransportKind};

#[derive(Parser, Debug)]
#[command(name = "agent-invoke", about = "Invoke a method on a remote agent runtime")]
struct Args {
    /// Remote method to invoke.
    #[arg(long, default_value = "tools/list")]
    method: String,

    /// Method params as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Runtime identifier (ARN or pre-resolved URL).
    #[arg(long, env = "AGENT_ARN")]
    endpoint: Option<String>,

    /// Version/alias selector.
    #[arg(long)]
    qualifier: Option<String>,

    /// Per-call deadline in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Use the direct HTTPS transport (requires BEARER_TOKEN).
    #[arg(long)]
    direct: bool,

    /// Run a liveness probe instead of an invocation.
    #[arg(long)]
    probe: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = InvokerConfig::from_env();
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(qualifier) = args.qualifier {
        config.qualifier = qualifier;
    }
    if let Some(ms) = args.timeout_ms {
        config.timeout_ms = ms;
    }
    if args.direct {
        config.transport = TransportKind::Direct;
    }

    let invoker = AgentRuntimeInvoker::new(config);

    if args.probe {
        let alive = invoker.probe().await;
        let report = invoker.status();
        println!("{}", serde_json::to_string_pretty(&report)?);
        std::process::exit(if alive { 0 } else { 1 });
    }

    let params = serde_json::from_str::<serde_json::Value>(&args.params)
        .context("--params must be valid JSON")?
        .as_object()
        .cloned()
        .context("--params must be a JSON object")?;

    let result = invoker
        .invoke(&args.method, params)
        .await
        .with_context(|| format!("invoking {}", args.method))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
