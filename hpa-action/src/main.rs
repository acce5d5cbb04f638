//! The HPA action controller.
//!
//! A stateless gRPC worker of the deployment pipeline: given an app context prepared by the
//! orchestrator and the HPA placement controller, it rewrites the workload manifests in the
//! context so their scheduling constraints and resource requests reflect the composite
//! application's hardware-awareness intents.

mod action;
mod app;
mod appcontext;
mod catalog;
mod config;
#[cfg(test)]
mod config_test;
mod database;
mod error;
#[cfg(test)]
mod fixtures;
mod grpc;
mod manifest;
#[cfg(test)]
mod manifest_test;
mod server;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;

use crate::app::App;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing/logging system.
    tracing_subscriber::registry()
        // Filter spans based on the RUST_LOG env var.
        .with(tracing_subscriber::EnvFilter::from_default_env())
        // Send a copy of all spans to stdout in compact form.
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
        )
        // Install this registry as the global tracing registry.
        .try_init()
        .context("error initializing logging/tracing system")?;

    let cfg = Arc::new(Config::new()?);
    tracing::info!(
        host = %cfg.grpc_host,
        port = %cfg.grpc_port,
        tls = cfg.tls_enabled(),
        storage_data_path = %cfg.storage_data_path,
        "starting HPA action controller",
    );
    if let Err(err) = App::new(cfg).await?.spawn().await {
        tracing::error!(error = ?err);
    }

    // Ensure any pending output is flushed.
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();

    Ok(())
}
