// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use example_operator::config::Config;
use example_operator::health::{self, HealthState};
use example_operator::kubernetes::wait_for_example_crd;
use example_operator::reconcilers::ExampleReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting example-operator");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: watch_namespace={}, health_probe_bind_address={}",
        config.watch_namespace.as_deref().unwrap_or("<all>"),
        config.health_probe_bind_address
    );

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    // Bind failures surface here, probes are served while we wait for the CRD
    let health_listener = health::bind(config.health_probe_bind_address).await?;
    let health_state = HealthState::new();
    let health_server = tokio::spawn(health::serve(health_listener, health_state.clone()));

    if config.wait_for_crd {
        info!("Waiting for Example CRD to become available...");
        wait_for_example_crd(&client).await?;
    }

    let reconciler = ExampleReconciler::new(client, config);

    info!("Starting Example controller...");
    health_state.set_ready();

    // The controller returns on SIGTERM/SIGINT, the health server never does
    tokio::select! {
        res = reconciler.run() => res?,
        res = health_server => res.context("Health probe server panicked")??,
    }

    warn!("example-operator stopped");
    Ok(())
}
