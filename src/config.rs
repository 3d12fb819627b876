// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HEALTH_PROBE_BIND_ADDRESS: &str = "0.0.0.0:8081";
const DEFAULT_REQUEUE_AFTER_CREATE_SECS: u64 = 1;
const DEFAULT_ERROR_REQUEUE_SECS: u64 = 15;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Restrict the controller to a single namespace; `None` watches all namespaces
    pub watch_namespace: Option<String>,
    pub health_probe_bind_address: SocketAddr,
    /// Delay before reconciling again after the ConfigMap was created
    pub requeue_after_create: Duration,
    /// Delay before retrying a failed reconcile
    pub error_requeue: Duration,
    pub wait_for_crd: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_namespace: None,
            health_probe_bind_address: SocketAddr::from(([0, 0, 0, 0], 8081)),
            requeue_after_create: Duration::from_secs(DEFAULT_REQUEUE_AFTER_CREATE_SECS),
            error_requeue: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
            wait_for_crd: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        let health_probe_bind_address = parse_or(
            &lookup,
            "HEALTH_PROBE_BIND_ADDRESS",
            DEFAULT_HEALTH_PROBE_BIND_ADDRESS,
        )?;

        let requeue_after_create: u64 = parse_or(
            &lookup,
            "REQUEUE_AFTER_CREATE_SECS",
            &DEFAULT_REQUEUE_AFTER_CREATE_SECS.to_string(),
        )?;

        let error_requeue: u64 = parse_or(
            &lookup,
            "ERROR_REQUEUE_SECS",
            &DEFAULT_ERROR_REQUEUE_SECS.to_string(),
        )?;

        let wait_for_crd: bool = parse_or(&lookup, "WAIT_FOR_CRD", "true")?;

        Ok(Config {
            watch_namespace,
            health_probe_bind_address,
            requeue_after_create: Duration::from_secs(requeue_after_create),
            error_requeue: Duration::from_secs(error_requeue),
            wait_for_crd,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{} has an invalid value: {:?}", key, raw))
}
