// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{GROUP, KIND, POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS, VERSION};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the Example CRD to be served by the API server.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_example_crd(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match check_example_crd_exists(client).await {
            Ok(true) => {
                info!("Example CRD ({}/{}) is available", GROUP, VERSION);
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "Example CRD ({}/{}) not yet available, waiting {} seconds...",
                    GROUP, VERSION, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for Example CRD: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;
        interval = next_interval(interval);
    }
}

fn next_interval(interval: u64) -> u64 {
    interval.saturating_mul(2).min(POLL_MAX_INTERVAL_SECS)
}

/// Check if the Example CRD exists by attempting to discover it.
async fn check_example_crd_exists(client: &Client) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[GROUP])
        .run()
        .await?;

    let found = discovery
        .groups()
        .filter(|group| group.name() == GROUP)
        .flat_map(|group| group.recommended_resources())
        .any(|(ar, _)| ar.kind == KIND && ar.version == VERSION);

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;

    const GROUP_VERSION_PATH: &str = "/apis/apps.example.com/v1alpha1";

    fn group_list_json(groups: serde_json::Value) -> String {
        serde_json::json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": groups
        })
        .to_string()
    }

    fn example_group() -> serde_json::Value {
        serde_json::json!([{
            "name": "apps.example.com",
            "versions": [{"groupVersion": "apps.example.com/v1alpha1", "version": "v1alpha1"}],
            "preferredVersion": {"groupVersion": "apps.example.com/v1alpha1", "version": "v1alpha1"}
        }])
    }

    fn resource_list_json() -> String {
        serde_json::json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": "apps.example.com/v1alpha1",
            "resources": [
                {
                    "name": "examples",
                    "singularName": "example",
                    "namespaced": true,
                    "kind": "Example",
                    "verbs": ["get", "list", "watch", "create", "update", "patch", "delete"]
                },
                {
                    "name": "examples/status",
                    "singularName": "",
                    "namespaced": true,
                    "kind": "Example",
                    "verbs": ["get", "patch", "update"]
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_crd_found_when_group_serves_example() {
        let (client, _mock) = MockService::new()
            .on_get("/apis", 200, &group_list_json(example_group()))
            .on_get(GROUP_VERSION_PATH, 200, &resource_list_json())
            .into_client();

        assert!(check_example_crd_exists(&client).await.unwrap());
    }

    #[tokio::test]
    async fn test_crd_missing_when_group_absent() {
        let (client, _mock) = MockService::new()
            .on_get("/apis", 200, &group_list_json(serde_json::json!([])))
            .into_client();

        assert!(!check_example_crd_exists(&client).await.unwrap());
    }

    #[test]
    fn test_backoff_doubles_until_cap() {
        assert_eq!(next_interval(10), 20);
        assert_eq!(next_interval(20), 40);
        assert_eq!(next_interval(40), 60);
        assert_eq!(next_interval(60), 60);
    }
}
