// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Example reconciler - keeps one owned ConfigMap per Example in sync and reports readiness.

use crate::config::Config;
use crate::constants::{conditions, data, labels, OPERATOR_NAME};
use crate::error::{ExampleOperatorError, Result};
use crate::types::example::{set_status_condition, Condition, Example, ExampleStatus};
use futures::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    api::{ObjectMeta, Patch, PatchParams, PostParams},
    runtime::{controller::Action, Controller},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct ExampleReconciler {
    client: Client,
    config: Config,
}

impl ExampleReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let (examples, configmaps): (Api<Example>, Api<ConfigMap>) =
            match self.config.watch_namespace.as_deref() {
                Some(ns) => {
                    info!("Watching Examples in namespace {}", ns);
                    (
                        Api::namespaced(self.client.clone(), ns),
                        Api::namespaced(self.client.clone(), ns),
                    )
                }
                None => {
                    info!("Watching Examples in all namespaces");
                    (Api::all(self.client.clone()), Api::all(self.client.clone()))
                }
            };

        let context = Arc::new(self);

        Controller::new(examples, WatcherConfig::default())
            .owns(configmaps, owned_watcher_config())
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled example: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        info!("Example controller stopped");
        Ok(())
    }
}

/// Owned ConfigMaps are watched without a label selector so one that lost
/// its `app` label still maps back to its Example through the owner reference.
fn owned_watcher_config() -> WatcherConfig {
    WatcherConfig::default()
}

#[instrument(
    skip(example, ctx),
    fields(example = %format!("{}/{}", example.namespace().unwrap_or_default(), example.name_any()))
)]
async fn reconcile(example: Arc<Example>, ctx: Arc<ExampleReconciler>) -> Result<Action> {
    let name = example.name_any();
    let namespace = example
        .namespace()
        .ok_or(ExampleOperatorError::MissingObjectKey(".metadata.namespace"))?;

    info!("Reconciling Example {}/{}", namespace, name);

    // The cached object may be stale or already gone
    let examples: Api<Example> = Api::namespaced(ctx.client.clone(), &namespace);
    let example = match examples.get_opt(&name).await {
        Ok(Some(e)) => e,
        Ok(None) => {
            info!("Example resource not found. Ignoring since object must be deleted");
            return Ok(Action::await_change());
        }
        Err(e) => {
            error!("Failed to get Example: {}", e);
            return Err(e.into());
        }
    };

    let configmaps: Api<ConfigMap> = Api::namespaced(ctx.client.clone(), &namespace);
    let existing = match configmaps.get_opt(&name).await {
        Ok(cm) => cm,
        Err(e) => {
            error!("Failed to get ConfigMap: {}", e);
            return Err(e.into());
        }
    };

    let Some(mut configmap) = existing else {
        let cm = configmap_for_example(&example)?;
        info!("Creating a new ConfigMap {}/{}", namespace, name);
        if let Err(e) = configmaps.create(&PostParams::default(), &cm).await {
            error!("Failed to create new ConfigMap {}/{}: {}", namespace, name, e);
            return Err(e.into());
        }
        return Ok(Action::requeue(ctx.config.requeue_after_create));
    };

    if sync_message(&mut configmap, &example.spec.message) {
        info!("Updating ConfigMap {}/{} message", namespace, name);
        if let Err(e) = configmaps
            .replace(&name, &PostParams::default(), &configmap)
            .await
        {
            error!("Failed to update ConfigMap {}/{}: {}", namespace, name, e);
            return Err(e.into());
        }
    }

    if let Err(e) = update_ready_status(&examples, &example).await {
        error!("Failed to update Example status: {}", e);
        return Err(e);
    }

    Ok(Action::await_change())
}

fn error_policy(
    example: Arc<Example>,
    error: &ExampleOperatorError,
    ctx: Arc<ExampleReconciler>,
) -> Action {
    error!(
        "Reconciliation error for Example {}/{}: {}",
        example.namespace().unwrap_or_default(),
        example.name_any(),
        error
    );
    Action::requeue(ctx.config.error_requeue)
}

/// Build the ConfigMap owned by an Example
pub fn configmap_for_example(example: &Example) -> Result<ConfigMap> {
    let name = example
        .metadata
        .name
        .clone()
        .ok_or(ExampleOperatorError::MissingObjectKey(".metadata.name"))?;
    let namespace = example
        .namespace()
        .ok_or(ExampleOperatorError::MissingObjectKey(".metadata.namespace"))?;
    let mut owner = example
        .controller_owner_ref(&())
        .ok_or_else(|| ExampleOperatorError::OwnerReference(format!("{}/{}", namespace, name)))?;
    owner.block_owner_deletion = Some(true);

    Ok(ConfigMap {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace),
            labels: Some(BTreeMap::from([(
                labels::APP.to_string(),
                OPERATOR_NAME.to_string(),
            )])),
            owner_references: Some(vec![owner]),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            data::MESSAGE.to_string(),
            example.spec.message.clone(),
        )])),
        ..Default::default()
    })
}

/// Set the message key on the ConfigMap, returning whether it changed.
/// A missing key counts as an empty message.
fn sync_message(configmap: &mut ConfigMap, message: &str) -> bool {
    let current = configmap
        .data
        .as_ref()
        .and_then(|d| d.get(data::MESSAGE))
        .map(String::as_str)
        .unwrap_or_default();

    if current == message {
        return false;
    }

    configmap
        .data
        .get_or_insert_with(BTreeMap::new)
        .insert(data::MESSAGE.to_string(), message.to_string());
    true
}

/// Status the Example should carry once its ConfigMap is in place
fn ready_status(example: &Example) -> ExampleStatus {
    let mut current = example
        .status
        .as_ref()
        .and_then(|s| s.conditions.clone())
        .unwrap_or_default();

    set_status_condition(
        &mut current,
        Condition {
            condition_type: conditions::TYPE_READY.to_string(),
            status: conditions::STATUS_TRUE.to_string(),
            observed_generation: example.metadata.generation,
            last_transition_time: String::new(),
            reason: conditions::REASON_CONFIGMAP_CREATED.to_string(),
            message: conditions::MESSAGE_CONFIGMAP_CREATED.to_string(),
        },
    );

    ExampleStatus {
        conditions: Some(current),
    }
}

async fn update_ready_status(api: &Api<Example>, example: &Example) -> Result<()> {
    let status = ready_status(example);

    if example.status.as_ref() == Some(&status) {
        debug!("Example status already up to date");
        return Ok(());
    }

    let patch = json!({ "status": serde_json::to_value(&status)? });
    api.patch_status(
        &example.name_any(),
        &PatchParams::default(),
        &Patch::Merge(&patch),
    )
    .await?;

    info!("Example status set to Ready");
    Ok(())
}
