// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::conditions;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "apps.example.com", version = "v1alpha1", kind = "Example")]
#[kube(namespaced)]
#[kube(status = "ExampleStatus")]
#[kube(printcolumn = r#"{"name":"Message","type":"string","jsonPath":".spec.message"}"#)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSpec {
    /// Copied into the `message` key of the owned ConfigMap
    #[serde(default)]
    pub message: String,
}

impl Example {
    /// Check if this example is ready based on its status conditions
    pub fn is_ready(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.conditions.as_deref())
            .and_then(|c| find_status_condition(c, conditions::TYPE_READY))
            .is_some_and(|c| c.status == conditions::STATUS_TRUE)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExampleStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    /// RFC 3339 timestamp of the last status change
    #[serde(default)]
    pub last_transition_time: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

pub fn find_status_condition<'a>(conditions: &'a [Condition], condition_type: &str) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.condition_type == condition_type)
}

/// Insert or update a condition by type.
///
/// The transition time only moves when the status value changes. An empty
/// transition time on a new condition is stamped with the current time.
pub fn set_status_condition(conditions: &mut Vec<Condition>, mut new: Condition) {
    if new.last_transition_time.is_empty() {
        new.last_transition_time = now_rfc3339();
    }

    let Some(existing) = conditions
        .iter_mut()
        .find(|c| c.condition_type == new.condition_type)
    else {
        conditions.push(new);
        return;
    };

    if existing.status != new.status {
        existing.status = new.status;
        existing.last_transition_time = new.last_transition_time;
    }
    existing.reason = new.reason;
    existing.message = new.message;
    existing.observed_generation = new.observed_generation;
}

/// Current time as an RFC 3339 UTC timestamp with second precision
pub fn now_rfc3339() -> String {
    jiff::Timestamp::now().strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}
