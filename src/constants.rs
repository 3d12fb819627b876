// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name, used as the `app` label value on owned objects
pub const OPERATOR_NAME: &str = "example-operator";

/// Labels stamped on objects owned by the operator
pub mod labels {
    pub const APP: &str = "app";
}

/// Keys in the owned ConfigMap's data
pub mod data {
    /// Mirrors `spec.message` of the owning Example
    pub const MESSAGE: &str = "message";
}

/// Status condition vocabulary
pub mod conditions {
    pub const TYPE_READY: &str = "Ready";
    pub const STATUS_TRUE: &str = "True";
    pub const REASON_CONFIGMAP_CREATED: &str = "ConfigMapCreated";
    pub const MESSAGE_CONFIGMAP_CREATED: &str = "ConfigMap was created successfully";
}

/// CRD polling configuration
pub mod crd {
    pub const GROUP: &str = "apps.example.com";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "Example";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
