// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExampleOperatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Example is missing {0}")]
    MissingObjectKey(&'static str),

    #[error("Failed to build owner reference for Example {0}")]
    OwnerReference(String),

    #[error("Failed to serialize status: {0}")]
    StatusSerialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExampleOperatorError>;
