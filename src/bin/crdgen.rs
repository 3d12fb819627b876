// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the Example CustomResourceDefinition as YAML.
//!
//! `cargo run --bin crdgen | kubectl apply -f -`

use example_operator::types::Example;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&Example::crd())?);
    Ok(())
}
