// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Built-in sample custom resource sent when no manifest is given

use crate::constants::{PROBE_LABEL, SAMPLE_NAME};
use crate::error::Result;
use kube::api::DynamicObject;
use kube::{CustomResource, Resource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// KubeDB Postgres, the kind guarded by `validators.kubedb.com`
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(
    group = "kubedb.com",
    version = "v1alpha1",
    kind = "Postgres",
    plural = "postgreses"
)]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct PostgresSpec {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_policy: Option<String>,
}

/// Build the sample Postgres the probe sends when no manifest is given
pub fn sample_postgres(namespace: &str) -> Postgres {
    let mut postgres = Postgres::new(
        SAMPLE_NAME,
        PostgresSpec {
            version: "10.2-v2".to_string(),
            replicas: Some(1),
            storage_type: Some("Ephemeral".to_string()),
            termination_policy: Some("WipeOut".to_string()),
        },
    );
    postgres.metadata.namespace = Some(namespace.to_string());
    postgres.metadata.labels = Some(BTreeMap::from([(
        PROBE_LABEL.to_string(),
        "true".to_string(),
    )]));
    postgres
}

/// Convert a typed resource into a dynamic object, keeping apiVersion/kind
pub fn to_dynamic<K>(resource: &K) -> Result<DynamicObject>
where
    K: Resource + Serialize,
{
    let value = serde_json::to_value(resource)?;
    Ok(serde_json::from_value(value)?)
}
