// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_PROBE_NAMESPACE, DEFAULT_WEBHOOK_NAME};
use crate::probe::operation::{parse_operations, Operation};

/// Probe configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Kubeconfig context to use, `current-context` when unset
    pub kube_context: Option<String>,
    /// Name of the ValidatingWebhookConfiguration to patch
    pub webhook_name: String,
    pub patch_ca_bundle: bool,
    /// Upper bound for the blocking waits, unbounded when unset
    pub wait_timeout: Option<Duration>,
    /// Manifest of the object to probe, the built-in sample when unset
    pub manifest: Option<PathBuf>,
    pub probe_namespace: String,
    pub operations: Vec<Operation>,
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
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook_name =
            non_empty("WEBHOOK_NAME").unwrap_or_else(|| DEFAULT_WEBHOOK_NAME.to_string());
        let patch_ca_bundle: bool = non_empty("PATCH_CA_BUNDLE")
            .unwrap_or("true".to_string())
            .parse()
            .unwrap_or(true);

        let wait_timeout = non_empty("WEBHOOK_WAIT_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("WEBHOOK_WAIT_TIMEOUT_SECS is not a number: {}", v))
            })
            .transpose()?;

        let operations = parse_operations(
            &non_empty("PROBE_OPERATIONS").unwrap_or_else(|| "create".to_string()),
        )
        .context("PROBE_OPERATIONS is invalid")?;

        Ok(Config {
            kube_context: non_empty("KUBE_CONTEXT"),
            webhook_name,
            patch_ca_bundle,
            wait_timeout,
            manifest: non_empty("PROBE_MANIFEST").map(PathBuf::from),
            probe_namespace: non_empty("PROBE_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_PROBE_NAMESPACE.to_string()),
            operations,
        })
    }
}
