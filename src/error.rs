// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Error watching: {0}")]
    WatchError(#[from] kube_runtime::watcher::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("No certificate authority data: {0}")]
    MissingCaData(String),

    #[error("Invalid manifest: {0}")]
    ManifestError(String),

    #[error("Kind not served by the cluster: {0}")]
    UnknownKind(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Object has no name: {0}")]
    MissingName(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Watch ended before {0} was patched")]
    WatchEnded(String),

    #[error("Serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
