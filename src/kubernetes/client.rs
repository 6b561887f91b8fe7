// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation and CA extraction from the local kubeconfig

use crate::config::Config;
use crate::error::{ProbeError, Result};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use k8s_openapi::ByteString;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use tracing::{debug, info, instrument};

/// A connected client plus the CA the webhook configuration should trust
pub struct ClusterAccess {
    pub client: Client,
    pub ca_bundle: ByteString,
}

/// Load the kubeconfig and connect to the selected context
#[instrument(skip(config), fields(context = ?config.kube_context))]
pub async fn connect(config: &Config) -> Result<ClusterAccess> {
    let kubeconfig = Kubeconfig::read()
        .map_err(|e| ProbeError::KubeconfigError(format!("Failed to read kubeconfig: {}", e)))?;

    let ca_bundle = ca_bundle_from_kubeconfig(&kubeconfig, config.kube_context.as_deref())?;
    debug!("Loaded {} bytes of CA data", ca_bundle.0.len());

    let options = KubeConfigOptions {
        context: config.kube_context.clone(),
        ..Default::default()
    };
    let client_config = KConfig::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| ProbeError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    info!("Using API server {}", client_config.cluster_url);

    let client = Client::try_from(client_config)
        .map_err(|e| ProbeError::KubeconfigError(format!("Failed to create client: {}", e)))?;

    Ok(ClusterAccess { client, ca_bundle })
}

/// Get the PEM CA data of the cluster behind a kubeconfig context.
///
/// Inline `certificate-authority-data` wins over a `certificate-authority` file.
pub fn ca_bundle_from_kubeconfig(
    kubeconfig: &Kubeconfig,
    context: Option<&str>,
) -> Result<ByteString> {
    let Some(context_name) = context.or(kubeconfig.current_context.as_deref()) else {
        return Err(ProbeError::KubeconfigError(
            "no context given and kubeconfig has no current-context".to_string(),
        ));
    };

    let cluster_name = kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == context_name)
        .and_then(|c| c.context.as_ref())
        .map(|c| c.cluster.clone())
        .ok_or_else(|| {
            ProbeError::KubeconfigError(format!("context '{}' not found", context_name))
        })?;

    let cluster = kubeconfig
        .clusters
        .iter()
        .find(|c| c.name == cluster_name)
        .and_then(|c| c.cluster.as_ref())
        .ok_or_else(|| {
            ProbeError::KubeconfigError(format!("cluster '{}' not found", cluster_name))
        })?;

    if let Some(data) = cluster.certificate_authority_data.as_deref() {
        let pem = BASE64_STANDARD.decode(data.trim()).map_err(|e| {
            ProbeError::MissingCaData(format!(
                "certificate-authority-data of cluster '{}' is not base64: {}",
                cluster_name, e
            ))
        })?;
        return Ok(ByteString(pem));
    }

    if let Some(path) = cluster.certificate_authority.as_deref() {
        let pem = std::fs::read(path).map_err(|e| {
            ProbeError::MissingCaData(format!(
                "Failed to read certificate-authority {} of cluster '{}': {}",
                path, cluster_name, e
            ))
        })?;
        return Ok(ByteString(pem));
    }

    Err(ProbeError::MissingCaData(format!(
        "cluster '{}' has neither certificate-authority-data nor certificate-authority",
        cluster_name
    )))
}
