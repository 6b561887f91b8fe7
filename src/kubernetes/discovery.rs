// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! GroupVersionKind to REST resource resolution

use crate::constants::discovery::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::{ProbeError, Result};
use kube::core::GroupVersionKind;
use kube::discovery::{self, ApiResource, Scope};
use kube::Client;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// REST resource backing a kind
#[derive(Debug, Clone)]
pub struct ResolvedResource {
    pub api_resource: ApiResource,
    pub namespaced: bool,
}

/// Resolve a kind to its resource through discovery of its group version
#[instrument(skip(client, gvk), fields(gvk = %display_gvk(gvk)))]
pub async fn resolve_gvk(client: &Client, gvk: &GroupVersionKind) -> Result<ResolvedResource> {
    let (api_resource, capabilities) = discovery::pinned_kind(client, gvk)
        .await
        .map_err(|e| match e {
            kube::Error::Discovery(e) => {
                ProbeError::UnknownKind(format!("{}: {}", display_gvk(gvk), e))
            }
            kube::Error::Api(resp) if resp.code == 404 => {
                ProbeError::UnknownKind(format!("{}: {}", display_gvk(gvk), resp.message))
            }
            other => ProbeError::KubeError(other),
        })?;

    let namespaced = matches!(capabilities.scope, Scope::Namespaced);
    debug!(
        "Resolved {} to resource {} (namespaced: {})",
        display_gvk(gvk),
        api_resource.plural,
        namespaced
    );

    Ok(ResolvedResource {
        api_resource,
        namespaced,
    })
}

/// Wait for a kind to be served by the cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_kind(
    client: &Client,
    gvk: &GroupVersionKind,
    timeout: Option<Duration>,
) -> Result<ResolvedResource> {
    let deadline = timeout.map(|t| Instant::now() + t);
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match resolve_gvk(client, gvk).await {
            Ok(resolved) => {
                info!("{} is available", display_gvk(gvk));
                return Ok(resolved);
            }
            Err(ProbeError::UnknownKind(_)) => {
                info!(
                    "{} not yet available, waiting {} seconds...",
                    display_gvk(gvk),
                    interval
                );
            }
            Err(e) => {
                warn!(
                    "Error resolving {}: {}, retrying in {} seconds...",
                    display_gvk(gvk),
                    e,
                    interval
                );
            }
        }

        let mut pause = Duration::from_secs(interval);
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ProbeError::Timeout(format!(
                    "waiting for {} to be served",
                    display_gvk(gvk)
                )));
            }
            pause = pause.min(remaining);
        }
        sleep(pause).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

fn display_gvk(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        format!("{}/{}", gvk.version, gvk.kind)
    } else {
        format!("{}/{}/{}", gvk.group, gvk.version, gvk.kind)
    }
}
