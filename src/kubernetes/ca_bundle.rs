// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for a ValidatingWebhookConfiguration and pointing it at our CA

use crate::error::{ProbeError, Result};
use futures::StreamExt;
use k8s_openapi::api::admissionregistration::v1::ValidatingWebhookConfiguration;
use k8s_openapi::ByteString;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, ResourceExt,
};
use kube_runtime::{watcher, watcher::Event};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Set the CA bundle of every webhook; returns whether anything changed
pub fn inject_ca_bundle(
    configuration: &mut ValidatingWebhookConfiguration,
    ca_bundle: &ByteString,
) -> bool {
    let mut changed = false;
    for webhook in configuration.webhooks.iter_mut().flatten() {
        if webhook.client_config.ca_bundle.as_ref() != Some(ca_bundle) {
            webhook.client_config.ca_bundle = Some(ca_bundle.clone());
            changed = true;
        }
    }
    changed
}

/// Watch for the named configuration and patch its CA bundle once it shows up.
///
/// Deletions keep the watch going. An expired resourceVersion (410) makes the
/// watcher relist; any other watch error ends it.
#[instrument(skip(client, ca_bundle))]
pub async fn update_validating_webhook_ca_bundle(
    client: &Client,
    name: &str,
    ca_bundle: &ByteString,
) -> Result<()> {
    let api: Api<ValidatingWebhookConfiguration> = Api::all(client.clone());
    let config = watcher::Config::default().fields(&format!("metadata.name={}", name));

    let mut events = watcher(api.clone(), config).boxed();

    while let Some(event) = events.next().await {
        let event = match event {
            Ok(event) => event,
            Err(watcher::Error::WatchError(resp)) if resp.code == 410 => {
                warn!("Watch of {} expired, relisting: {}", name, resp.message);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        match event {
            Event::Init | Event::InitDone => continue,
            Event::Delete(obj) => {
                info!("DELETED {}", obj.name_any());
            }
            Event::InitApply(obj) | Event::Apply(obj) => {
                info!("APPLIED {}", obj.name_any());
                patch_ca_bundle(&api, &obj, ca_bundle).await?;
                return Ok(());
            }
        }
    }

    Err(ProbeError::WatchEnded(name.to_string()))
}

/// Same as [`update_validating_webhook_ca_bundle`], giving up after `timeout`
pub async fn update_validating_webhook_ca_bundle_within(
    client: &Client,
    name: &str,
    ca_bundle: &ByteString,
    timeout: Option<Duration>,
) -> Result<()> {
    let update = update_validating_webhook_ca_bundle(client, name, ca_bundle);
    match timeout {
        Some(t) => tokio::time::timeout(t, update).await.map_err(|_| {
            ProbeError::Timeout(format!(
                "waiting {}s for ValidatingWebhookConfiguration {}",
                t.as_secs(),
                name
            ))
        })?,
        None => update.await,
    }
}

async fn patch_ca_bundle(
    api: &Api<ValidatingWebhookConfiguration>,
    current: &ValidatingWebhookConfiguration,
    ca_bundle: &ByteString,
) -> Result<()> {
    let name = current.name_any();
    let mut desired = current.clone();

    if !inject_ca_bundle(&mut desired, ca_bundle) {
        debug!("CA bundle of {} is already up to date", name);
        return Ok(());
    }

    // A merge patch replaces the whole list, so send every webhook
    let patch = serde_json::json!({ "webhooks": desired.webhooks });
    api.patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;

    info!(
        "Patched CA bundle of {} webhook(s) in {}",
        desired.webhooks.as_ref().map_or(0, Vec::len),
        name
    );
    Ok(())
}
