// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webhook_probe::config::Config;
use webhook_probe::kubernetes::{
    connect, update_validating_webhook_ca_bundle_within, wait_for_kind,
};
use webhook_probe::probe::{gvk_of, load_manifest, Detector};
use webhook_probe::types::{sample_postgres, to_dynamic};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting webhook probe");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: webhook={}, operations={:?}",
        config.webhook_name, config.operations
    );

    // Connect using the local kubeconfig
    let access = connect(&config).await?;
    info!("Connected to Kubernetes cluster");

    if config.patch_ca_bundle {
        info!(
            "Waiting for ValidatingWebhookConfiguration {}...",
            config.webhook_name
        );
        update_validating_webhook_ca_bundle_within(
            &access.client,
            &config.webhook_name,
            &access.ca_bundle,
            config.wait_timeout,
        )
        .await?;
        info!("CA bundle of {} is up to date", config.webhook_name);
    }

    let object = match &config.manifest {
        Some(path) => load_manifest(path)?,
        None => to_dynamic(&sample_postgres(&config.probe_namespace))?,
    };

    // The kind may be registered by the same operator that serves the webhook
    let gvk = gvk_of(&object)?;
    wait_for_kind(&access.client, &gvk, config.wait_timeout).await?;

    let detector = Detector::new(access.client.clone(), object);
    for report in detector.check_all(&config.operations).await? {
        info!("{}", report);
    }

    info!("Probe complete");
    Ok(())
}
