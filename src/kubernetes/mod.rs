// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, webhook CA patching and kind discovery.

pub mod ca_bundle;
pub mod client;
pub mod discovery;

pub use ca_bundle::{
    update_validating_webhook_ca_bundle, update_validating_webhook_ca_bundle_within,
};
pub use client::{connect, ClusterAccess};
pub use discovery::{resolve_gvk, wait_for_kind, ResolvedResource};
