// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Validating webhook registered by the KubeDB operator
pub const DEFAULT_WEBHOOK_NAME: &str = "validators.kubedb.com";

/// Namespace the built-in sample object is created in
pub const DEFAULT_PROBE_NAMESPACE: &str = "default";

/// Name of the built-in sample object
pub const SAMPLE_NAME: &str = "webhook-probe";

/// Label stamped on objects created by the probe
pub const PROBE_LABEL: &str = "webhook-probe.geeko.me/probe";

/// Kind polling configuration
pub mod discovery {
    /// Initial polling interval in seconds when waiting for a kind
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
