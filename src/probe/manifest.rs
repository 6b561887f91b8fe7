// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Loading the object to probe from a manifest file

use crate::error::{ProbeError, Result};
use kube::api::DynamicObject;
use kube::core::GroupVersionKind;
use std::path::Path;
use tracing::{debug, instrument};

/// Read a YAML (or JSON) manifest holding a single object
#[instrument]
pub fn load_manifest(path: &Path) -> Result<DynamicObject> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ProbeError::ManifestError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let object = parse_manifest(&contents).map_err(|e| match e {
        ProbeError::ManifestError(msg) => {
            ProbeError::ManifestError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    debug!(
        "Loaded {} from {}",
        object.types.as_ref().map(|t| t.kind.as_str()).unwrap_or("object"),
        path.display()
    );

    Ok(object)
}

/// Parse a single object from YAML or JSON text
pub fn parse_manifest(contents: &str) -> Result<DynamicObject> {
    let object: DynamicObject = serde_yaml::from_str(contents)
        .map_err(|e| ProbeError::ManifestError(format!("Failed to parse manifest: {}", e)))?;

    // Surface missing type information at load time rather than at discovery
    gvk_of(&object)?;

    Ok(object)
}

/// Group, version and kind of a dynamic object
pub fn gvk_of(object: &DynamicObject) -> Result<GroupVersionKind> {
    let Some(types) = object.types.as_ref() else {
        return Err(ProbeError::ManifestError(
            "object has no apiVersion/kind".to_string(),
        ));
    };

    if types.kind.is_empty() || types.api_version.is_empty() {
        return Err(ProbeError::ManifestError(format!(
            "object has incomplete type information: apiVersion='{}' kind='{}'",
            types.api_version, types.kind
        )));
    }

    let (group, version) = parse_api_version(&types.api_version);
    Ok(GroupVersionKind::gvk(&group, &version, &types.kind))
}

/// Split an apiVersion into (group, version); the core group is empty
pub fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}
