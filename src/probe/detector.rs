// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Detector - sends one object through create/update/patch/delete and
//! records how the admission chain answered.

use crate::error::{ProbeError, Result};
use crate::kubernetes::discovery::{resolve_gvk, ResolvedResource};
use crate::probe::manifest::gvk_of;
use crate::probe::operation::Operation;
use crate::probe::outcome::{classify, Outcome, ProbeReport};
use kube::{
    api::{DeleteParams, DynamicObject, ObjectMeta, Patch, PatchParams, PostParams},
    Api, Client, ResourceExt,
};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

/// Mutation applied to the live object before it is sent back as an update
pub type Transform = Box<dyn Fn(&mut DynamicObject) + Send + Sync>;

pub struct Detector {
    client: Client,
    object: DynamicObject,
    transform: Option<Transform>,
}

impl Detector {
    pub fn new(client: Client, object: DynamicObject) -> Self {
        Self {
            client,
            object,
            transform: None,
        }
    }

    /// Replace the default update mutation (overlaying the probe object)
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&mut DynamicObject) + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Run the operations in order; a rejected step does not stop the rest
    pub async fn check_all(&self, operations: &[Operation]) -> Result<Vec<ProbeReport>> {
        let resolved = self.resolve().await?;
        let mut reports = Vec::with_capacity(operations.len());
        for operation in operations {
            reports.push(self.check_resolved(*operation, &resolved).await?);
        }
        Ok(reports)
    }

    /// Run a single operation against the API server
    pub async fn check(&self, operation: Operation) -> Result<ProbeReport> {
        let resolved = self.resolve().await?;
        self.check_resolved(operation, &resolved).await
    }

    async fn resolve(&self) -> Result<ResolvedResource> {
        let gvk = gvk_of(&self.object)?;
        resolve_gvk(&self.client, &gvk).await
    }

    #[instrument(
        skip(self, resolved),
        fields(kind = %resolved.api_resource.kind, name = %self.object.name_any())
    )]
    async fn check_resolved(
        &self,
        operation: Operation,
        resolved: &ResolvedResource,
    ) -> Result<ProbeReport> {
        let name = self
            .object
            .metadata
            .name
            .clone()
            .ok_or_else(|| ProbeError::MissingName(resolved.api_resource.kind.clone()))?;

        let (api, namespace) = self.api_for(resolved);
        let resource_version = |obj: &DynamicObject| obj.resource_version();

        let outcome = match operation {
            Operation::Create => {
                let object = prepare_for_create(&self.object);
                classify(
                    api.create(&PostParams::default(), &object).await,
                    resource_version,
                )?
            }
            Operation::Update => {
                let mut live = match api.get(&name).await {
                    Ok(live) => live,
                    Err(kube::Error::Api(resp)) => {
                        warn!("Cannot update {}: {}", name, resp.message);
                        return Ok(self.report(
                            operation,
                            resolved,
                            namespace,
                            name,
                            Outcome::from_error_response(&resp),
                        ));
                    }
                    Err(e) => return Err(e.into()),
                };
                match &self.transform {
                    Some(transform) => transform(&mut live),
                    None => overlay(&mut live, &self.object),
                }
                classify(
                    api.replace(&name, &PostParams::default(), &live).await,
                    resource_version,
                )?
            }
            Operation::Patch => {
                let patch = merge_patch_body(&self.object);
                classify(
                    api.patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
                        .await,
                    resource_version,
                )?
            }
            Operation::Delete => classify(
                api.delete(&name, &DeleteParams::default()).await,
                |deleted| deleted.as_ref().left().and_then(|obj| obj.resource_version()),
            )?,
        };

        info!("{} {}: {}", operation, name, outcome);
        Ok(self.report(operation, resolved, namespace, name, outcome))
    }

    fn report(
        &self,
        operation: Operation,
        resolved: &ResolvedResource,
        namespace: Option<String>,
        name: String,
        outcome: Outcome,
    ) -> ProbeReport {
        ProbeReport {
            operation,
            kind: resolved.api_resource.kind.clone(),
            namespace,
            name,
            outcome,
        }
    }

    /// Namespaced kinds go to the object's namespace, else the client default
    fn api_for(&self, resolved: &ResolvedResource) -> (Api<DynamicObject>, Option<String>) {
        let ar = &resolved.api_resource;
        if !resolved.namespaced {
            return (Api::all_with(self.client.clone(), ar), None);
        }
        match self.object.namespace() {
            Some(ns) => (Api::namespaced_with(self.client.clone(), &ns, ar), Some(ns)),
            None => (
                Api::default_namespaced_with(self.client.clone(), ar),
                Some(self.client.default_namespace().to_string()),
            ),
        }
    }
}

/// Strip server-populated metadata so the object can be created again.
///
/// Objects are always created under their `metadata.name`.
pub fn prepare_for_create(object: &DynamicObject) -> DynamicObject {
    let mut object = object.clone();
    object.metadata = ObjectMeta {
        name: object.metadata.name.take(),
        namespace: object.metadata.namespace.take(),
        labels: object.metadata.labels.take(),
        annotations: object.metadata.annotations.take(),
        finalizers: object.metadata.finalizers.take(),
        owner_references: object.metadata.owner_references.take(),
        ..Default::default()
    };
    if let Some(data) = object.data.as_object_mut() {
        data.remove("status");
    }
    object
}

/// Default update mutation: the probe object's body, labels and annotations
/// on top of the live object
pub fn overlay(live: &mut DynamicObject, desired: &DynamicObject) {
    if let (Some(live_data), Some(desired_data)) =
        (live.data.as_object_mut(), desired.data.as_object())
    {
        for (key, value) in desired_data {
            if key != "status" {
                live_data.insert(key.clone(), value.clone());
            }
        }
    }
    if let Some(labels) = &desired.metadata.labels {
        live.labels_mut().extend(labels.clone());
    }
    if let Some(annotations) = &desired.metadata.annotations {
        live.annotations_mut().extend(annotations.clone());
    }
}

/// Merge patch carrying the probe object's body, labels and annotations
pub fn merge_patch_body(object: &DynamicObject) -> Value {
    let mut body = match &object.data {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    body.remove("status");

    let mut metadata = Map::new();
    if let Some(labels) = &object.metadata.labels {
        metadata.insert("labels".to_string(), serde_json::json!(labels));
    }
    if let Some(annotations) = &object.metadata.annotations {
        metadata.insert("annotations".to_string(), serde_json::json!(annotations));
    }
    if !metadata.is_empty() {
        body.insert("metadata".to_string(), Value::Object(metadata));
    }

    Value::Object(body)
}
