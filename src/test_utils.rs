// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Routes = HashMap<(String, String), VecDeque<(u16, String)>>;

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Watch requests (`?watch=true`) are routed under the method `WATCH`.
/// Registering a route more than once queues the responses; the last one
/// keeps being served once the queue is drained.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests with the given method and exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Add a watch stream response, one JSON event per line
    pub fn on_watch(self, path: &str, events: &[serde_json::Value]) -> Self {
        let body: String = events.iter().map(|e| format!("{}\n", e)).collect();
        self.on("WATCH", path, 200, &body)
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Requests seen so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen with the given method
    pub fn count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// Build a kube Client from a clone of this mock service
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        // Exact matches only: discovery paths are prefixes of object paths
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let is_watch = req
            .uri()
            .query()
            .is_some_and(|q| q.split('&').any(|p| p == "watch=true"));
        let method = if is_watch {
            "WATCH".to_string()
        } else {
            req.method().to_string()
        };
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| (404, not_found_json("path", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a discovery response for a single resource of a group version
pub fn api_resource_list_json(
    group_version: &str,
    plural: &str,
    kind: &str,
    namespaced: bool,
) -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": group_version,
        "resources": [{
            "name": plural,
            "singularName": kind.to_lowercase(),
            "namespaced": namespaced,
            "kind": kind,
            "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
        }]
    })
    .to_string()
}

/// Create a failure Status response
pub fn status_json(reason: &str, message: &str, code: u16) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(
        "NotFound",
        &format!("{} \"{}\" not found", resource, name),
        404,
    )
}

/// Create a webhook rejection as returned by the API server
pub fn webhook_denied_json(webhook: &str, reason: &str) -> String {
    status_json(
        "BadRequest",
        &format!(
            "admission webhook \"{}\" denied the request: {}",
            webhook, reason
        ),
        400,
    )
}

/// Create a ValidatingWebhookConfiguration with one webhook per CA bundle
pub fn webhook_configuration_value(
    name: &str,
    ca_bundles: &[Option<&str>],
) -> serde_json::Value {
    let webhooks: Vec<serde_json::Value> = ca_bundles
        .iter()
        .enumerate()
        .map(|(i, ca)| {
            let mut client_config = serde_json::json!({
                "service": {"namespace": "kube-system", "name": "kubedb-operator"}
            });
            if let Some(ca) = ca {
                client_config["caBundle"] = serde_json::Value::String(ca.to_string());
            }
            serde_json::json!({
                "name": format!("webhook-{}.{}", i, name),
                "clientConfig": client_config,
                "sideEffects": "None",
                "admissionReviewVersions": ["v1"]
            })
        })
        .collect();

    serde_json::json!({
        "apiVersion": "admissionregistration.k8s.io/v1",
        "kind": "ValidatingWebhookConfiguration",
        "metadata": {
            "name": name,
            "resourceVersion": "1"
        },
        "webhooks": webhooks
    })
}

/// Wrap objects into a list response
pub fn list_json(api_version: &str, kind: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": {"resourceVersion": "10"},
        "items": items
    })
    .to_string()
}

/// Create a Postgres object as stored by the API server
pub fn postgres_json(namespace: &str, name: &str, resource_version: &str) -> String {
    serde_json::json!({
        "apiVersion": "kubedb.com/v1alpha1",
        "kind": "Postgres",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid",
            "resourceVersion": resource_version
        },
        "spec": {"version": "10.2-v2", "replicas": 1}
    })
    .to_string()
}

/// Create a watch event line
pub fn watch_event(event_type: &str, object: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"type": event_type, "object": object})
}

/// Create a watch ERROR event for an expired resourceVersion
pub fn watch_expired_event() -> serde_json::Value {
    watch_event(
        "ERROR",
        serde_json::json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": "too old resource version: 1 (10)",
            "reason": "Expired",
            "code": 410
        }),
    )
}
