// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Classification of API server answers into probe outcomes

use crate::error::Result;
use crate::probe::operation::Operation;
use kube::error::ErrorResponse;
use std::fmt;

const WEBHOOK_DENIAL_PREFIX: &str = "admission webhook \"";
const WEBHOOK_DENIAL_SUFFIX: &str = "\" denied the request";

/// What the API server did with a probe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request went through the admission chain
    Allowed { resource_version: Option<String> },
    /// A validating webhook denied the request
    Denied {
        webhook: String,
        message: String,
        code: u16,
    },
    /// The API server refused the request for another reason
    Rejected {
        reason: String,
        message: String,
        code: u16,
    },
}

impl Outcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allowed { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied { .. })
    }

    /// Turn an API status error into an outcome
    pub fn from_error_response(response: &ErrorResponse) -> Self {
        match denying_webhook(&response.message) {
            Some(webhook) => Outcome::Denied {
                webhook,
                message: response.message.clone(),
                code: response.code,
            },
            None => Outcome::Rejected {
                reason: response.reason.clone(),
                message: response.message.clone(),
                code: response.code,
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Allowed {
                resource_version: Some(rv),
            } => write!(f, "allowed (resourceVersion {})", rv),
            Outcome::Allowed {
                resource_version: None,
            } => write!(f, "allowed"),
            Outcome::Denied {
                webhook,
                message,
                code,
            } => write!(f, "denied by webhook {} ({}): {}", webhook, code, message),
            Outcome::Rejected {
                reason,
                message,
                code,
            } => write!(f, "rejected: {} ({}): {}", reason, code, message),
        }
    }
}

/// Result of one probe operation against one object
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub operation: Operation,
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
    pub outcome: Outcome,
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        };
        write!(
            f,
            "{} {} {} [{}]: {}",
            self.operation,
            self.kind,
            target,
            self.operation.admission_operation(),
            self.outcome
        )
    }
}

/// Classify the result of an API call.
///
/// Status errors from the API server become outcomes, everything else
/// (transport, decoding) is passed on as an error.
pub fn classify<T>(
    result: std::result::Result<T, kube::Error>,
    resource_version: impl FnOnce(&T) -> Option<String>,
) -> Result<Outcome> {
    match result {
        Ok(obj) => Ok(Outcome::Allowed {
            resource_version: resource_version(&obj),
        }),
        Err(kube::Error::Api(response)) => Ok(Outcome::from_error_response(&response)),
        Err(e) => Err(e.into()),
    }
}

/// Extract the webhook name from an `admission webhook "<name>" denied the request` message.
///
/// Other admission webhook failures (dry run unsupported, calls failing) yield `None`.
pub fn denying_webhook(message: &str) -> Option<String> {
    message.match_indices(WEBHOOK_DENIAL_PREFIX).find_map(|(start, prefix)| {
        let rest = &message[start + prefix.len()..];
        let end = rest.find('"')?;
        let name = &rest[..end];
        (!name.is_empty() && rest[end..].starts_with(WEBHOOK_DENIAL_SUFFIX))
            .then(|| name.to_string())
    })
}
