// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Operations the probe can send through the admission chain

use crate::error::{ProbeError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    /// Merge patch, seen by the webhook as an UPDATE
    Patch,
    Delete,
}

impl Operation {
    /// Admission operation the API server reports to the webhook
    pub fn admission_operation(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update | Operation::Patch => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Patch => "patch",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "patch" => Ok(Operation::Patch),
            "delete" => Ok(Operation::Delete),
            other => Err(ProbeError::InvalidOperation(format!(
                "unknown operation '{}', expected one of create, update, patch, delete",
                other
            ))),
        }
    }
}

/// Parse a comma separated list of operations, keeping their order
pub fn parse_operations(list: &str) -> Result<Vec<Operation>> {
    let operations = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Operation>())
        .collect::<Result<Vec<Operation>>>()?;

    if operations.is_empty() {
        return Err(ProbeError::InvalidOperation(
            "no operations given".to_string(),
        ));
    }

    Ok(operations)
}
