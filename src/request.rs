// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::PROJECT_DEFAULT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Replace semantics.
    Put,
    /// Merge semantics.
    Patch,
}

/// Request attributes the HTTP collaborator extracts before handing a
/// call to a coordinator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct RequestContext {
    /// Set when the request came from a cluster peer rather than a
    /// client. Marked coordinators then perform only the local half of
    /// the operation: no database writes, no re-fanout.
    pub cluster_notification: bool,
    /// `?target=<node>` query parameter. The HTTP collaborator forwards
    /// the request when the target is a remote member, so coordinators
    /// only ever see their own node name here.
    pub target: Option<String>,
    /// `?project=<name>` query parameter.
    pub project: Option<String>,
    /// Client-echoed ETag (If-Match) for guarded updates.
    pub etag: Option<String>,
}

impl RequestContext {
    pub fn notification() -> Self {
        Self {
            cluster_notification: true,
            ..Default::default()
        }
    }

    pub fn with_target(node: &str) -> Self {
        Self {
            target: Some(node.to_string()),
            ..Default::default()
        }
    }

    pub fn project(&self) -> &str {
        self.project.as_deref().unwrap_or(PROJECT_DEFAULT)
    }
}
