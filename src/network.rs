// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, NetplaneError};

pub const API_VERSION: &str = "1.0";
pub const PROJECT_DEFAULT: &str = "default";

// Longest name the kernel accepts for a network interface (IFNAMSIZ - 1).
const IFACE_NAME_MAX_LEN: usize = 15;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
/// Type of a managed network, fixed at creation time.
pub enum NetworkType {
    #[default]
    Bridge,
    Macvlan,
    Sriov,
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NetworkType::Bridge => "bridge",
                NetworkType::Macvlan => "macvlan",
                NetworkType::Sriov => "sriov",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
/// Cluster-wide lifecycle status of a managed network.
///
/// Transitions: pending -> created (promotion), pending -> deleted,
/// created -> errored (failed cluster fan-out), errored -> created
/// (operator-driven recovery update).
pub enum NetworkStatus {
    Pending,
    Created,
    Errored,
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NetworkStatus::Pending => "pending",
                NetworkStatus::Created => "created",
                NetworkStatus::Errored => "errored",
            }
        )
    }
}

/// A network as reported by the API: managed networks carry their
/// database definition, unmanaged host interfaces only a probed type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Network {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Either a managed [NetworkType] or a probed host interface kind
    /// (`loopback`, `vlan`, `physical`, `bond`, `unknown`).
    #[serde(rename = "type")]
    pub network_type: String,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub used_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NetworkStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
}

/// Body of `POST networks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct NetworkCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub network_type: NetworkType,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// Body of `PUT`/`PATCH networks/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct NetworkUpdate {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// Body of `POST networks/{name}` (rename).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct NetworkRename {
    pub name: String,
}

/// Validate a network name against the rules of its type. All current
/// types realize as a host interface, so they share the kernel
/// interface naming rules.
pub fn validate_name(
    name: &str,
    _network_type: NetworkType,
) -> Result<(), NetplaneError> {
    if name.is_empty() {
        return Err(NetplaneError::new(
            ErrorKind::InvalidArgument,
            "Network name may not be empty".to_string(),
        ));
    }
    if name.len() > IFACE_NAME_MAX_LEN {
        return Err(NetplaneError::new(
            ErrorKind::InvalidArgument,
            format!(
                "Network name {name:?} is longer than {IFACE_NAME_MAX_LEN} \
                 characters"
            ),
        ));
    }
    if name.starts_with('-')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(NetplaneError::new(
            ErrorKind::InvalidArgument,
            format!("Network name {name:?} contains invalid characters"),
        ));
    }
    Ok(())
}
