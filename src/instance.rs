// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::NetplaneError;

pub type DeviceConfig = BTreeMap<String, String>;

/// Instance view the control plane needs: devices expanded through
/// profiles, plus the volatile per-instance config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Instance {
    pub name: String,
    pub project: String,
    /// Cluster member the instance runs on.
    pub location: String,
    pub expanded_devices: BTreeMap<String, DeviceConfig>,
    pub local_config: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Profile {
    pub name: String,
    pub project: String,
    pub devices: BTreeMap<String, DeviceConfig>,
}

/// Read access to the instance engine.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    async fn load_by_project(
        &self,
        project: &str,
    ) -> Result<Vec<Instance>, NetplaneError>;

    async fn load_all_projects(&self)
        -> Result<Vec<Instance>, NetplaneError>;
}

/// Whether a device is a NIC whose resolved type is bridged: either it
/// says so explicitly, or it references a managed network by name.
pub fn is_bridged_nic(device: &DeviceConfig) -> bool {
    if device.get("type").map(String::as_str) != Some("nic") {
        return false;
    }
    device.get("nictype").map(String::as_str) == Some("bridged")
        || device.get("network").is_some_and(|n| !n.is_empty())
}

/// Interface the device attaches to: the referenced network when set,
/// the raw parent otherwise.
pub fn device_parent(device: &DeviceConfig) -> Option<&str> {
    match device.get("network") {
        Some(network) if !network.is_empty() => Some(network.as_str()),
        _ => device.get("parent").map(String::as_str),
    }
}

/// Whether any device in the map attaches to the named network.
pub fn uses_network(
    devices: &BTreeMap<String, DeviceConfig>,
    network: &str,
) -> bool {
    devices.values().any(|dev| {
        dev.get("type").map(String::as_str) == Some("nic")
            && device_parent(dev) == Some(network)
    })
}
