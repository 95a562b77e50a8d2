// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{NetplaneError, NetworkType, NetworkUpdate};

/// Realization backend of one managed network.
///
/// The control plane never interprets driver-specific config keys; it
/// only sequences these capabilities. Drivers that persist state are
/// handed the cluster-notification flag so they know whether this node
/// owns the database write and the cluster fan-out for the operation.
#[async_trait]
pub trait NetworkDriver: Send + Sync {
    fn name(&self) -> &str;

    fn network_type(&self) -> NetworkType;

    /// Current merged config: global row plus this node's row.
    fn config(&self) -> &BTreeMap<String, String>;

    async fn validate(
        &self,
        config: &BTreeMap<String, String>,
    ) -> Result<(), NetplaneError>;

    /// Initial creation setup on this host.
    async fn create(
        &self,
        cluster_notification: bool,
    ) -> Result<(), NetplaneError>;

    async fn start(&self) -> Result<(), NetplaneError>;

    async fn stop(&self) -> Result<(), NetplaneError>;

    /// Persist and apply a config change. The driver writes the
    /// appropriate row(s) and, for global edits, re-enters the cluster
    /// notifier itself.
    async fn update(
        &self,
        req: &NetworkUpdate,
        target: Option<&str>,
        cluster_notification: bool,
    ) -> Result<(), NetplaneError>;

    async fn delete(
        &self,
        cluster_notification: bool,
    ) -> Result<(), NetplaneError>;

    /// Single-node only; renames the database record then the host
    /// artifacts.
    async fn rename(&self, new_name: &str) -> Result<(), NetplaneError>;

    async fn is_used(&self) -> Result<bool, NetplaneError>;

    /// MAC canonicalizer used when parsing this driver's leases file.
    fn normalize_hwaddr(&self, raw: &str) -> String {
        crate::lease::mac_from_raw(raw)
    }
}

#[async_trait]
pub trait DriverRegistry: Send + Sync {
    /// Resolve a managed network name to its driver. The returned
    /// driver is loaded with the network's current merged config.
    async fn load_by_name(
        &self,
        name: &str,
    ) -> Result<Box<dyn NetworkDriver>, NetplaneError>;

    /// Populate driver-chosen defaults into a create request before
    /// validation.
    async fn fill_config(
        &self,
        network_type: NetworkType,
        config: &mut BTreeMap<String, String>,
    ) -> Result<(), NetplaneError>;
}
