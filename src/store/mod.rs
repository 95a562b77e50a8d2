// SPDX-License-Identifier: Apache-2.0

mod memory;

pub use self::memory::MemoryNetworkStore;

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{NetplaneError, NetworkStatus, NetworkType, Profile};

/// A network definition as persisted: the global config row merged
/// with this node's row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct NetworkRecord {
    pub name: String,
    pub description: String,
    pub network_type: NetworkType,
    pub status: NetworkStatus,
    /// Members holding a pending or created record of this network.
    pub locations: Vec<String>,
    pub config: BTreeMap<String, String>,
}

/// Result of the promote batch: everything the creation coordinator
/// needs to realize the network locally and fan out to peers.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct PromotedNetwork {
    pub network_id: i64,
    /// Node-specific config rows, keyed by member name.
    pub node_configs: HashMap<String, BTreeMap<String, String>>,
    pub local_node: String,
}

/// Transactional persistence of network definitions. Each call is one
/// transaction unless documented as a batch.
///
/// Errors are distinguished by kind: `NotFound` for missing records,
/// `AlreadyDefined` when a pending row already exists for the same
/// `(name, node)` pair, anything else is a transactional failure.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    /// Fetch a network regardless of its lifecycle status.
    async fn get_in_any_state(
        &self,
        name: &str,
    ) -> Result<(i64, NetworkRecord), NetplaneError>;

    /// Union of host interface names and managed network names.
    async fn list_interfaces(&self) -> Result<Vec<String>, NetplaneError>;

    /// Record a node's definition of a not-yet-created network. The
    /// network row is created with status pending on first use; the
    /// type must match on subsequent members.
    async fn create_pending_network(
        &self,
        node: &str,
        name: &str,
        network_type: NetworkType,
        config: &BTreeMap<String, String>,
    ) -> Result<(), NetplaneError>;

    /// Single-member create: inserts the definition with its global
    /// config row, already in created status.
    async fn create_network(
        &self,
        name: &str,
        description: &str,
        network_type: NetworkType,
        config: &BTreeMap<String, String>,
    ) -> Result<i64, NetplaneError>;

    /// Node-specific config rows of a network, keyed by member name.
    async fn network_node_configs(
        &self,
        network_id: i64,
    ) -> Result<HashMap<String, BTreeMap<String, String>>, NetplaneError>;

    async fn network_id(&self, name: &str) -> Result<i64, NetplaneError>;

    /// Insert config keys into the given node's row, or the global row
    /// when `node` is `None`.
    async fn create_network_config(
        &self,
        network_id: i64,
        node: Option<&str>,
        config: &BTreeMap<String, String>,
    ) -> Result<(), NetplaneError>;

    async fn mark_created(&self, name: &str) -> Result<(), NetplaneError>;

    async fn mark_errored(&self, name: &str) -> Result<(), NetplaneError>;

    async fn delete_network(&self, name: &str) -> Result<(), NetplaneError>;

    async fn get_local_node_name(&self) -> Result<String, NetplaneError>;

    /// Names of managed networks excluding pending ones.
    async fn list_non_pending(&self) -> Result<Vec<String>, NetplaneError>;

    /// Names of all managed networks.
    async fn list_all(&self) -> Result<Vec<String>, NetplaneError>;

    async fn load_profiles(&self) -> Result<Vec<Profile>, NetplaneError>;

    /// Promote batch: resolve the network id, fetch the node-specific
    /// configs, note the local node name and insert the global config
    /// row. The default body composes the granular operations;
    /// transactional stores should override it to run in a single
    /// transaction.
    async fn promote_network_globals(
        &self,
        name: &str,
        config: &BTreeMap<String, String>,
    ) -> Result<PromotedNetwork, NetplaneError> {
        let network_id = self.network_id(name).await?;
        let node_configs = self.network_node_configs(network_id).await?;
        let local_node = self.get_local_node_name().await?;
        self.create_network_config(network_id, None, config).await?;
        Ok(PromotedNetwork {
            network_id,
            node_configs,
            local_node,
        })
    }
}
