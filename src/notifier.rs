// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;

use crate::{NetplaneError, NetworkCreate, NetworkLease};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Every member must take part; an unreachable peer aborts the
    /// whole fan-out.
    All,
    /// Down members are silently skipped.
    Alive,
}

/// Connection to one cluster peer, carrying the same network RPCs as
/// the local API. Calls arrive on the peer marked as cluster
/// notifications.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Server name the peer reports for itself.
    fn server_name(&self) -> &str;

    async fn create_network(
        &self,
        req: &NetworkCreate,
    ) -> Result<(), NetplaneError>;

    async fn delete_network(&self, name: &str) -> Result<(), NetplaneError>;

    async fn network_leases(
        &self,
        name: &str,
    ) -> Result<Vec<NetworkLease>, NetplaneError>;
}

/// Cluster membership and peer fan-out.
#[async_trait]
pub trait ClusterNotifier: Send + Sync {
    /// Number of cluster members, including this node.
    async fn member_count(&self) -> Result<usize, NetplaneError>;

    /// Peer handles matching the policy, excluding this node. With
    /// [NotifyPolicy::All] a down peer is still returned and surfaces
    /// as an RPC error on first use.
    async fn peers(
        &self,
        policy: NotifyPolicy,
    ) -> Result<Vec<Arc<dyn PeerClient>>, NetplaneError>;
}

/// Notifier of a standalone deployment: one member, no peers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleNodeNotifier;

#[async_trait]
impl ClusterNotifier for SingleNodeNotifier {
    async fn member_count(&self) -> Result<usize, NetplaneError> {
        Ok(1)
    }

    async fn peers(
        &self,
        _policy: NotifyPolicy,
    ) -> Result<Vec<Arc<dyn PeerClient>>, NetplaneError> {
        Ok(Vec::new())
    }
}
