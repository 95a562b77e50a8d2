// SPDX-License-Identifier: Apache-2.0

use tokio::sync::Mutex;

use super::NetworkController;
use crate::{
    node_config::is_node_specific, ErrorKind, NetplaneError, NetworkCreate,
    NotifyPolicy, PromotedNetwork, RequestContext, API_VERSION,
};

// Serializes all network creation on this node, cluster-notification
// creates included. Cluster-wide ordering is not enforced; racing
// node-specific defines are serialized by store uniqueness.
static CREATE_LOCK: Mutex<()> = Mutex::const_new(());

impl NetworkController {
    /// `POST networks`. Returns the location of the new network.
    ///
    /// Four shapes, decided in order: a cluster notification realizes
    /// the already-defined network locally; a `target` query records a
    /// pending per-node definition; a standalone deployment creates
    /// directly; a cluster promotes the pending definitions to created
    /// on every member.
    pub async fn networks_create(
        &self,
        req: NetworkCreate,
        ctx: &RequestContext,
    ) -> Result<String, NetplaneError> {
        let _lock = CREATE_LOCK.lock().await;

        if req.name.is_empty() {
            return Err(NetplaneError::new(
                ErrorKind::InvalidArgument,
                "No name provided".to_string(),
            ));
        }
        crate::validate_name(&req.name, req.network_type)?;

        let location = format!("/{}/networks/{}", API_VERSION, req.name);

        if ctx.cluster_notification {
            // Peer-driven realization of a network previously defined
            // on every node. Never touches the database.
            self.realize_network(&req.name, true).await?;
            return Ok(location);
        }

        if let Some(target) = ctx.target.as_deref() {
            self.create_pending(target, req).await?;
            return Ok(location);
        }

        if self.notifier.member_count().await? > 1 {
            self.networks_create_cluster(req).await?;
            return Ok(location);
        }

        self.networks_create_standalone(req).await?;
        Ok(location)
    }

    /// Record one node's definition without realizing anything.
    async fn create_pending(
        &self,
        target: &str,
        req: NetworkCreate,
    ) -> Result<(), NetplaneError> {
        for key in req.config.keys() {
            if !is_node_specific(key) {
                return Err(NetplaneError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "Config key {key:?} may not be used as \
                         node-specific key"
                    ),
                ));
            }
        }

        self.store
            .create_pending_network(
                target,
                &req.name,
                req.network_type,
                &req.config,
            )
            .await
            .map_err(|e| {
                if e.kind == ErrorKind::AlreadyDefined {
                    NetplaneError::new(
                        ErrorKind::AlreadyDefined,
                        format!(
                            "The network is already defined on node \
                             {target:?}"
                        ),
                    )
                } else {
                    e
                }
            })
    }

    async fn networks_create_standalone(
        &self,
        mut req: NetworkCreate,
    ) -> Result<(), NetplaneError> {
        self.drivers
            .fill_config(req.network_type, &mut req.config)
            .await?;

        let interfaces = self.store.list_interfaces().await?;
        if interfaces.iter().any(|iface| iface == &req.name) {
            return Err(NetplaneError::new(
                ErrorKind::InvalidArgument,
                "The network already exists".to_string(),
            ));
        }

        self.store
            .create_network(
                &req.name,
                &req.description,
                req.network_type,
                &req.config,
            )
            .await
            .map_err(|e| {
                NetplaneError::new(
                    e.kind,
                    format!(
                        "Error inserting {:?} into database: {e}",
                        req.name
                    ),
                )
            })?;

        // The record compensates a failed realization; a cluster
        // notification would keep it, a direct create must not.
        if let Err(e) = self.realize_network(&req.name, false).await {
            if let Err(delete_err) =
                self.store.delete_network(&req.name).await
            {
                log::error!(
                    "Failed to remove network {:?} from database after \
                     failed creation: {delete_err}",
                    req.name
                );
            }
            return Err(e);
        }

        Ok(())
    }

    /// Promote a fully defined pending network to created on every
    /// member: insert the global config, mark created, realize locally
    /// and fan out to all peers. Any failure past the status flip
    /// leaves the network in errored state for operators to reconcile.
    async fn networks_create_cluster(
        &self,
        mut req: NetworkCreate,
    ) -> Result<(), NetplaneError> {
        for key in req.config.keys() {
            if is_node_specific(key) {
                return Err(NetplaneError::new(
                    ErrorKind::InvalidArgument,
                    format!("Config key {key:?} is node-specific"),
                ));
            }
        }

        // The type must match what the per-node defines created. A
        // missing record is fine here, the promote batch checks it.
        match self.store.get_in_any_state(&req.name).await {
            Ok((_, record)) => {
                if record.network_type != req.network_type {
                    return Err(NetplaneError::new(
                        ErrorKind::InvalidArgument,
                        format!(
                            "Requested network type {} doesn't match type \
                             in existing database record {}",
                            req.network_type, record.network_type
                        ),
                    ));
                }
            }
            Err(e) if e.kind == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        self.drivers
            .fill_config(req.network_type, &mut req.config)
            .await?;

        let promoted = self
            .store
            .promote_network_globals(&req.name, &req.config)
            .await
            .map_err(|e| {
                if e.kind == ErrorKind::NotFound {
                    NetplaneError::new(
                        ErrorKind::InvalidArgument,
                        "Network not pending on any node (use --target \
                         <node> first)"
                            .to_string(),
                    )
                } else {
                    e
                }
            })?;

        // Created must be marked before realizing: the driver load on
        // this node and on every notified peer resolves the record by
        // name and would miss a pending one.
        self.store.mark_created(&req.name).await?;

        if let Err(e) = self.realize_cluster_wide(&req, &promoted).await {
            if let Err(mark_err) = self.store.mark_errored(&req.name).await {
                log::error!(
                    "Failed to mark network {:?} as errored: {mark_err}",
                    req.name
                );
            }
            return Err(e);
        }

        Ok(())
    }

    async fn realize_cluster_wide(
        &self,
        req: &NetworkCreate,
        promoted: &PromotedNetwork,
    ) -> Result<(), NetplaneError> {
        self.realize_network(&req.name, false).await?;

        for peer in self.notifier.peers(NotifyPolicy::All).await? {
            let mut peer_req = req.clone();
            if let Some(node_config) =
                promoted.node_configs.get(peer.server_name())
            {
                for (k, v) in node_config {
                    peer_req.config.insert(k.clone(), v.clone());
                }
            }
            peer.create_network(&peer_req).await?;
        }

        Ok(())
    }
}
