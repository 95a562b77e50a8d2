// SPDX-License-Identifier: Apache-2.0

use super::NetworkController;
use crate::{
    ErrorKind, NetplaneError, NetworkRename, NetworkStatus, NotifyPolicy,
    RequestContext, API_VERSION,
};

impl NetworkController {
    /// `DELETE networks/{name}`. A pending network only has database
    /// rows to remove; anything realized is torn down on every member
    /// first, then locally, then its artifact directory goes.
    pub async fn network_delete(
        &self,
        name: &str,
        ctx: &RequestContext,
    ) -> Result<(), NetplaneError> {
        let (_, record) = self.store.get_in_any_state(name).await?;
        if record.status == NetworkStatus::Pending {
            return self.store.delete_network(name).await;
        }

        let driver = self.drivers.load_by_name(name).await?;

        if !ctx.cluster_notification {
            if driver.is_used().await? {
                return Err(NetplaneError::new(
                    ErrorKind::InvalidArgument,
                    "The network is currently in use".to_string(),
                ));
            }

            for peer in self.notifier.peers(NotifyPolicy::All).await? {
                peer.delete_network(name).await?;
            }
        }

        driver.delete(ctx.cluster_notification).await?;

        let dir = self.network_dir(name);
        if dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                log::warn!(
                    "Failed to remove directory {}: {e}",
                    dir.display()
                );
            }
        }

        Ok(())
    }

    /// `POST networks/{name}` (rename). Standalone only: renaming
    /// depends on the database record already carrying the new name
    /// when the driver starts, which cannot be sequenced across
    /// cluster notifications.
    pub async fn network_rename(
        &self,
        name: &str,
        req: NetworkRename,
    ) -> Result<String, NetplaneError> {
        if self.is_clustered().await? {
            return Err(NetplaneError::new(
                ErrorKind::InvalidArgument,
                "Renaming a network not supported in clusters".to_string(),
            ));
        }

        let driver = self.drivers.load_by_name(name).await?;

        if req.name.is_empty() {
            return Err(NetplaneError::new(
                ErrorKind::InvalidArgument,
                "No name provided".to_string(),
            ));
        }
        crate::validate_name(&req.name, driver.network_type())?;

        let interfaces = self.store.list_interfaces().await?;
        if interfaces.iter().any(|iface| iface == &req.name) {
            return Err(NetplaneError::new(
                ErrorKind::Conflict,
                format!("Network {:?} already exists", req.name),
            ));
        }

        driver.rename(&req.name).await?;

        Ok(format!("/{}/networks/{}", API_VERSION, req.name))
    }
}
