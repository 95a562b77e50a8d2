// SPDX-License-Identifier: Apache-2.0

mod create;
mod delete;
mod leases;
mod query;
mod reconcile;
mod update;


use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    ClusterNotifier, DriverRegistry, HostInterfaces, InstanceProvider,
    NetplaneError, Network, NetworkStore,
};

/// Result of the network listing: URLs by default, full records when
/// recursion is requested.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkList {
    Urls(Vec<String>),
    Records(Vec<Network>),
}

/// The clustered network control plane: accepts declarative requests,
/// persists them through the store, realizes them through the drivers
/// and keeps the rest of the cluster in step through the notifier.
pub struct NetworkController {
    store: Arc<dyn NetworkStore>,
    drivers: Arc<dyn DriverRegistry>,
    notifier: Arc<dyn ClusterNotifier>,
    instances: Arc<dyn InstanceProvider>,
    host: Arc<dyn HostInterfaces>,
    state_dir: PathBuf,
}

impl NetworkController {
    pub fn new(
        store: Arc<dyn NetworkStore>,
        drivers: Arc<dyn DriverRegistry>,
        notifier: Arc<dyn ClusterNotifier>,
        instances: Arc<dyn InstanceProvider>,
        host: Arc<dyn HostInterfaces>,
        state_dir: &Path,
    ) -> Self {
        Self {
            store,
            drivers,
            notifier,
            instances,
            host,
            state_dir: state_dir.to_path_buf(),
        }
    }

    pub(crate) async fn is_clustered(&self) -> Result<bool, NetplaneError> {
        Ok(self.notifier.member_count().await? > 1)
    }

    /// On-disk artifact directory of one network; its contents are
    /// owned by the driver.
    pub(crate) fn network_dir(&self, name: &str) -> PathBuf {
        self.state_dir.join("networks").join(name)
    }

    /// Realize a defined network on this host: validate the full
    /// merged config, run the driver's creation setup, bring it up.
    /// A failed start tears the creation down again.
    pub(crate) async fn realize_network(
        &self,
        name: &str,
        cluster_notification: bool,
    ) -> Result<(), NetplaneError> {
        let driver = self.drivers.load_by_name(name).await?;

        driver.validate(driver.config()).await?;

        driver.create(cluster_notification).await?;

        if let Err(e) = driver.start().await {
            if let Err(delete_err) = driver.delete(cluster_notification).await
            {
                log::warn!(
                    "Failed to delete network {name:?} after failed start: \
                     {delete_err}"
                );
            }
            return Err(e);
        }

        Ok(())
    }
}
