// SPDX-License-Identifier: Apache-2.0

use super::{NetworkController, NetworkList};
use crate::{
    etag_hash, node_config::is_node_specific, uses_network, ErrorKind,
    InterfaceState, NetplaneError, Network, RequestContext, API_VERSION,
    PROJECT_DEFAULT,
};

impl NetworkController {
    /// `GET networks`. Non-recursive listings return URLs only;
    /// recursive ones resolve each name to a full record, skipping
    /// names that fail to resolve.
    pub async fn networks_list(
        &self,
        recursive: bool,
    ) -> Result<NetworkList, NetplaneError> {
        let interfaces = self.store.list_interfaces().await?;

        if !recursive {
            return Ok(NetworkList::Urls(
                interfaces
                    .iter()
                    .map(|name| format!("/{API_VERSION}/networks/{name}"))
                    .collect(),
            ));
        }

        let mut records = Vec::new();
        for name in interfaces {
            match self.resolve_network(&name).await {
                Ok(network) => records.push(network),
                Err(e) => {
                    log::debug!(
                        "Skipping network {name:?} in listing: {e}"
                    );
                }
            }
        }
        Ok(NetworkList::Records(records))
    }

    /// `GET networks/{name}`. Returns the record and its ETag. On a
    /// clustered deployment an untargeted fetch strips node-specific
    /// keys, so the config reads the same from any member.
    pub async fn network_get(
        &self,
        name: &str,
        ctx: &RequestContext,
    ) -> Result<(Network, String), NetplaneError> {
        let mut network = self.resolve_network(name).await?;

        if ctx.target.is_none() && self.is_clustered().await? {
            network.config.retain(|k, _| !is_node_specific(k));
        }

        let etag = etag_hash(&(
            &network.name,
            network.managed,
            &network.network_type,
            &network.description,
            &network.config,
        ))?;

        Ok((network, etag))
    }

    /// Resolve a name into a network record: the database definition
    /// for managed networks, a probed classification for plain host
    /// interfaces.
    pub(crate) async fn resolve_network(
        &self,
        name: &str,
    ) -> Result<Network, NetplaneError> {
        // Ignore veth pairs (for performance reasons).
        if name.starts_with("veth") {
            return Err(NetplaneError::new(
                ErrorKind::NotFound,
                format!("Network {name:?} not found"),
            ));
        }

        let on_host = self.host.interface_exists(name);
        let db_record = match self.store.get_in_any_state(name).await {
            Ok((_, record)) => Some(record),
            Err(e) if e.kind == ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        if !on_host && db_record.is_none() {
            return Err(NetplaneError::new(
                ErrorKind::NotFound,
                format!("Network {name:?} not found"),
            ));
        }

        let mut network = Network {
            name: name.to_string(),
            ..Default::default()
        };

        if on_host && self.host.is_loopback(name) {
            network.network_type = "loopback".to_string();
        } else if let Some(record) = &db_record {
            network.managed = true;
            network.description = record.description.clone();
            network.config = record.config.clone();
            network.network_type = record.network_type.to_string();
        } else if self.host.has_bridge_attr(name) {
            network.network_type = "bridge".to_string();
        } else if self.host.has_vlan_entry(name) {
            network.network_type = "vlan".to_string();
        } else if self.host.has_device_attr(name) {
            network.network_type = "physical".to_string();
        } else if self.host.has_bonding_attr(name) {
            network.network_type = "bond".to_string();
        } else if self.host.ovs_bridge_exists(name) {
            network.network_type = "bridge".to_string();
        } else {
            network.network_type = "unknown".to_string();
        }

        if network.network_type != "loopback" {
            for instance in self.instances.load_all_projects().await? {
                if uses_network(&instance.expanded_devices, name) {
                    let mut uri = format!(
                        "/{API_VERSION}/instances/{}",
                        instance.name
                    );
                    if instance.project != PROJECT_DEFAULT {
                        uri.push_str(&format!(
                            "?project={}",
                            instance.project
                        ));
                    }
                    network.used_by.push(uri);
                }
            }

            for profile in self.store.load_profiles().await? {
                if uses_network(&profile.devices, name) {
                    let mut uri = format!(
                        "/{API_VERSION}/profiles/{}",
                        profile.name
                    );
                    if profile.project != PROJECT_DEFAULT {
                        uri.push_str(&format!(
                            "?project={}",
                            profile.project
                        ));
                    }
                    network.used_by.push(uri);
                }
            }
        }

        if let Some(record) = db_record {
            network.status = Some(record.status);
            network.locations = record.locations;
        }

        Ok(network)
    }

    /// `GET networks/{name}/state`: runtime state of the backing host
    /// interface.
    pub async fn network_state(
        &self,
        name: &str,
    ) -> Result<InterfaceState, NetplaneError> {
        self.host.interface_state(name).ok_or_else(|| {
            NetplaneError::new(
                ErrorKind::NotFound,
                format!("Interface {name:?} not found"),
            )
        })
    }
}
