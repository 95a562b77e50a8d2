// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use super::NetworkController;
use crate::{
    device_parent, is_bridged_nic, lease::parse_dnsmasq_leases,
    lease_hwaddr, ErrorKind, LeaseType, NetplaneError, NetworkLease,
    NotifyPolicy, RequestContext,
};

impl NetworkController {
    /// `GET networks/{name}/leases`. Merges static leases derived from
    /// the project's instance NIC configs with dynamic leases from the
    /// DHCP leases file of every member, deduplicated on
    /// `(hwaddr, address)` and restricted to the requesting project's
    /// MACs. A cluster-notification call returns only the local
    /// dynamic leases for the caller to aggregate.
    pub async fn network_leases(
        &self,
        name: &str,
        ctx: &RequestContext,
    ) -> Result<Vec<NetworkLease>, NetplaneError> {
        let network = self.resolve_network(name).await?;
        if !network.managed || network.network_type != "bridge" {
            return Err(NetplaneError::new(
                ErrorKind::NotFound,
                "Leases not found".to_string(),
            ));
        }

        let mut leases: Vec<NetworkLease> = Vec::new();
        let mut project_macs: HashSet<String> = HashSet::new();

        if !ctx.cluster_notification {
            for instance in
                self.instances.load_by_project(ctx.project()).await?
            {
                for (dev_name, dev) in &instance.expanded_devices {
                    if !is_bridged_nic(dev) {
                        continue;
                    }
                    if device_parent(dev) != Some(name) {
                        continue;
                    }

                    let mut hwaddr =
                        dev.get("hwaddr").cloned().unwrap_or_default();
                    if hwaddr.is_empty() {
                        hwaddr = instance
                            .local_config
                            .get(&format!("volatile.{dev_name}.hwaddr"))
                            .cloned()
                            .unwrap_or_default();
                    }
                    if !hwaddr.is_empty() {
                        project_macs.insert(hwaddr.clone());
                    }

                    for key in ["ipv4.address", "ipv6.address"] {
                        let Some(address) = dev.get(key) else {
                            continue;
                        };
                        if address.is_empty() {
                            continue;
                        }
                        leases.push(NetworkLease {
                            hostname: instance.name.clone(),
                            address: address.clone(),
                            hwaddr: hwaddr.clone(),
                            lease_type: LeaseType::Static,
                            location: instance.location.clone(),
                        });
                    }
                }
            }
        }

        let server_name = self.store.get_local_node_name().await?;
        self.collect_dynamic_leases(name, &server_name, &mut leases)
            .await?;

        if !ctx.cluster_notification {
            for peer in self.notifier.peers(NotifyPolicy::Alive).await? {
                leases.extend(peer.network_leases(name).await?);
            }

            leases.retain(|lease| project_macs.contains(&lease.hwaddr));
        }

        Ok(leases)
    }

    /// Parse this node's dnsmasq leases file, skipping entries already
    /// represented by a static `(hwaddr, address)` pair. A missing
    /// file just means no dynamic leases yet.
    async fn collect_dynamic_leases(
        &self,
        name: &str,
        server_name: &str,
        leases: &mut Vec<NetworkLease>,
    ) -> Result<(), NetplaneError> {
        let lease_file = self.network_dir(name).join("dnsmasq.leases");
        if !lease_file.exists() {
            return Ok(());
        }

        let content =
            std::fs::read_to_string(&lease_file).map_err(|e| {
                NetplaneError::new(
                    ErrorKind::Bug,
                    format!(
                        "Failed to read lease file {}: {e}",
                        lease_file.display()
                    ),
                )
            })?;

        let driver = self.drivers.load_by_name(name).await?;

        for entry in parse_dnsmasq_leases(&content) {
            let hwaddr = lease_hwaddr(
                driver.normalize_hwaddr(entry.hwaddr_raw),
                entry.client_id,
            );

            if leases.iter().any(|lease| {
                lease.hwaddr == hwaddr && lease.address == entry.address
            }) {
                continue;
            }

            leases.push(NetworkLease {
                hostname: entry.hostname.to_string(),
                address: entry.address.to_string(),
                hwaddr,
                lease_type: LeaseType::Dynamic,
                location: server_name.to_string(),
            });
        }

        Ok(())
    }
}
