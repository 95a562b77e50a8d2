// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{NetworkRecord, NetworkStore};
use crate::{
    node_config::is_node_specific, ErrorKind, NetplaneError, NetworkStatus,
    NetworkType, Profile,
};

#[derive(Debug, Clone)]
struct StoredNetwork {
    id: i64,
    description: String,
    network_type: NetworkType,
    status: NetworkStatus,
    global: BTreeMap<String, String>,
    nodes: HashMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    networks: BTreeMap<String, StoredNetwork>,
    profiles: Vec<Profile>,
    host_interfaces: Vec<String>,
}

/// In-process [NetworkStore] for standalone deployments and tests; a
/// clustered deployment backs the trait with its database engine.
#[derive(Debug)]
pub struct MemoryNetworkStore {
    local_node: String,
    inner: Mutex<Inner>,
}

impl MemoryNetworkStore {
    pub fn new(local_node: &str) -> Self {
        Self {
            local_node: local_node.to_string(),
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Seed the host interface names reported by `list_interfaces`.
    pub fn set_host_interfaces(&self, interfaces: Vec<String>) {
        self.lock().host_interfaces = interfaces;
    }

    pub fn set_profiles(&self, profiles: Vec<Profile>) {
        self.lock().profiles = profiles;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens when a holder panicked; the data
        // is a plain map, so keep serving it.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn not_found(name: &str) -> NetplaneError {
        NetplaneError::new(
            ErrorKind::NotFound,
            format!("Network {name:?} not found"),
        )
    }

    fn record(&self, name: &str, net: &StoredNetwork) -> NetworkRecord {
        let mut config = net.global.clone();
        if let Some(node_cfg) = net.nodes.get(&self.local_node) {
            for (k, v) in node_cfg {
                config.insert(k.clone(), v.clone());
            }
        }
        let mut locations: Vec<String> = net.nodes.keys().cloned().collect();
        locations.sort_unstable();
        NetworkRecord {
            name: name.to_string(),
            description: net.description.clone(),
            network_type: net.network_type,
            status: net.status,
            locations,
            config,
        }
    }
}

#[async_trait]
impl NetworkStore for MemoryNetworkStore {
    async fn get_in_any_state(
        &self,
        name: &str,
    ) -> Result<(i64, NetworkRecord), NetplaneError> {
        let inner = self.lock();
        let net = inner.networks.get(name).ok_or_else(|| {
            Self::not_found(name)
        })?;
        Ok((net.id, self.record(name, net)))
    }

    async fn list_interfaces(&self) -> Result<Vec<String>, NetplaneError> {
        let inner = self.lock();
        let mut names = inner.host_interfaces.clone();
        for name in inner.networks.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }

    async fn create_pending_network(
        &self,
        node: &str,
        name: &str,
        network_type: NetworkType,
        config: &BTreeMap<String, String>,
    ) -> Result<(), NetplaneError> {
        let mut inner = self.lock();
        if let Some(net) = inner.networks.get_mut(name) {
            if net.network_type != network_type {
                return Err(NetplaneError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "Network {name:?} is of type {} not {network_type}",
                        net.network_type
                    ),
                ));
            }
            if net.nodes.contains_key(node) {
                return Err(NetplaneError::new(
                    ErrorKind::AlreadyDefined,
                    format!(
                        "Network {name:?} is already defined on node {node:?}"
                    ),
                ));
            }
            net.nodes.insert(node.to_string(), config.clone());
            return Ok(());
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let mut nodes = HashMap::new();
        nodes.insert(node.to_string(), config.clone());
        inner.networks.insert(
            name.to_string(),
            StoredNetwork {
                id,
                description: String::new(),
                network_type,
                status: NetworkStatus::Pending,
                global: BTreeMap::new(),
                nodes,
            },
        );
        Ok(())
    }

    async fn create_network(
        &self,
        name: &str,
        description: &str,
        network_type: NetworkType,
        config: &BTreeMap<String, String>,
    ) -> Result<i64, NetplaneError> {
        let mut inner = self.lock();
        if inner.networks.contains_key(name) {
            return Err(NetplaneError::new(
                ErrorKind::Conflict,
                format!("Network {name:?} already exists"),
            ));
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let mut global = BTreeMap::new();
        let mut node_cfg = BTreeMap::new();
        for (k, v) in config {
            if is_node_specific(k) {
                node_cfg.insert(k.clone(), v.clone());
            } else {
                global.insert(k.clone(), v.clone());
            }
        }
        let mut nodes = HashMap::new();
        nodes.insert(self.local_node.clone(), node_cfg);
        inner.networks.insert(
            name.to_string(),
            StoredNetwork {
                id,
                description: description.to_string(),
                network_type,
                status: NetworkStatus::Created,
                global,
                nodes,
            },
        );
        Ok(id)
    }

    async fn network_node_configs(
        &self,
        network_id: i64,
    ) -> Result<HashMap<String, BTreeMap<String, String>>, NetplaneError>
    {
        let inner = self.lock();
        for net in inner.networks.values() {
            if net.id == network_id {
                return Ok(net.nodes.clone());
            }
        }
        Err(NetplaneError::new(
            ErrorKind::NotFound,
            format!("Network with id {network_id} not found"),
        ))
    }

    async fn network_id(&self, name: &str) -> Result<i64, NetplaneError> {
        let inner = self.lock();
        inner
            .networks
            .get(name)
            .map(|net| net.id)
            .ok_or_else(|| Self::not_found(name))
    }

    async fn create_network_config(
        &self,
        network_id: i64,
        node: Option<&str>,
        config: &BTreeMap<String, String>,
    ) -> Result<(), NetplaneError> {
        let mut inner = self.lock();
        for net in inner.networks.values_mut() {
            if net.id != network_id {
                continue;
            }
            match node {
                None => {
                    for (k, v) in config {
                        net.global.insert(k.clone(), v.clone());
                    }
                }
                Some(node) => {
                    let row = net.nodes.entry(node.to_string()).or_default();
                    for (k, v) in config {
                        row.insert(k.clone(), v.clone());
                    }
                }
            }
            return Ok(());
        }
        Err(NetplaneError::new(
            ErrorKind::NotFound,
            format!("Network with id {network_id} not found"),
        ))
    }

    async fn mark_created(&self, name: &str) -> Result<(), NetplaneError> {
        let mut inner = self.lock();
        let net = inner
            .networks
            .get_mut(name)
            .ok_or_else(|| Self::not_found(name))?;
        net.status = NetworkStatus::Created;
        Ok(())
    }

    async fn mark_errored(&self, name: &str) -> Result<(), NetplaneError> {
        let mut inner = self.lock();
        let net = inner
            .networks
            .get_mut(name)
            .ok_or_else(|| Self::not_found(name))?;
        net.status = NetworkStatus::Errored;
        Ok(())
    }

    async fn delete_network(&self, name: &str) -> Result<(), NetplaneError> {
        let mut inner = self.lock();
        if inner.networks.remove(name).is_none() {
            return Err(Self::not_found(name));
        }
        Ok(())
    }

    async fn get_local_node_name(&self) -> Result<String, NetplaneError> {
        Ok(self.local_node.clone())
    }

    async fn list_non_pending(&self) -> Result<Vec<String>, NetplaneError> {
        let inner = self.lock();
        Ok(inner
            .networks
            .iter()
            .filter(|(_, net)| net.status != NetworkStatus::Pending)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<String>, NetplaneError> {
        let inner = self.lock();
        Ok(inner.networks.keys().cloned().collect())
    }

    async fn load_profiles(&self) -> Result<Vec<Profile>, NetplaneError> {
        Ok(self.lock().profiles.clone())
    }
}
