// SPDX-License-Identifier: Apache-2.0

mod controller;
mod driver;
mod error;
mod etag;
mod host;
mod instance;
mod lease;
mod network;
mod node_config;
mod notifier;
mod request;
mod store;


pub use self::controller::{NetworkController, NetworkList};
pub use self::driver::{DriverRegistry, NetworkDriver};
pub use self::error::{ErrorKind, NetplaneError};
pub use self::etag::etag_hash;
pub use self::host::{
    HostInterfaces, InterfaceCounters, InterfaceState, SysfsHost,
};
pub use self::instance::{
    device_parent, is_bridged_nic, uses_network, DeviceConfig, Instance,
    InstanceProvider, Profile,
};
pub use self::lease::{
    lease_hwaddr, mac_from_raw, parse_dnsmasq_leases, DnsmasqLeaseEntry,
    LeaseType, NetworkLease,
};
pub use self::network::{
    validate_name, Network, NetworkCreate, NetworkRename, NetworkStatus,
    NetworkType, NetworkUpdate, API_VERSION, PROJECT_DEFAULT,
};
pub use self::node_config::{is_node_specific, NODE_SPECIFIC_NETWORK_CONFIG};
pub use self::notifier::{
    ClusterNotifier, NotifyPolicy, PeerClient, SingleNodeNotifier,
};
pub use self::request::{Method, RequestContext};
pub use self::store::{
    MemoryNetworkStore, NetworkRecord, NetworkStore, PromotedNetwork,
};
