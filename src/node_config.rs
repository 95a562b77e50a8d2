// SPDX-License-Identifier: Apache-2.0

/// Config keys whose value legitimately differs per cluster member:
/// physical bindings that depend on the host the network realizes on.
/// Every other key is cluster-global.
///
/// A node-specific key may only live in a per-node config row, a global
/// key only in the global row; the coordinators consult this set before
/// every config write.
pub const NODE_SPECIFIC_NETWORK_CONFIG: &[&str] =
    &["bridge.external_interfaces", "parent", "vlan"];

pub fn is_node_specific(key: &str) -> bool {
    NODE_SPECIFIC_NETWORK_CONFIG.contains(&key)
}
