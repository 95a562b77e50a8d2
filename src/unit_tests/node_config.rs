// SPDX-License-Identifier: Apache-2.0

use crate::{is_node_specific, NODE_SPECIFIC_NETWORK_CONFIG};

#[test]
fn test_node_specific_keys() {
    assert!(is_node_specific("parent"));
    assert!(is_node_specific("vlan"));
    assert!(is_node_specific("bridge.external_interfaces"));
}

#[test]
fn test_global_keys() {
    assert!(!is_node_specific("ipv4.address"));
    assert!(!is_node_specific("ipv6.address"));
    assert!(!is_node_specific("dns.domain"));
}

#[test]
fn test_partition_is_consistent() {
    for key in NODE_SPECIFIC_NETWORK_CONFIG {
        assert!(is_node_specific(key));
    }
}
