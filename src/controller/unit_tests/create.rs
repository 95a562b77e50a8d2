// SPDX-License-Identifier: Apache-2.0

use super::{btree, new_env, seed_clustered_network};
use super::mocks::MockPeer;
use crate::{
    ErrorKind, NetworkCreate, NetworkStatus, NetworkStore, NetworkType,
    RequestContext,
};

fn create_req(name: &str, config: &[(&str, &str)]) -> NetworkCreate {
    NetworkCreate {
        name: name.to_string(),
        config: btree(config),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_standalone_create() {
    let env = new_env("node1", Vec::new());
    let req = create_req("br0", &[("ipv4.address", "10.0.0.1/24")]);

    let location = env
        .controller
        .networks_create(req, &RequestContext::default())
        .await
        .unwrap();
    assert_eq!(location, "/1.0/networks/br0");

    let (_, record) = env.store.get_in_any_state("br0").await.unwrap();
    assert_eq!(record.status, NetworkStatus::Created);
    assert_eq!(
        record.config.get("ipv4.address").map(String::as_str),
        Some("10.0.0.1/24")
    );
    assert_eq!(
        env.registry.driver_calls(),
        vec![
            "validate br0".to_string(),
            "create br0 notification=false".to_string(),
            "start br0".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_standalone_create_fills_defaults() {
    let env = new_env("node1", Vec::new());
    env.registry.set_default("ipv4.nat", "true");

    env.controller
        .networks_create(create_req("br0", &[]), &RequestContext::default())
        .await
        .unwrap();

    let (_, record) = env.store.get_in_any_state("br0").await.unwrap();
    assert_eq!(
        record.config.get("ipv4.nat").map(String::as_str),
        Some("true")
    );
}

#[tokio::test]
async fn test_create_requires_name() {
    let env = new_env("node1", Vec::new());

    let e = env
        .controller
        .networks_create(create_req("", &[]), &RequestContext::default())
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_create_rejects_existing_interface_name() {
    let env = new_env("node1", Vec::new());
    env.store.set_host_interfaces(vec!["eth0".to_string()]);

    let e = env
        .controller
        .networks_create(create_req("eth0", &[]), &RequestContext::default())
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::InvalidArgument);
    assert_eq!(e.msg, "The network already exists");
}

#[tokio::test]
async fn test_standalone_create_start_failure_removes_record() {
    let env = new_env("node1", Vec::new());
    env.registry.fail_start_on("br0");

    let e = env
        .controller
        .networks_create(create_req("br0", &[]), &RequestContext::default())
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::DriverError);

    // Compensation: the record is gone and the driver tore down.
    let lookup = env.store.get_in_any_state("br0").await;
    assert_eq!(lookup.unwrap_err().kind, ErrorKind::NotFound);
    assert!(env
        .registry
        .driver_calls()
        .contains(&"delete br0 notification=false".to_string()));
}

#[tokio::test]
async fn test_concurrent_creates_same_name() {
    let env = new_env("node1", Vec::new());
    let req = create_req("br0", &[]);
    let ctx = RequestContext::default();

    let (a, b) = tokio::join!(
        env.controller.networks_create(req.clone(), &ctx),
        env.controller.networks_create(req.clone(), &ctx),
    );

    let succeeded = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    let failed = if a.is_err() { a } else { b };
    assert_eq!(failed.unwrap_err().kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_notification_create_never_writes_database() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer]);
    seed_clustered_network(
        &env.store,
        "br1",
        &[("node1", &[("parent", "eth1")]), ("node2", &[])],
        &[("ipv4.address", "10.1.1.1/24")],
    )
    .await;
    let before = env.store.get_in_any_state("br1").await.unwrap();

    env.controller
        .networks_create(
            create_req("br1", &[]),
            &RequestContext::notification(),
        )
        .await
        .unwrap();

    assert_eq!(env.store.get_in_any_state("br1").await.unwrap(), before);
    assert!(env
        .registry
        .driver_calls()
        .contains(&"create br1 notification=true".to_string()));
}

#[tokio::test]
async fn test_pending_define_rejects_global_key() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer]);

    let e = env
        .controller
        .networks_create(
            create_req("br2", &[("ipv4.address", "10.1.0.1/24")]),
            &RequestContext::with_target("node1"),
        )
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::InvalidArgument);
    assert!(e.msg.contains("may not be used as node-specific key"));
}

#[tokio::test]
async fn test_pending_define_records_node() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer]);

    env.controller
        .networks_create(
            create_req("br1", &[("parent", "eth1")]),
            &RequestContext::with_target("node1"),
        )
        .await
        .unwrap();

    let (_, record) = env.store.get_in_any_state("br1").await.unwrap();
    assert_eq!(record.status, NetworkStatus::Pending);
    assert_eq!(record.locations, vec!["node1".to_string()]);

    // Defining the same node twice is refused, naming the node.
    let e = env
        .controller
        .networks_create(
            create_req("br1", &[("parent", "eth1")]),
            &RequestContext::with_target("node1"),
        )
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::AlreadyDefined);
    assert!(e.msg.contains("node1"));
    assert_eq!(e.kind.http_status(), 400);
}

#[tokio::test]
async fn test_cluster_promote() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer.clone()]);

    for (node, parent) in [("node1", "eth1"), ("node2", "eth2")] {
        env.controller
            .networks_create(
                create_req("br1", &[("parent", parent)]),
                &RequestContext::with_target(node),
            )
            .await
            .unwrap();
    }

    env.controller
        .networks_create(
            create_req("br1", &[("ipv4.address", "10.1.1.1/24")]),
            &RequestContext::default(),
        )
        .await
        .unwrap();

    let (_, record) = env.store.get_in_any_state("br1").await.unwrap();
    assert_eq!(record.status, NetworkStatus::Created);
    // Local realization saw this node's merged config.
    assert_eq!(
        record.config.get("parent").map(String::as_str),
        Some("eth1")
    );
    assert!(env
        .registry
        .driver_calls()
        .contains(&"create br1 notification=false".to_string()));

    // The peer got the global config merged with its own node row.
    let peer_reqs = peer.created();
    assert_eq!(peer_reqs.len(), 1);
    assert_eq!(
        peer_reqs[0].config.get("parent").map(String::as_str),
        Some("eth2")
    );
    assert_eq!(
        peer_reqs[0].config.get("ipv4.address").map(String::as_str),
        Some("10.1.1.1/24")
    );
}

#[tokio::test]
async fn test_cluster_promote_rejects_node_specific_key() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer]);

    let e = env
        .controller
        .networks_create(
            create_req("br1", &[("parent", "eth0")]),
            &RequestContext::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::InvalidArgument);
    assert!(e.msg.contains("is node-specific"));
}

#[tokio::test]
async fn test_cluster_promote_requires_pending_definitions() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer]);

    let e = env
        .controller
        .networks_create(create_req("br9", &[]), &RequestContext::default())
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::InvalidArgument);
    assert!(e.msg.contains("--target"));
}

#[tokio::test]
async fn test_cluster_promote_type_mismatch() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer]);
    env.controller
        .networks_create(
            create_req("br1", &[("parent", "eth1")]),
            &RequestContext::with_target("node1"),
        )
        .await
        .unwrap();

    let req = NetworkCreate {
        name: "br1".to_string(),
        network_type: NetworkType::Macvlan,
        ..Default::default()
    };
    let e = env
        .controller
        .networks_create(req, &RequestContext::default())
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::InvalidArgument);
    assert!(e.msg.contains("doesn't match"));
}

#[tokio::test]
async fn test_cluster_promote_peer_failure_marks_errored() {
    let peer = MockPeer::new("node2");
    let env = new_env("node1", vec![peer.clone()]);

    for (node, parent) in [("node1", "eth1"), ("node2", "eth2")] {
        env.controller
            .networks_create(
                create_req("br1", &[("parent", parent)]),
                &RequestContext::with_target(node),
            )
            .await
            .unwrap();
    }
    peer.fail_create();

    let e = env
        .controller
        .networks_create(create_req("br1", &[]), &RequestContext::default())
        .await
        .unwrap_err();
    assert_eq!(e.kind, ErrorKind::PeerUnreachable);

    // Compensation keeps the record around for operators, flipped to
    // errored.
    let (_, record) = env.store.get_in_any_state("br1").await.unwrap();
    assert_eq!(record.status, NetworkStatus::Errored);
}
