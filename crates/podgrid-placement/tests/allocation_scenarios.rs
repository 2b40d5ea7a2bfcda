//! End-to-end allocation scenarios.
//!
//! Drives the pod-level entry points the way the scheduler does: build a
//! node and its bound pods, ask for a proposal, commit it onto a pod, and
//! ask again.

use podgrid_core::*;
use podgrid_placement::*;

fn pending(name: &str, cores: u64, mode: NetworkMode) -> Pod {
    Pod {
        name: name.to_string(),
        spec: PodSpec {
            containers: vec![Container {
                name: "main".to_string(),
                cpu_millis: cores * MILLICORES_PER_CORE,
            }],
            network_mode: mode,
        },
        status: PodStatus::default(),
    }
}

fn bound(name: &str, cpu_set: &str) -> Pod {
    Pod {
        status: PodStatus {
            cpu_set: cpu_set.to_string(),
            ..Default::default()
        },
        ..pending(name, 0, NetworkMode::Bridge)
    }
}

fn contiguous_node(cores: usize, numa_nodes: usize) -> Node {
    Node {
        name: "node-a".to_string(),
        allocatable_cores: cores,
        numa: NumaInfo {
            nodes: numa_nodes,
            ..Default::default()
        },
        vms: Vec::new(),
    }
}

fn endpoint(address: &str, vlan_id: u16) -> VmDescriptor {
    VmDescriptor {
        address: address.to_string(),
        gateway: "192.168.10.1".to_string(),
        mac_address: format!("02:00:00:00:10:{vlan_id:02x}"),
        vlan_id,
    }
}

#[test]
fn eight_cores_two_numa_nodes_scenario() {
    let node = contiguous_node(8, 2);
    let pods = vec![bound("db-0", "0,1,4")];

    let result = numa_cpu_select(
        &pending("web-0", 3, NetworkMode::Bridge),
        &node,
        &pods,
        &AllocatorConfig::default(),
    )
    .unwrap();

    assert_eq!(result.flat_cores, vec![2, 3, 5]);
    assert_eq!(result.numa_cores, vec![5, 6, 7]);
    assert_eq!(result.numa_node, Some(1));
}

#[test]
fn request_beyond_every_pool_returns_empty_sets() {
    let node = contiguous_node(8, 2);
    let pods = vec![bound("db-0", "0,1,4")];

    let result = numa_cpu_select(
        &pending("web-0", 6, NetworkMode::Bridge),
        &node,
        &pods,
        &AllocatorConfig::default(),
    )
    .unwrap();

    assert!(result.flat_cores.is_empty());
    assert!(result.numa_cores.is_empty());
    assert!(result.preferred().is_none());
}

#[test]
fn lowest_numa_node_wins_when_several_qualify() {
    let node = contiguous_node(16, 4);
    // Nodes 1..=3 are completely free, node 0 has two free cores.
    let pods = vec![bound("db-0", "0,1")];

    let result = numa_cpu_select(
        &pending("web-0", 2, NetworkMode::Bridge),
        &node,
        &pods,
        &AllocatorConfig::default(),
    )
    .unwrap();
    assert_eq!(result.numa_node, Some(0));
    assert_eq!(result.numa_cores, vec![2, 3]);

    let result = numa_cpu_select(
        &pending("web-1", 3, NetworkMode::Bridge),
        &node,
        &pods,
        &AllocatorConfig::default(),
    )
    .unwrap();
    assert_eq!(result.numa_node, Some(1));
    assert_eq!(result.numa_cores, vec![4, 5, 6]);
}

#[test]
fn committed_flat_sets_never_overlap() {
    let node = contiguous_node(12, 2);
    let config = AllocatorConfig::default();
    let mut pods = vec![bound("db-0", "3,7")];

    for i in 0..5 {
        let pod = pending(&format!("web-{i}"), 2, NetworkMode::Bridge);
        let result = numa_cpu_select(&pod, &node, &pods, &config).unwrap();
        assert_eq!(result.flat_cores.len(), 2, "round {i}");

        for existing in &pods {
            let reserved = parse_cpu_list(&existing.status.cpu_set).unwrap();
            assert!(
                result.flat_cores.iter().all(|c| !reserved.contains(c)),
                "round {i} reused a reserved core"
            );
        }

        pods.push(bound(&pod.name, &result.flat_cpu_set()));
    }

    // 12 cores, 2 pre-reserved, 10 handed out: nothing left.
    let result = numa_cpu_select(
        &pending("web-last", 1, NetworkMode::Bridge),
        &node,
        &pods,
        &config,
    )
    .unwrap();
    assert!(result.is_empty());
}

#[test]
fn committed_numa_sets_stay_on_one_node() {
    let node = Node {
        numa: NumaInfo {
            nodes: 2,
            topological: true,
            core_map: None,
        },
        ..contiguous_node(8, 2)
    };
    let config = AllocatorConfig::default();
    let mut pods = vec![bound("db-0", "0,2")];

    let first = numa_cpu_select(&pending("a", 3, NetworkMode::Bridge), &node, &pods, &config).unwrap();
    assert_eq!(first.numa_cores, vec![1, 3, 5]);
    pods.push(bound("a", &first.numa_cpu_set()));

    let second = numa_cpu_select(&pending("b", 2, NetworkMode::Bridge), &node, &pods, &config).unwrap();
    assert_eq!(second.numa_node, Some(0));
    assert_eq!(second.numa_cores, vec![4, 6]);
}

#[test]
fn garbage_in_bound_pods_does_not_block_allocation() {
    let node = contiguous_node(4, 1);
    let pods = vec![bound("a", ""), bound("b", "not-a-core"), bound("c", "1, 2,64")];

    let result = numa_cpu_select(
        &pending("web", 2, NetworkMode::Bridge),
        &node,
        &pods,
        &AllocatorConfig::default(),
    )
    .unwrap();
    assert_eq!(result.flat_cores, vec![0, 3]);
    assert_eq!(result.numa_cores, vec![0, 3]);
}

#[test]
fn malformed_core_table_is_reported() {
    let node = Node {
        numa: NumaInfo {
            nodes: 2,
            topological: true,
            core_map: Some(vec![0, 1, 0]),
        },
        ..contiguous_node(4, 2)
    };

    let err = numa_cpu_select(
        &pending("web", 1, NetworkMode::Bridge),
        &node,
        &[],
        &AllocatorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PlacementError::Topology(TopologyError::CoreMapLength { expected: 4, actual: 3 })
    ));
}

#[test]
fn network_endpoints_are_handed_out_in_order() {
    let node = Node {
        vms: vec![
            endpoint("192.168.10.20/24", 20),
            endpoint("192.168.10.21/24", 21),
        ],
        ..contiguous_node(8, 2)
    };
    let mut pods: Vec<Pod> = Vec::new();

    for expected in ["192.168.10.20/24", "192.168.10.21/24"] {
        let pod = pending("web", 0, NetworkMode::MacVlan);
        let net = allocate_pod_network(&pod, &node, &pods).unwrap();
        assert_eq!(net.address, expected);

        let mut committed = pod;
        committed.status.network = net;
        pods.push(committed);
    }

    let err = allocate_pod_network(&pending("web", 0, NetworkMode::MacVlan), &node, &pods).unwrap_err();
    assert_eq!(err.to_string(), "no available network resource on node node-a");
}

#[test]
fn requested_address_needs_free_endpoint_with_same_prefix() {
    let node = Node {
        vms: vec![
            endpoint("192.168.10.20/24", 20),
            endpoint("172.16.0.5/16", 5),
        ],
        ..contiguous_node(8, 2)
    };
    let mut holder = pending("db", 0, NetworkMode::MacVlan);
    holder.status.network.address = "192.168.10.20/24".to_string();

    let mut pod = pending("web", 0, NetworkMode::MacVlan);
    pod.status.network.address = "192.168.10.20".to_string();

    let err = allocate_pod_network(&pod, &node, &[holder]).unwrap_err();
    assert!(matches!(err, PlacementError::NoAvailableNetwork { .. }));

    // Once the holder is gone the requested endpoint is available again.
    let net = allocate_pod_network(&pod, &node, &[]).unwrap();
    assert_eq!(net.address, "192.168.10.20/24");
    assert_eq!(net.vlan_id, 20);
}
