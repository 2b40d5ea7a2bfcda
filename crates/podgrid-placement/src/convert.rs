//! Type conversions between scheduler objects and allocator inputs.
//!
//! Bridges `podgrid_core::{Node, Pod}` to the allocator's [`Topology`],
//! existing CPU-set strings, and existing network assignments.

use podgrid_core::{Network, Node, NumaInfo, Pod, config::CpuConfig};

use crate::error::TopologyError;
use crate::topology::{NumaLayout, Topology};

/// NUMA node count to use for a node: the declared count, or the
/// configured default when the node reports zero.
pub fn effective_numa_nodes(numa: &NumaInfo, cpu: &CpuConfig) -> usize {
    if numa.nodes > 0 {
        numa.nodes
    } else {
        cpu.default_numa_nodes
    }
}

/// Layout selected by the node's topology flag.
///
/// Topological nodes use their core table when one is supplied and
/// interleave otherwise. A core table on a non-topological node is
/// ignored.
pub fn numa_layout(numa: &NumaInfo) -> NumaLayout {
    match (numa.topological, &numa.core_map) {
        (true, Some(map)) => NumaLayout::Table(map.clone()),
        (true, None) => NumaLayout::Interleaved,
        (false, _) => NumaLayout::Contiguous,
    }
}

/// Build the validated [`Topology`] of `node`.
pub fn node_topology(node: &Node, cpu: &CpuConfig) -> Result<Topology, TopologyError> {
    Topology::new(
        node.allocatable_cores,
        effective_numa_nodes(&node.numa, cpu),
        numa_layout(&node.numa),
    )
}

/// CPU-set strings recorded on pods bound to the node.
pub fn bound_cpu_sets(pods: &[Pod]) -> impl Iterator<Item = &str> {
    pods.iter().map(|p| p.status.cpu_set.as_str())
}

/// Network assignments of bound pods, tagged with each pod's spec mode.
///
/// The spec mode decides whether a pod holds an endpoint, whatever mode
/// its recorded status claims.
pub fn bound_networks(pods: &[Pod]) -> Vec<Network> {
    pods.iter()
        .map(|p| Network {
            mode: p.spec.network_mode,
            ..p.status.network.clone()
        })
        .collect()
}
