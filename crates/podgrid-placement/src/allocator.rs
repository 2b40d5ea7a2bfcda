//! Pod-level entry points.
//!
//! The scheduler calls these once per (pod, node) candidate with the pods
//! already bound to that node. Both are read-only: the returned proposal
//! is committed (or discarded) by the caller.

use podgrid_core::{AllocatorConfig, Network, Node, Pod};
use tracing::debug;

use crate::convert::{bound_cpu_sets, bound_networks, node_topology};
use crate::cpuset::{CpuAssignment, select_cpu_set};
use crate::error::PlacementResult;
use crate::network::select_network;

/// Propose CPU sets for `pod` on `node`.
///
/// The request is the sum of the pod's container requests in whole
/// cores. A pod requesting nothing gets an empty assignment, even on a
/// node whose topology would not validate.
pub fn numa_cpu_select(
    pod: &Pod,
    node: &Node,
    bound: &[Pod],
    config: &AllocatorConfig,
) -> PlacementResult<CpuAssignment> {
    let requested = pod.total_cpu_request();
    if requested == 0 {
        return Ok(CpuAssignment::default());
    }

    let topology = node_topology(node, &config.cpu)?;
    let assignment = select_cpu_set(requested, &topology, bound_cpu_sets(bound))?;

    debug!(
        pod = %pod.name,
        node = %node.name,
        flat = %assignment.flat_cpu_set(),
        numa = %assignment.numa_cpu_set(),
        "cpu set proposal"
    );
    Ok(assignment)
}

/// Propose a network endpoint for `pod` on `node`.
///
/// A non-empty `pod.status.network.address` is the address the pod asks
/// for; only endpoints sharing its prefix are considered.
pub fn allocate_pod_network(pod: &Pod, node: &Node, bound: &[Pod]) -> PlacementResult<Network> {
    select_network(
        &node.name,
        pod.spec.network_mode,
        &pod.status.network.address,
        &node.vms,
        &bound_networks(bound),
    )
}
