//! Dedicated network endpoint selection.
//!
//! Pods in mac-vlan mode need one of the node's pre-provisioned VM
//! endpoints to themselves. Endpoints are scanned in the order the node
//! lists them and the first unused, compatible one wins.

use podgrid_core::{Network, NetworkMode, VmDescriptor};
use tracing::{debug, trace};

use crate::error::{PlacementError, PlacementResult};

/// Pick a network endpoint for a pod on `node_name`.
///
/// - `mode` / `requested_address`: the pending pod's network mode and the
///   address it asks for (empty for "any")
/// - `vms`: the node's endpoints, in allocation order
/// - `existing`: assignments of pods already bound to the node; only
///   mac-vlan assignments hold an endpoint
///
/// Non-mac-vlan pods get an empty [`Network`]. A mac-vlan pod that finds
/// no usable endpoint gets [`PlacementError::NoAvailableNetwork`].
pub fn select_network(
    node_name: &str,
    mode: NetworkMode,
    requested_address: &str,
    vms: &[VmDescriptor],
    existing: &[Network],
) -> PlacementResult<Network> {
    if !mode.is_dedicated() {
        return Ok(Network::default());
    }

    for vm in vms {
        if vm.address.is_empty() {
            trace!(node = node_name, mac = %vm.mac_address, "skipping endpoint without address");
            continue;
        }
        if is_used(vm, existing) {
            continue;
        }
        if !requested_address.is_empty() && !shares_prefix(requested_address, &vm.address) {
            continue;
        }

        debug!(
            node = node_name,
            address = %vm.address,
            vlan = vm.vlan_id,
            "selected network endpoint"
        );
        return Ok(Network::from_vm(mode, vm));
    }

    Err(PlacementError::NoAvailableNetwork {
        node: node_name.to_string(),
    })
}

fn is_used(vm: &VmDescriptor, existing: &[Network]) -> bool {
    existing
        .iter()
        .any(|net| net.mode.is_dedicated() && net.address == vm.address)
}

/// `requested` starts with the host part of `vm_address` (the text before
/// its `/` subnet length). Endpoints without a subnet never match.
fn shares_prefix(requested: &str, vm_address: &str) -> bool {
    vm_address
        .split_once('/')
        .is_some_and(|(host, _)| requested.starts_with(host))
}
