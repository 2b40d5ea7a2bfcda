//! Node and pod model consumed by the allocator.
//!
//! These mirror the subset of scheduler objects the allocator reads: a
//! node's capacity, NUMA description and provisioned VM endpoints, and a
//! pod's container requests, network mode and recorded status. All types
//! are serializable so scenarios can be described in TOML or JSON.

use serde::{Deserialize, Serialize};

/// Logical CPU core on a node, 0-based and dense.
pub type CoreIndex = usize;

/// Millicores in one whole core.
pub const MILLICORES_PER_CORE: u64 = 1000;

// ── Node ──────────────────────────────────────────────────────────

/// A candidate node as seen by one allocation decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Node {
    pub name: String,
    /// Whole cores available for dedicated CPU sets.
    pub allocatable_cores: usize,
    pub numa: NumaInfo,
    /// Pre-provisioned network endpoints, in allocation order.
    pub vms: Vec<VmDescriptor>,
}

/// NUMA layout declared for a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NumaInfo {
    /// Declared NUMA node count; 0 means "not reported".
    pub nodes: usize,
    /// Cores are not laid out as contiguous per-node ranges.
    pub topological: bool,
    /// Explicit core → NUMA node table for topological layouts.
    /// When absent, topological nodes are interleaved round-robin.
    pub core_map: Option<Vec<usize>>,
}

/// One allocatable virtual network endpoint on a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct VmDescriptor {
    /// CIDR-style address, e.g. `10.0.1.12/24`.
    pub address: String,
    pub gateway: String,
    pub mac_address: String,
    pub vlan_id: u16,
}

// ── Pod ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Pod {
    pub name: String,
    pub spec: PodSpec,
    pub status: PodStatus,
}

impl Pod {
    /// Total whole cores requested across all containers.
    ///
    /// Each container's request is rounded up to a whole core before
    /// summing, so `1500m` and `500m` ask for three cores.
    pub fn total_cpu_request(&self) -> u64 {
        self.spec
            .containers
            .iter()
            .map(Container::requested_cores)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PodSpec {
    pub containers: Vec<Container>,
    pub network_mode: NetworkMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Container {
    pub name: String,
    /// CPU request in millicores.
    pub cpu_millis: u64,
}

impl Container {
    pub fn requested_cores(&self) -> u64 {
        self.cpu_millis.div_ceil(MILLICORES_PER_CORE)
    }
}

/// State recorded on a pod once it is bound to a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PodStatus {
    /// Committed CPU set as a comma-separated core list, e.g. `"0,1,4"`.
    pub cpu_set: String,
    /// Committed network assignment. For a pending pod, a non-empty
    /// `address` is the address the pod asks for.
    pub network: Network,
}

// ── Network ───────────────────────────────────────────────────────

/// Pod networking mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    #[default]
    Bridge,
    Host,
    /// Dedicated virtual interface and address per pod.
    MacVlan,
}

impl NetworkMode {
    pub fn is_dedicated(self) -> bool {
        self == NetworkMode::MacVlan
    }

    pub fn label(self) -> &'static str {
        match self {
            NetworkMode::Bridge => "bridge",
            NetworkMode::Host => "host",
            NetworkMode::MacVlan => "mac_vlan",
        }
    }
}

/// Pod-scoped network fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Network {
    pub mode: NetworkMode,
    pub address: String,
    pub gateway: String,
    pub mac_address: String,
    pub vlan_id: u16,
}

impl Network {
    /// Copy a node endpoint into pod-scoped fields under `mode`.
    pub fn from_vm(mode: NetworkMode, vm: &VmDescriptor) -> Self {
        Self {
            mode,
            address: vm.address.clone(),
            gateway: vm.gateway.clone(),
            mac_address: vm.mac_address.clone(),
            vlan_id: vm.vlan_id,
        }
    }

    pub fn is_assigned(&self) -> bool {
        !self.address.is_empty()
    }
}
