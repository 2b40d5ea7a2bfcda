//! podgrid per-node allocator — NUMA-aware CPU sets and network endpoints.
//!
//! This crate decides, for one pod on one candidate node, which CPU cores
//! and which pre-provisioned network endpoint the pod should receive. It
//! does NOT rank nodes or persist assignments (that's the scheduler).
//! Every call reads an immutable snapshot of the node and the pods bound
//! to it and returns a proposal.
//!
//! # Components
//!
//! - **`topology`** — Validated node topology and NUMA layouts
//! - **`bitmap`** — Per-decision core reservation bitmap
//! - **`cpuset`** — Flat and single-NUMA-node CPU set selection
//! - **`network`** — Dedicated (mac-vlan) endpoint selection
//! - **`convert`** — Extraction of allocator inputs from node/pod types
//! - **`allocator`** — Pod-level entry points used by the scheduler

pub mod allocator;
pub mod bitmap;
pub mod convert;
pub mod cpuset;
pub mod error;
pub mod network;
pub mod topology;

pub use allocator::{allocate_pod_network, numa_cpu_select};
pub use bitmap::AllocationBitmap;
pub use cpuset::{CpuAssignment, select_cpu_set};
pub use error::{BitmapError, PlacementError, PlacementResult, TopologyError};
pub use network::select_network;
pub use topology::{NumaLayout, Topology};
