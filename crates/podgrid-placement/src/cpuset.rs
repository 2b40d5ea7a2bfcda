//! CPU set selection.
//!
//! Given a request for `n` whole cores, computes two candidate sets from
//! the same free-core snapshot:
//! 1. a flat set: the lowest `n` free cores, ignoring locality
//! 2. a NUMA set: the lowest `n` free cores of the first NUMA node that
//!    has at least `n` free (first-fit by node id)
//!
//! Either set may be empty. Running out of cores is not an error here:
//! the caller decides whether an empty proposal rejects the node.

use podgrid_core::{CoreIndex, format_cpu_list, parse_cpu_list_lossy};
use serde::Serialize;
use tracing::{debug, trace};

use crate::bitmap::AllocationBitmap;
use crate::error::PlacementResult;
use crate::topology::Topology;

/// Candidate CPU sets for one pod on one node.
///
/// Both sets come from one snapshot and may overlap. Commit at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpuAssignment {
    /// Lowest free cores regardless of NUMA node. Empty if too few free.
    pub flat_cores: Vec<CoreIndex>,
    /// Cores confined to `numa_node`. Empty if no node had capacity.
    pub numa_cores: Vec<CoreIndex>,
    pub numa_node: Option<usize>,
}

impl CpuAssignment {
    pub fn is_empty(&self) -> bool {
        self.flat_cores.is_empty() && self.numa_cores.is_empty()
    }

    /// The NUMA-local set if there is one, else the flat set.
    pub fn preferred(&self) -> Option<&[CoreIndex]> {
        if !self.numa_cores.is_empty() {
            Some(&self.numa_cores)
        } else if !self.flat_cores.is_empty() {
            Some(&self.flat_cores)
        } else {
            None
        }
    }

    pub fn flat_cpu_set(&self) -> String {
        format_cpu_list(&self.flat_cores)
    }

    pub fn numa_cpu_set(&self) -> String {
        format_cpu_list(&self.numa_cores)
    }
}

/// Select CPU sets for `requested` cores on `topology`.
///
/// `existing` holds the CPU-set strings recorded on pods already bound to
/// the node. Malformed or out-of-range entries in them are skipped.
///
/// Returns an empty assignment without touching the topology when
/// `requested == 0`. Otherwise the NUMA layout is checked in full first;
/// an invalid layout is the only error.
pub fn select_cpu_set<I, S>(
    requested: u64,
    topology: &Topology,
    existing: I,
) -> PlacementResult<CpuAssignment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if requested == 0 {
        return Ok(CpuAssignment::default());
    }
    topology.validate_layout()?;
    // A request beyond usize can never be met; saturate rather than fail.
    let want = usize::try_from(requested).unwrap_or(usize::MAX);

    let mut bitmap = AllocationBitmap::new(topology.total_cores());
    for cpu_set in existing {
        let cpu_set = cpu_set.as_ref();
        let cores = parse_cpu_list_lossy(cpu_set, bitmap.total_cores());
        trace!(cpu_set, reserved = cores.len(), "marking bound pod cores");
        for core in cores {
            bitmap.set_used(core)?;
        }
    }

    let free = bitmap.free_cores_flat();
    let flat_cores = if free.len() >= want {
        free[..want].to_vec()
    } else {
        Vec::new()
    };

    let per_node = bitmap.free_cores_by_numa_node(topology)?;
    let (numa_node, numa_cores) = per_node
        .iter()
        .enumerate()
        .find(|(_, cores)| cores.len() >= want)
        .map(|(node, cores)| (Some(node), cores[..want].to_vec()))
        .unwrap_or_default();

    debug!(
        requested,
        free = free.len(),
        flat = %format_cpu_list(&flat_cores),
        numa = %format_cpu_list(&numa_cores),
        numa_node = ?numa_node,
        "selected cpu sets"
    );

    Ok(CpuAssignment {
        flat_cores,
        numa_cores,
        numa_node,
    })
}
