//! Core reservation bitmap.
//!
//! One bit per core, `1` = reserved. A bitmap is built from the CPU sets
//! of pods already bound to a node, queried, and dropped within a single
//! allocation decision.

use podgrid_core::CoreIndex;

use crate::error::{BitmapError, TopologyError};
use crate::topology::Topology;

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationBitmap {
    words: Vec<u64>,
    total_cores: usize,
}

impl AllocationBitmap {
    /// All `total_cores` cores start free.
    pub fn new(total_cores: usize) -> Self {
        Self {
            words: vec![0; total_cores.div_ceil(WORD_BITS)],
            total_cores,
        }
    }

    pub fn total_cores(&self) -> usize {
        self.total_cores
    }

    pub fn set_used(&mut self, core: CoreIndex) -> Result<(), BitmapError> {
        if core >= self.total_cores {
            return Err(BitmapError::OutOfRange {
                core,
                total: self.total_cores,
            });
        }
        self.words[core / WORD_BITS] |= 1 << (core % WORD_BITS);
        Ok(())
    }

    /// Out-of-range cores read as not used.
    pub fn is_used(&self, core: CoreIndex) -> bool {
        core < self.total_cores && self.words[core / WORD_BITS] & (1 << (core % WORD_BITS)) != 0
    }

    pub fn used_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn free_count(&self) -> usize {
        self.total_cores - self.used_count()
    }

    /// Free cores in ascending order, ignoring NUMA locality.
    pub fn free_cores_flat(&self) -> Vec<CoreIndex> {
        (0..self.total_cores).filter(|&c| !self.is_used(c)).collect()
    }

    /// Free cores grouped by NUMA node under `topology`'s layout.
    pub fn free_cores_by_numa_node(
        &self,
        topology: &Topology,
    ) -> Result<Vec<Vec<CoreIndex>>, TopologyError> {
        self.free_cores_partitioned(topology.numa_nodes(), |core| topology.numa_node_of(core))
    }

    /// Free cores grouped into `node_count` buckets by `node_of`.
    ///
    /// Each bucket is ascending. The first mapping failure aborts the
    /// partition, as does a mapping to a bucket `>= node_count`.
    pub fn free_cores_partitioned<F>(
        &self,
        node_count: usize,
        mut node_of: F,
    ) -> Result<Vec<Vec<CoreIndex>>, TopologyError>
    where
        F: FnMut(CoreIndex) -> Result<usize, TopologyError>,
    {
        let mut buckets = vec![Vec::new(); node_count];
        for core in self.free_cores_flat() {
            let node = node_of(core)?;
            let bucket = buckets.get_mut(node).ok_or(TopologyError::CoreMapEntry {
                core,
                node,
                nodes: node_count,
            })?;
            bucket.push(core);
        }
        Ok(buckets)
    }
}
