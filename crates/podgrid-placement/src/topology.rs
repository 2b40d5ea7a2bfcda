//! Node topology for one allocation decision.
//!
//! A [`Topology`] fixes the node's core count, NUMA node count, and the
//! layout that maps each core to its NUMA node. Counts are validated
//! when the value is built; a caller-supplied core table is checked as a
//! whole by [`Topology::validate_layout`] before any partitioning.

use podgrid_core::CoreIndex;
use serde::Serialize;

use crate::error::TopologyError;

/// How cores are distributed over NUMA nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "core_map")]
pub enum NumaLayout {
    /// NUMA node `i` owns cores `[i*total/n, (i+1)*total/n)`.
    Contiguous,
    /// Core `c` belongs to NUMA node `c % n`.
    Interleaved,
    /// Explicit core → NUMA node table, one entry per core.
    Table(Vec<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    total_cores: usize,
    numa_nodes: usize,
    layout: NumaLayout,
}

impl Topology {
    pub fn new(
        total_cores: usize,
        numa_nodes: usize,
        layout: NumaLayout,
    ) -> Result<Self, TopologyError> {
        if total_cores == 0 {
            return Err(TopologyError::NoCores);
        }
        if numa_nodes == 0 {
            return Err(TopologyError::NoNumaNodes);
        }
        if numa_nodes > total_cores {
            return Err(TopologyError::TooManyNumaNodes {
                nodes: numa_nodes,
                cores: total_cores,
            });
        }
        Ok(Self {
            total_cores,
            numa_nodes,
            layout,
        })
    }

    pub fn contiguous(total_cores: usize, numa_nodes: usize) -> Result<Self, TopologyError> {
        Self::new(total_cores, numa_nodes, NumaLayout::Contiguous)
    }

    pub fn total_cores(&self) -> usize {
        self.total_cores
    }

    pub fn numa_nodes(&self) -> usize {
        self.numa_nodes
    }

    pub fn layout(&self) -> &NumaLayout {
        &self.layout
    }

    /// Check the whole core table of a [`NumaLayout::Table`] layout.
    ///
    /// Contiguous and interleaved layouts are valid by construction.
    pub fn validate_layout(&self) -> Result<(), TopologyError> {
        let NumaLayout::Table(map) = &self.layout else {
            return Ok(());
        };
        if map.len() != self.total_cores {
            return Err(TopologyError::CoreMapLength {
                expected: self.total_cores,
                actual: map.len(),
            });
        }
        match map.iter().position(|&node| node >= self.numa_nodes) {
            Some(core) => Err(TopologyError::CoreMapEntry {
                core,
                node: map[core],
                nodes: self.numa_nodes,
            }),
            None => Ok(()),
        }
    }

    /// NUMA node owning `core`.
    pub fn numa_node_of(&self, core: CoreIndex) -> Result<usize, TopologyError> {
        if core >= self.total_cores {
            return Err(TopologyError::CoreOutOfRange {
                core,
                total: self.total_cores,
            });
        }
        match &self.layout {
            // Largest i with floor(i*total/n) <= core.
            // Widened so `(core + 1) * n` cannot overflow.
            NumaLayout::Contiguous => {
                let node = ((core as u128 + 1) * self.numa_nodes as u128 - 1)
                    / self.total_cores as u128;
                Ok(node as usize)
            }
            NumaLayout::Interleaved => Ok(core % self.numa_nodes),
            NumaLayout::Table(map) => {
                if map.len() != self.total_cores {
                    return Err(TopologyError::CoreMapLength {
                        expected: self.total_cores,
                        actual: map.len(),
                    });
                }
                let node = map[core];
                if node >= self.numa_nodes {
                    return Err(TopologyError::CoreMapEntry {
                        core,
                        node,
                        nodes: self.numa_nodes,
                    });
                }
                Ok(node)
            }
        }
    }
}
