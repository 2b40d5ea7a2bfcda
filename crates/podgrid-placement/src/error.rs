//! Allocator error types.

use podgrid_core::CoreIndex;
use thiserror::Error;

/// Malformed node topology. Always propagated to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("node reports no allocatable cores")]
    NoCores,

    #[error("NUMA node count must be greater than zero")]
    NoNumaNodes,

    #[error("{nodes} NUMA nodes reported for only {cores} cores")]
    TooManyNumaNodes { nodes: usize, cores: usize },

    #[error("core {core} is outside the node's {total} cores")]
    CoreOutOfRange { core: CoreIndex, total: usize },

    #[error("core map covers {actual} cores, node has {expected}")]
    CoreMapLength { expected: usize, actual: usize },

    #[error("core {core} mapped to NUMA node {node}, node has {nodes} NUMA nodes")]
    CoreMapEntry {
        core: CoreIndex,
        node: usize,
        nodes: usize,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BitmapError {
    #[error("core {core} out of range for {total} cores")]
    OutOfRange { core: CoreIndex, total: usize },
}

/// Errors returned by allocation decisions.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("bitmap error: {0}")]
    Bitmap(#[from] BitmapError),

    #[error("no available network resource on node {node}")]
    NoAvailableNetwork { node: String },
}

pub type PlacementResult<T> = Result<T, PlacementError>;
