//! podgrid-core — shared domain types for the per-node allocator.
//!
//! Holds the node/pod model the scheduler hands to the allocator, the
//! text codec for CPU-set strings recorded on pod status, and the
//! `podgrid.toml` / scenario file loaders used by the CLI.

pub mod config;
pub mod cpulist;
pub mod scenario;
pub mod types;

pub use config::{AllocatorConfig, ConfigError};
pub use cpulist::{CpuListError, format_cpu_list, parse_cpu_list, parse_cpu_list_lossy};
pub use scenario::Scenario;
pub use types::*;
