//! Allocation scenario files.
//!
//! A scenario captures the inputs of one allocation decision: the
//! candidate node, the pending pod, and the pods already bound to the
//! node.
//!
//! ```toml
//! [node]
//! name = "node-a"
//! allocatable_cores = 8
//! numa = { nodes = 2 }
//!
//! [pod]
//! name = "web-0"
//! spec = { containers = [{ name = "app", cpu_millis = 3000 }] }
//!
//! [[existing]]
//! name = "db-0"
//! status = { cpu_set = "0,1,4" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConfigError;
use crate::types::{Node, Pod};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Scenario {
    pub node: Node,
    pub pod: Pod,
    pub existing: Vec<Pod>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
