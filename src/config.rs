//! Run configuration for the evaluation pipeline.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! { "num_nodes": 30, "num_partitions": 6, "max_per_partition": 5,
//!   "exact": { "time_budget_ms": 5000 } }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::NodeId;
use crate::partitioning::Capacity;
use crate::partitioning::error::PartitionError;

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings of the exact partitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    pub enabled: bool,
    /// Fix node 0 to partition 0.
    pub pin_first_to_zero: bool,
    /// `None` lets the solver run to completion.
    pub time_budget_ms: Option<u64>,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pin_first_to_zero: true,
            time_budget_ms: Some(30_000),
        }
    }
}

impl ExactConfig {
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Parameters of one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub num_nodes: usize,
    pub num_partitions: usize,
    pub max_per_partition: usize,
    pub start_node: NodeId,
    pub max_depth: u32,
    /// Seed of the random baseline.
    pub rng_seed: u64,
    /// Seed of the network generator.
    pub graph_seed: u64,
    pub max_out_degree: Option<usize>,
    pub exact: ExactConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            num_nodes: 100,
            num_partitions: 40,
            max_per_partition: 10,
            start_node: 0,
            max_depth: 3,
            rng_seed: 42,
            graph_seed: 7,
            max_out_degree: None,
            exact: ExactConfig::default(),
        }
    }
}

impl EvalConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn capacity(&self) -> Capacity {
        Capacity::new(self.num_partitions, self.max_per_partition)
    }

    /// Checks all constants together; run once before any partitioner.
    ///
    /// # Errors
    /// `InvalidConfig` for a zero node count or out-degree cap,
    /// `CapacityInfeasible` when the partitions cannot hold every node
    /// (a zero partition count or capacity included), `OutOfRangeNode` for a
    /// start node outside the network.
    pub fn validate(&self) -> Result<(), PartitionError> {
        self.capacity().check(self.num_nodes)?;
        if self.max_out_degree == Some(0) {
            return Err(PartitionError::InvalidConfig(
                "max out-degree must be positive",
            ));
        }
        if self.start_node >= self.num_nodes {
            return Err(PartitionError::OutOfRangeNode {
                node: self.start_node,
                num_nodes: self.num_nodes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = EvalConfig::default();
        assert_eq!(cfg.capacity(), Capacity::new(40, 10));
        assert_eq!(cfg.exact.time_budget(), Some(Duration::from_secs(30)));
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EvalConfig::from_json_str(
            r#"{ "num_nodes": 12, "exact": { "time_budget_ms": null } }"#,
        )
        .unwrap();
        assert_eq!(cfg.num_nodes, 12);
        assert_eq!(cfg.num_partitions, 40);
        assert!(cfg.exact.enabled);
        assert!(cfg.exact.pin_first_to_zero);
        assert_eq!(cfg.exact.time_budget(), None);
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            EvalConfig::from_json_str("{ \"num_nodes\": -1 }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            EvalConfig::from_json_file("/nonexistent/dpu-eval.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn capacity_shortfall_is_fatal() {
        let cfg = EvalConfig {
            num_nodes: 1,
            num_partitions: 1,
            max_per_partition: 0,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(PartitionError::CapacityInfeasible {
                num_nodes: 1,
                num_partitions: 1,
                max_per_partition: 0
            })
        );

        let cfg = EvalConfig {
            num_nodes: 11,
            num_partitions: 2,
            max_per_partition: 5,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(PartitionError::CapacityInfeasible {
                num_nodes: 11,
                num_partitions: 2,
                max_per_partition: 5
            })
        );
    }

    #[test]
    fn zero_node_count_or_degree_cap_is_invalid() {
        let cfg = EvalConfig {
            num_nodes: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(PartitionError::InvalidConfig(_))));
        let cfg = EvalConfig {
            max_out_degree: Some(0),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(PartitionError::InvalidConfig(_))));
    }

    #[test]
    fn start_node_out_of_range() {
        let cfg = EvalConfig {
            num_nodes: 10,
            start_node: 10,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(PartitionError::OutOfRangeNode {
                node: 10,
                num_nodes: 10
            })
        );
    }
}
