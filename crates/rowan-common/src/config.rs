//! Configuration structures for RowanDB.

use crate::error::{Result, RowanError};
use serde::{Deserialize, Serialize};

/// Smallest node capacity accepted for either node kind. A node must be able
/// to split into two halves that each hold at least two entries.
pub const MIN_NODE_CAPACITY: usize = 4;

/// Minimum fill factor for B+ tree leaves (50%).
pub const MIN_FILL_FACTOR: f64 = 0.5;

/// Node sizing for an ordered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum entries held by a leaf before it splits.
    pub leaf_capacity: usize,
    /// Maximum separator keys held by an internal node before it splits.
    pub internal_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: 64,
            internal_capacity: 64,
        }
    }
}

impl IndexConfig {
    /// Returns the entry count below which a leaf is reported as underfull.
    pub fn min_leaf_entries(&self) -> usize {
        (self.leaf_capacity as f64 * MIN_FILL_FACTOR) as usize
    }

    /// Checks that both node capacities can be split.
    pub fn validate(&self) -> Result<()> {
        if self.leaf_capacity < MIN_NODE_CAPACITY {
            return Err(RowanError::InvalidParameter {
                name: "leaf_capacity".to_string(),
                value: self.leaf_capacity.to_string(),
            });
        }
        if self.internal_capacity < MIN_NODE_CAPACITY {
            return Err(RowanError::InvalidParameter {
                name: "internal_capacity".to_string(),
                value: self.internal_capacity.to_string(),
            });
        }
        Ok(())
    }
}

/// Record heap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeapConfig {
    /// Number of record slots reserved up front (0 = grow on demand).
    pub initial_capacity: usize,
}

/// Configuration for a storage engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sizing for the unique primary key index.
    pub primary_index: IndexConfig,
    /// Sizing for the non-unique secondary key index.
    pub secondary_index: IndexConfig,
    /// Record heap settings.
    pub heap: HeapConfig,
}

impl EngineConfig {
    /// Validates every nested section.
    pub fn validate(&self) -> Result<()> {
        self.primary_index
            .validate()
            .map_err(|e| RowanError::ConfigError(format!("primary_index: {e}")))?;
        self.secondary_index
            .validate()
            .map_err(|e| RowanError::ConfigError(format!("secondary_index: {e}")))?;
        Ok(())
    }
}
