// ============================================================================
// Execution Configuration
// Index backend selection, concurrency and market data settings
// ============================================================================

use crate::error::{ExecutionError, ExecutionResult};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Index Backend
// ============================================================================

/// Data structure used to order one venue's counter-orders by price.
///
/// All backends extract the same sequence for the same input; they differ
/// only in cost profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IndexBackend {
    /// Binary heap priority queue
    /// - O(log n) insert and extract
    BinaryHeap,

    /// AVL tree keyed by (price, arrival)
    /// - O(log n) insert and extract, height bounded by ~1.44 log2 n
    AvlTree,

    /// Sorted skip map of FIFO buckets keyed by price
    /// - O(log levels) per price level, FIFO inside a level
    PriceBuckets,

    /// Vector sorted once on first extraction
    /// - O(n log n) up front, O(1) per extraction afterwards
    SortedVec,
}

impl IndexBackend {
    pub const ALL: [IndexBackend; 4] = [
        IndexBackend::BinaryHeap,
        IndexBackend::AvlTree,
        IndexBackend::PriceBuckets,
        IndexBackend::SortedVec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexBackend::BinaryHeap => "heap",
            IndexBackend::AvlTree => "avl",
            IndexBackend::PriceBuckets => "buckets",
            IndexBackend::SortedVec => "sorted",
        }
    }
}

impl fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexBackend {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heap" | "binary-heap" => Ok(IndexBackend::BinaryHeap),
            "avl" | "avl-tree" | "tree" => Ok(IndexBackend::AvlTree),
            "buckets" | "price-buckets" => Ok(IndexBackend::PriceBuckets),
            "sorted" | "sorted-vec" => Ok(IndexBackend::SortedVec),
            other => Err(ExecutionError::InvalidConfig(format!(
                "unknown index backend '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Configuration for a [`BestExecutionEngine`](crate::engine::BestExecutionEngine)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionConfig {
    /// Price index used for every venue
    pub index_backend: IndexBackend,

    /// Match venues on one worker thread each (false = one after another)
    pub parallel: bool,

    /// Optional: reject requests spanning more venues than this
    pub max_venues: Option<usize>,

    /// Optional: deadline for async execution
    pub timeout: Option<Duration>,
}

impl ExecutionConfig {
    pub fn new(index_backend: IndexBackend) -> Self {
        Self {
            index_backend,
            parallel: true,
            max_venues: None,
            timeout: None,
        }
    }

    /// Builder method: Set the index backend
    pub fn with_index_backend(mut self, backend: IndexBackend) -> Self {
        self.index_backend = backend;
        self
    }

    /// Builder method: Enable or disable per-venue worker threads
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder method: Set the maximum number of venues per request
    pub fn with_max_venues(mut self, max_venues: usize) -> Self {
        self.max_venues = Some(max_venues);
        self
    }

    /// Builder method: Set the async execution deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ExecutionResult<()> {
        if self.max_venues == Some(0) {
            return Err(ExecutionError::InvalidConfig(
                "max venues must be at least 1".to_string(),
            ));
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ExecutionError::InvalidConfig(
                    "timeout must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Reference configuration
    /// - Sorted price buckets
    /// - One worker per venue
    pub fn reference() -> Self {
        Self::new(IndexBackend::PriceBuckets)
    }

    /// Single-threaded configuration for reproducible debugging
    pub fn deterministic(index_backend: IndexBackend) -> Self {
        Self::new(index_backend).with_parallel(false)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::reference()
    }
}

// ============================================================================
// Market Data Configuration
// ============================================================================

/// Venues queried by [`MetaExchange`](crate::engine::MetaExchange) and how
/// many orders to request from each
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketDataConfig {
    /// Venue names, one venue per entry
    pub venues: Vec<String>,

    /// Orders requested per side per venue
    pub orders_per_side: usize,
}

impl MarketDataConfig {
    pub fn new(venues: Vec<String>, orders_per_side: usize) -> Self {
        Self {
            venues,
            orders_per_side,
        }
    }

    pub fn validate(&self) -> ExecutionResult<()> {
        if self.venues.is_empty() {
            return Err(ExecutionError::InvalidConfig(
                "at least one venue is required".to_string(),
            ));
        }
        if self.venues.iter().any(|name| name.trim().is_empty()) {
            return Err(ExecutionError::InvalidConfig(
                "venue names cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MarketDataConfig {
    /// Four venues with 100 orders per side each
    fn default() -> Self {
        Self::new(
            (1..=4).map(|i| format!("exchange-{}", i)).collect(),
            100,
        )
    }
}
