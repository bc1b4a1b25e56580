// ============================================================================
// Engine Factory
// Creates best-execution engines with proper configuration
// ============================================================================

use crate::domain::{ExecutionConfig, IndexBackend};
use crate::engine::BestExecutionEngine;
use crate::error::ExecutionResult;
use crate::interfaces::EventHandler;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a best-execution engine from configuration
///
/// # Arguments
/// * `config` - Engine configuration
/// * `event_handler` - Event handler for execution events
///
/// # Returns
/// * `ExecutionResult<BestExecutionEngine>` - Configured engine or `InvalidConfig`
///
/// # Example
/// ```
/// use meta_exchange::prelude::*;
/// use meta_exchange::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let config = ExecutionConfig::deterministic(IndexBackend::AvlTree);
/// let engine = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert!(!engine.config().parallel);
/// ```
pub fn create_from_config(
    config: ExecutionConfig,
    event_handler: Arc<dyn EventHandler>,
) -> ExecutionResult<BestExecutionEngine> {
    // Validate configuration first
    config.validate()?;

    tracing::debug!(
        backend = %config.index_backend,
        parallel = config.parallel,
        "creating best execution engine"
    );

    Ok(BestExecutionEngine::new(config, event_handler))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating best-execution engines with fluent API
///
/// # Example
/// ```
/// use meta_exchange::prelude::*;
/// use meta_exchange::engine::factory::ExecutionEngineBuilder;
/// use std::sync::Arc;
///
/// let engine = ExecutionEngineBuilder::new()
///     .binary_heap()
///     .sequential()
///     .with_max_venues(16)
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
/// assert_eq!(engine.config().index_backend, IndexBackend::BinaryHeap);
/// ```
pub struct ExecutionEngineBuilder {
    config: ExecutionConfig,
}

impl ExecutionEngineBuilder {
    /// Create a builder starting from the reference configuration
    pub fn new() -> Self {
        Self {
            config: ExecutionConfig::reference(),
        }
    }

    // ========================================================================
    // Index Backend Configuration
    // ========================================================================

    pub fn index_backend(mut self, backend: IndexBackend) -> Self {
        self.config.index_backend = backend;
        self
    }

    /// Binary heap per venue
    pub fn binary_heap(self) -> Self {
        self.index_backend(IndexBackend::BinaryHeap)
    }

    /// AVL tree per venue
    pub fn avl_tree(self) -> Self {
        self.index_backend(IndexBackend::AvlTree)
    }

    /// Price buckets per venue (default)
    pub fn price_buckets(self) -> Self {
        self.index_backend(IndexBackend::PriceBuckets)
    }

    /// Sort-then-scan per venue
    pub fn sorted_vec(self) -> Self {
        self.index_backend(IndexBackend::SortedVec)
    }

    // ========================================================================
    // Concurrency Configuration
    // ========================================================================

    /// One worker thread per venue (default)
    pub fn parallel(mut self) -> Self {
        self.config.parallel = true;
        self
    }

    /// Match venues one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.config.parallel = false;
        self
    }

    // ========================================================================
    // Additional Configuration
    // ========================================================================

    /// Set maximum venues per request
    pub fn with_max_venues(mut self, max_venues: usize) -> Self {
        self.config.max_venues = Some(max_venues);
        self
    }

    /// Set async execution deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the engine
    pub fn build(self, event_handler: Arc<dyn EventHandler>) -> ExecutionResult<BestExecutionEngine> {
        create_from_config(self.config, event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &ExecutionConfig {
        &self.config
    }
}

impl Default for ExecutionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;
    use crate::interfaces::NoOpEventHandler;

    #[test]
    fn test_create_reference_engine() {
        let engine = create_from_config(ExecutionConfig::reference(), Arc::new(NoOpEventHandler)).unwrap();
        assert_eq!(engine.config().index_backend, IndexBackend::PriceBuckets);
        assert!(engine.config().parallel);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExecutionConfig::reference().with_max_venues(0);
        let result = create_from_config(config, Arc::new(NoOpEventHandler));
        assert!(matches!(result, Err(ExecutionError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_backends() {
        let cases = [
            (ExecutionEngineBuilder::new().binary_heap(), IndexBackend::BinaryHeap),
            (ExecutionEngineBuilder::new().avl_tree(), IndexBackend::AvlTree),
            (ExecutionEngineBuilder::new().price_buckets(), IndexBackend::PriceBuckets),
            (ExecutionEngineBuilder::new().sorted_vec(), IndexBackend::SortedVec),
        ];

        for (builder, expected) in cases {
            assert_eq!(builder.get_config().index_backend, expected);
            let engine = builder.build(Arc::new(NoOpEventHandler)).unwrap();
            assert_eq!(engine.config().index_backend, expected);
        }
    }

    #[test]
    fn test_builder_concurrency_and_limits() {
        let builder = ExecutionEngineBuilder::default()
            .sequential()
            .with_max_venues(3)
            .with_timeout(Duration::from_millis(50));

        let config = builder.get_config();
        assert!(!config.parallel);
        assert_eq!(config.max_venues, Some(3));
        assert_eq!(config.timeout, Some(Duration::from_millis(50)));

        assert!(builder.parallel().get_config().parallel);
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ExecutionEngineBuilder::new()
            .with_timeout(Duration::ZERO)
            .build(Arc::new(NoOpEventHandler));
        assert!(result.is_err());
    }
}
