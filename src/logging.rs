// ============================================================================
// Logging
// tracing-subscriber setup for binaries
// ============================================================================

use crate::error::{ExecutionError, ExecutionResult};
use tracing_subscriber::{fmt, EnvFilter};

/// Default directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "meta_exchange=info";

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
///
/// # Errors
/// `InvalidConfig` if the directive cannot be parsed or a global subscriber
/// is already installed.
pub fn init_logging(default_level: &str) -> ExecutionResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| {
            ExecutionError::InvalidConfig(format!("invalid log directive '{}': {}", default_level, e))
        })?,
    };

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ExecutionError::InvalidConfig(format!("logging already initialized: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call installs the subscriber, the next one must fail
        let _ = init_logging(DEFAULT_LOG_LEVEL);
        assert!(init_logging(DEFAULT_LOG_LEVEL).is_err());
    }
}
