// ============================================================================
// Execution Errors
// Error taxonomy for best-execution requests
// ============================================================================

use crate::domain::{OrderId, VenueId};
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors produced while computing a best-execution plan.
///
/// `InvalidArgument`, `Cancelled` and `TimedOut` abort the whole request.
/// The remaining variants are raised inside a single venue and end up as
/// [`VenueDiagnostic`](crate::domain::VenueDiagnostic)s on the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionError {
    /// Unsupported side literal, non-positive amount, mis-ordered index
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An order that cannot take part in matching
    #[error("malformed order {order_id} on venue {venue_id}: {reason}")]
    MalformedOrder {
        venue_id: VenueId,
        order_id: OrderId,
        reason: String,
    },

    /// A counter-order carrying the requested side reached the matcher
    #[error("order {order_id} has the same side as the request")]
    SameSideOrder { order_id: OrderId },

    /// The market data source could not supply a venue's orders
    #[error("market data unavailable for venue {venue_id}: {reason}")]
    MarketData { venue_id: VenueId, reason: String },

    /// The worker matching a venue panicked
    #[error("worker for venue {venue_id} panicked")]
    WorkerPanicked { venue_id: VenueId },

    /// Checked decimal arithmetic failed
    #[error("arithmetic overflow while computing fills")]
    Overflow,

    /// The caller cancelled the request
    #[error("execution cancelled")]
    Cancelled,

    /// The request did not finish within its deadline
    #[error("execution timed out after {0:?}")]
    TimedOut(Duration),

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExecutionError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ExecutionError::InvalidArgument(message.into())
    }

    /// True for errors that are confined to one venue.
    pub fn is_venue_scoped(&self) -> bool {
        matches!(
            self,
            ExecutionError::MalformedOrder { .. }
                | ExecutionError::SameSideOrder { .. }
                | ExecutionError::MarketData { .. }
                | ExecutionError::WorkerPanicked { .. }
                | ExecutionError::Overflow
        )
    }
}

/// Result type alias for execution operations
pub type ExecutionResult<T> = Result<T, ExecutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ExecutionError::invalid_argument("amount must be greater than 0").to_string(),
            "invalid argument: amount must be greater than 0"
        );
        assert_eq!(ExecutionError::Cancelled.to_string(), "execution cancelled");
    }

    #[test]
    fn test_venue_scope() {
        assert!(ExecutionError::Overflow.is_venue_scoped());
        assert!(ExecutionError::WorkerPanicked {
            venue_id: VenueId::new()
        }
        .is_venue_scoped());
        assert!(!ExecutionError::Cancelled.is_venue_scoped());
        assert!(!ExecutionError::invalid_argument("side").is_venue_scoped());
    }
}
