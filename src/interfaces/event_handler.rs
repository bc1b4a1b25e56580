// ============================================================================
// Event Handler Interface
// Defines the contract for observing best-execution requests
// ============================================================================

use crate::domain::{Side, VenueId};
use crate::error::ExecutionError;
use crate::numeric::Quantity;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the best-execution engine
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionEvent {
    /// Request validated, fan-out about to start
    ExecutionRequested {
        side: Side,
        quantity: Quantity,
        venues: usize,
        timestamp: DateTime<Utc>,
    },

    /// One venue proposed its best fills
    VenueMatched {
        venue_id: VenueId,
        fills: usize,
        remaining: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// One venue failed and contributes nothing
    VenueFailed {
        venue_id: VenueId,
        error: ExecutionError,
        timestamp: DateTime<Utc>,
    },

    /// Plan merged and ranked
    PlanCompleted {
        side: Side,
        fills: usize,
        filled: Quantity,
        unfilled: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Request cancelled or timed out, partial results discarded
    ExecutionAborted {
        error: ExecutionError,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing engine events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an execution event
    fn on_event(&self, event: ExecutionEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<ExecutionEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: ExecutionEvent) {}
}

/// Logging event handler
///
/// Logs every event at debug level. Venue failures and aborts are already
/// warned about by the engine.
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: ExecutionEvent) {
        match &event {
            ExecutionEvent::VenueFailed {
                venue_id, error, ..
            } => tracing::debug!(%venue_id, %error, "venue failed"),
            _ => tracing::debug!("best execution event: {:?}", event),
        }
    }
}
