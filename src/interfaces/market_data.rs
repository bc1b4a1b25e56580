// ============================================================================
// Market Data Interface
// Defines the contract for order suppliers
// ============================================================================

use crate::domain::{Order, VenueId};
use crate::error::ExecutionResult;

/// Supplies the resting orders of a venue.
///
/// The engine treats the source as opaque and performs no realism checks;
/// malformed orders are caught later, per venue. Retries against a real feed
/// belong to the implementation, not to the engine.
pub trait MarketDataSource: Send + Sync {
    /// Fetch up to `count_per_side` orders of each side for `venue_id`
    fn fetch_orders(&self, venue_id: VenueId, count_per_side: usize) -> ExecutionResult<Vec<Order>>;

    /// Get the source name for logging
    fn name(&self) -> &str;
}
