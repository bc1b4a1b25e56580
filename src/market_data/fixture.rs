// ============================================================================
// Fixture Order Source
// Fixed books per venue, with injectable failures
// ============================================================================

use std::collections::HashMap;

use crate::domain::{Order, VenueId};
use crate::error::{ExecutionError, ExecutionResult};
use crate::interfaces::MarketDataSource;

/// Market data source serving pre-built books
///
/// Venues without a book return no orders. `count_per_side` is ignored;
/// the fixture is served as given.
#[derive(Debug, Clone, Default)]
pub struct FixtureOrderSource {
    books: HashMap<VenueId, Vec<Order>>,
    failures: HashMap<VenueId, String>,
}

impl FixtureOrderSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Serve `orders` for `venue_id`
    pub fn with_orders(mut self, venue_id: VenueId, orders: Vec<Order>) -> Self {
        self.books.insert(venue_id, orders);
        self
    }

    /// Builder method: Fail every fetch for `venue_id`
    pub fn with_failure(mut self, venue_id: VenueId, reason: impl Into<String>) -> Self {
        self.failures.insert(venue_id, reason.into());
        self
    }
}

impl MarketDataSource for FixtureOrderSource {
    fn fetch_orders(&self, venue_id: VenueId, _count_per_side: usize) -> ExecutionResult<Vec<Order>> {
        if let Some(reason) = self.failures.get(&venue_id) {
            return Err(ExecutionError::MarketData {
                venue_id,
                reason: reason.clone(),
            });
        }
        Ok(self.books.get(&venue_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
