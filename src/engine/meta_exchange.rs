// ============================================================================
// Meta-Exchange Service
// Boundary facade: fetch books, validate raw input, run the engine
// ============================================================================

use crate::domain::{ExecutionPlan, MarketDataConfig, Side, Venue, VenueDiagnostic};
use crate::engine::BestExecutionEngine;
use crate::error::ExecutionResult;
use crate::interfaces::MarketDataSource;
use crate::numeric::{ensure_positive, Quantity};
use std::sync::Arc;

/// Best execution across a configured set of venues fed by a
/// [`MarketDataSource`]
///
/// Every request fetches fresh books for all venues. A venue whose books
/// cannot be fetched is skipped and reported as a diagnostic.
///
/// # Example
/// ```
/// use meta_exchange::prelude::*;
/// use meta_exchange::market_data::RandomOrderSource;
/// use rust_decimal_macros::dec;
/// use std::sync::Arc;
///
/// let engine = BestExecutionEngine::new(ExecutionConfig::default(), Arc::new(NoOpEventHandler));
/// let service = MetaExchange::new(
///     engine,
///     Arc::new(RandomOrderSource::seeded(7)),
///     MarketDataConfig::default(),
/// )
/// .unwrap();
///
/// let plan = service.compute_best_execution("buy", dec!(10)).unwrap();
/// assert_eq!(plan.filled_quantity(), dec!(10));
/// assert!(service.compute_best_execution("hold", dec!(10)).is_err());
/// ```
pub struct MetaExchange {
    engine: BestExecutionEngine,
    source: Arc<dyn MarketDataSource>,
    /// Venue identities; their books are fetched per request
    venues: Vec<Venue>,
    orders_per_side: usize,
}

impl MetaExchange {
    /// Create the service with one fresh venue per configured name
    pub fn new(
        engine: BestExecutionEngine,
        source: Arc<dyn MarketDataSource>,
        market: MarketDataConfig,
    ) -> ExecutionResult<Self> {
        market.validate()?;
        let venues = market.venues.iter().map(Venue::new).collect();
        Ok(Self::with_venues(engine, source, venues, market.orders_per_side))
    }

    /// Create the service over known venues (their resting orders are ignored)
    pub fn with_venues(
        engine: BestExecutionEngine,
        source: Arc<dyn MarketDataSource>,
        venues: Vec<Venue>,
        orders_per_side: usize,
    ) -> Self {
        let venues = venues
            .into_iter()
            .map(|venue| Venue::with_id(venue.id, venue.name))
            .collect();
        Self {
            engine,
            source,
            venues,
            orders_per_side,
        }
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn engine(&self) -> &BestExecutionEngine {
        &self.engine
    }

    /// Compute the plan for a raw request.
    ///
    /// `side` must be exactly `"buy"` or `"sell"` and `amount` must be
    /// positive; both are checked before any market data is fetched.
    pub fn compute_best_execution(&self, side: &str, amount: Quantity) -> ExecutionResult<ExecutionPlan> {
        let side: Side = side.parse()?;
        ensure_positive(amount)?;

        let (books, mut diagnostics) = self.fetch_books();
        let mut plan = self.engine.best_execution(&books, side, amount)?;

        // Fetch failures first, then matching failures
        diagnostics.append(&mut plan.diagnostics);
        plan.diagnostics = diagnostics;
        Ok(plan)
    }

    fn fetch_books(&self) -> (Vec<Venue>, Vec<VenueDiagnostic>) {
        let mut books = Vec::with_capacity(self.venues.len());
        let mut diagnostics = Vec::new();

        for venue in &self.venues {
            match self.source.fetch_orders(venue.id, self.orders_per_side) {
                Ok(orders) => books.push(venue.clone().with_orders(orders)),
                Err(error) => {
                    tracing::warn!(
                        venue = %venue.name,
                        source = self.source.name(),
                        %error,
                        "market data fetch failed"
                    );
                    diagnostics.push(VenueDiagnostic {
                        venue_id: venue.id,
                        venue_name: venue.name.clone(),
                        error,
                    });
                },
            }
        }

        (books, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExecutionConfig, Order};
    use crate::error::ExecutionError;
    use crate::interfaces::NoOpEventHandler;
    use crate::market_data::{FixtureOrderSource, RandomOrderSource};
    use rust_decimal_macros::dec;

    fn engine() -> BestExecutionEngine {
        BestExecutionEngine::new(ExecutionConfig::default(), Arc::new(NoOpEventHandler))
    }

    #[test]
    fn test_rejects_bad_side_and_amount() {
        let service = MetaExchange::new(
            engine(),
            Arc::new(RandomOrderSource::seeded(1)),
            MarketDataConfig::default(),
        )
        .unwrap();

        let side_error = service.compute_best_execution("hold", dec!(1)).unwrap_err();
        assert!(side_error.to_string().contains("must be buy or sell"));

        let amount_error = service.compute_best_execution("sell", dec!(0)).unwrap_err();
        assert_eq!(
            amount_error,
            ExecutionError::invalid_argument("amount must be greater than 0")
        );
    }

    #[test]
    fn test_fetch_failure_becomes_diagnostic() {
        let (up, down) = (Venue::new("up"), Venue::new("down"));
        let source = FixtureOrderSource::new()
            .with_orders(up.id, vec![Order::new(up.id, Side::Buy, dec!(20), dec!(116))])
            .with_failure(down.id, "connection refused");
        let service = MetaExchange::with_venues(engine(), Arc::new(source), vec![up.clone(), down.clone()], 100);

        let plan = service.compute_best_execution("sell", dec!(5)).unwrap();

        assert_eq!(plan.fills.len(), 1);
        assert_eq!(plan.fills[0].venue_id, up.id);
        assert_eq!(plan.diagnostics.len(), 1);
        assert_eq!(plan.diagnostics[0].venue_id, down.id);
        assert!(matches!(plan.diagnostics[0].error, ExecutionError::MarketData { .. }));
    }

    #[test]
    fn test_default_setup_fills_from_random_books() {
        let service = MetaExchange::new(
            engine(),
            Arc::new(RandomOrderSource::seeded(99)),
            MarketDataConfig::default(),
        )
        .unwrap();
        assert_eq!(service.venues().len(), 4);

        let plan = service.compute_best_execution("sell", dec!(250)).unwrap();
        assert!(plan.is_fully_filled());
        assert!(plan.fills.iter().all(|f| f.side == Side::Buy));
        assert!(plan.fills.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_rejects_invalid_market_config() {
        let result = MetaExchange::new(
            engine(),
            Arc::new(RandomOrderSource::seeded(1)),
            MarketDataConfig::new(Vec::new(), 100),
        );
        assert!(matches!(result, Err(ExecutionError::InvalidConfig(_))));
    }
}
