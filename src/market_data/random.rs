// ============================================================================
// Random Order Source
// Seeded mock feed producing integer-priced books
// ============================================================================

use crate::domain::{Order, Side, VenueId};
use crate::error::{ExecutionError, ExecutionResult};
use crate::interfaces::MarketDataSource;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ranges used by [`RandomOrderSource`]. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RandomOrderConfig {
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub min_price: u32,
    pub max_price: u32,
    /// Fixed seed for reproducible books, `None` seeds from the OS
    pub seed: Option<u64>,
}

impl RandomOrderConfig {
    /// Builder method: Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> ExecutionResult<()> {
        if self.min_quantity == 0 {
            return Err(ExecutionError::InvalidConfig(
                "minimum quantity must be at least 1".to_string(),
            ));
        }
        if self.min_quantity > self.max_quantity {
            return Err(ExecutionError::InvalidConfig(format!(
                "quantity range {}..={} is empty",
                self.min_quantity, self.max_quantity
            )));
        }
        if self.min_price > self.max_price {
            return Err(ExecutionError::InvalidConfig(format!(
                "price range {}..={} is empty",
                self.min_price, self.max_price
            )));
        }
        Ok(())
    }
}

impl Default for RandomOrderConfig {
    /// Quantities 1..=99, prices 500..=1000
    fn default() -> Self {
        Self {
            min_quantity: 1,
            max_quantity: 99,
            min_price: 500,
            max_price: 1000,
            seed: None,
        }
    }
}

/// Mock market data feed
///
/// Produces `count_per_side` sell orders followed by `count_per_side` buy
/// orders per call. All calls share one RNG, so a seeded source yields the
/// same sequence of books for the same sequence of calls.
pub struct RandomOrderSource {
    config: RandomOrderConfig,
    rng: Mutex<ChaCha8Rng>,
}

impl RandomOrderSource {
    pub fn new(config: RandomOrderConfig) -> ExecutionResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            config,
            rng: Mutex::new(rng),
        })
    }

    /// Default ranges with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            config: RandomOrderConfig::default().with_seed(seed),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn config(&self) -> &RandomOrderConfig {
        &self.config
    }

    fn random_order(&self, rng: &mut ChaCha8Rng, venue_id: VenueId, side: Side) -> Order {
        let quantity = rng.gen_range(self.config.min_quantity..=self.config.max_quantity);
        let price = rng.gen_range(self.config.min_price..=self.config.max_price);
        Order::new(venue_id, side, Decimal::from(quantity), Decimal::from(price))
    }
}

impl MarketDataSource for RandomOrderSource {
    fn fetch_orders(&self, venue_id: VenueId, count_per_side: usize) -> ExecutionResult<Vec<Order>> {
        let mut rng = self.rng.lock();
        let mut orders = Vec::with_capacity(count_per_side * 2);
        for side in [Side::Sell, Side::Buy] {
            for _ in 0..count_per_side {
                orders.push(self.random_order(&mut rng, venue_id, side));
            }
        }

        tracing::trace!(%venue_id, orders = orders.len(), "generated random book");
        Ok(orders)
    }

    fn name(&self) -> &str {
        "random"
    }
}
