// ============================================================================
// Venue Domain Model
// One independent order book
// ============================================================================

use crate::error::ExecutionResult;
use crate::numeric::{checked_sum, Quantity};

use super::{Order, Side, VenueId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named collection of resting orders, logically partitioned by side.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    orders: Vec<Order>,
}

impl Venue {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(VenueId::new(), name)
    }

    pub fn with_id(id: VenueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            orders: Vec::new(),
        }
    }

    /// Builder method: replace the venue's orders
    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn add_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders that can fill a request of `side`, in book order.
    pub fn counter_orders(&self, side: Side) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter().filter(move |order| order.counters(side))
    }

    /// Total quantity available to a request of `side`.
    ///
    /// # Errors
    /// `Overflow` if the sum does not fit a decimal.
    pub fn available_liquidity(&self, side: Side) -> ExecutionResult<Quantity> {
        checked_sum(self.counter_orders(side).map(|order| order.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_counter_orders() {
        let mut venue = Venue::new("alpha");
        venue.add_order(Order::new(venue.id, Side::Sell, dec!(15), dec!(105)));
        venue.add_order(Order::new(venue.id, Side::Buy, dec!(10), dec!(100)));
        venue.add_order(Order::new(venue.id, Side::Sell, dec!(20), dec!(110)));

        let asks: Vec<_> = venue.counter_orders(Side::Buy).collect();
        assert_eq!(asks.len(), 2);
        assert!(asks.iter().all(|order| order.side == Side::Sell));

        assert_eq!(venue.available_liquidity(Side::Buy), Ok(dec!(35)));
        assert_eq!(venue.available_liquidity(Side::Sell), Ok(dec!(10)));
    }

    #[test]
    fn test_empty_venue() {
        let venue = Venue::new("empty");
        assert!(venue.is_empty());
        assert_eq!(venue.counter_orders(Side::Sell).count(), 0);
        assert_eq!(venue.available_liquidity(Side::Sell), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_available_liquidity_reports_overflow() {
        let mut venue = Venue::new("deep");
        venue.add_order(Order::new(venue.id, Side::Buy, Decimal::MAX, dec!(100)));
        venue.add_order(Order::new(venue.id, Side::Buy, Decimal::MAX, dec!(99)));

        assert_eq!(venue.available_liquidity(Side::Sell), Err(ExecutionError::Overflow));
        assert_eq!(venue.available_liquidity(Side::Buy), Ok(Decimal::ZERO));
    }
}
