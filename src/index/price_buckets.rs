// ============================================================================
// Price Bucket Index
// Sorted map of FIFO buckets keyed by price
// ============================================================================

use crossbeam::queue::SegQueue;
use crossbeam_skiplist::SkipMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::Order;
use crate::error::ExecutionResult;
use crate::interfaces::{PriceIndex, PriceOrder};
use crate::numeric::{checked_add, checked_sub, Price, Quantity};

// ============================================================================
// Price Level
// ============================================================================

/// All orders resting at one price, in arrival order
#[derive(Debug)]
pub struct PriceLevel {
    pub price: Price,
    /// Lock-free FIFO queue of orders
    orders: SegQueue<Order>,
    /// Total quantity at this price level, `Err` once it has overflowed
    total_quantity: Mutex<ExecutionResult<Quantity>>,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: SegQueue::new(),
            total_quantity: Mutex::new(Ok(Decimal::ZERO)),
        }
    }

    pub fn push(&self, order: Order) {
        {
            let mut total = self.total_quantity.lock();
            if let Ok(current) = *total {
                *total = checked_add(current, order.quantity);
            }
        }
        self.orders.push(order);
    }

    pub fn pop(&self) -> Option<Order> {
        let order = self.orders.pop()?;
        let mut total = self.total_quantity.lock();
        if let Ok(current) = *total {
            *total = checked_sub(current, order.quantity);
        }
        Some(order)
    }

    /// # Errors
    /// `Overflow` if the running total ever overflowed.
    pub fn total_quantity(&self) -> ExecutionResult<Quantity> {
        self.total_quantity.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ============================================================================
// Price Bucket Index
// ============================================================================

/// Price bucket index
///
/// Uses a skip list for the sorted price levels; the best level is the
/// front (ascending) or back (descending) entry. Inside a level orders come
/// out first-in first-out.
pub struct PriceBucketIndex {
    /// Key: price, Value: level holding every order at that price
    levels: SkipMap<Price, PriceLevel>,
    direction: PriceOrder,
    len: usize,
}

impl PriceBucketIndex {
    pub fn new(direction: PriceOrder) -> Self {
        Self {
            levels: SkipMap::new(),
            direction,
            len: 0,
        }
    }

    /// Number of distinct price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Best price currently held
    pub fn best_price(&self) -> Option<Price> {
        self.best_entry().map(|entry| entry.value().price)
    }

    /// Aggregated (price, quantity) for the best `num_levels` levels
    ///
    /// # Errors
    /// `Overflow` if a level total overflowed.
    pub fn depth(&self, num_levels: usize) -> ExecutionResult<Vec<(Price, Quantity)>> {
        let iter: Box<dyn Iterator<Item = _>> = match self.direction {
            PriceOrder::Ascending => Box::new(self.levels.iter()),
            PriceOrder::Descending => Box::new(self.levels.iter().rev()),
        };

        iter.take(num_levels)
            .map(|entry| {
                let level = entry.value();
                Ok((level.price, level.total_quantity()?))
            })
            .collect()
    }

    fn best_entry(&self) -> Option<crossbeam_skiplist::map::Entry<'_, Price, PriceLevel>> {
        match self.direction {
            PriceOrder::Ascending => self.levels.front(),
            PriceOrder::Descending => self.levels.back(),
        }
    }
}

impl PriceIndex for PriceBucketIndex {
    fn insert(&mut self, order: Order) {
        // Get or insert price level
        let level = self
            .levels
            .get_or_insert(order.price, PriceLevel::new(order.price));

        level.value().push(order);
        self.len += 1;
    }

    fn pop_best(&mut self) -> Option<Order> {
        let order = loop {
            let entry = self.best_entry()?;
            if let Some(order) = entry.value().pop() {
                if entry.value().is_empty() {
                    entry.remove();
                }
                break order;
            }
            // Drained level left behind, drop it and look again
            entry.remove();
        };

        self.len -= 1;
        Some(order)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn price_order(&self) -> PriceOrder {
        self.direction
    }

    fn name(&self) -> &str {
        "PriceBuckets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Side, VenueId};
    use crate::error::ExecutionError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_level() {
        let level = PriceLevel::new(dec!(50000));
        level.push(Order::new(VenueId::new(), Side::Buy, dec!(1.25), dec!(50000)));
        level.push(Order::new(VenueId::new(), Side::Buy, dec!(0.75), dec!(50000)));

        assert_eq!(level.total_quantity(), Ok(dec!(2)));
        assert_eq!(level.len(), 2);

        let first = level.pop().unwrap();
        assert_eq!(first.quantity, dec!(1.25));
        assert_eq!(level.total_quantity(), Ok(dec!(0.75)));
        assert!(!level.is_empty());
    }

    #[test]
    fn test_level_total_reports_overflow() {
        let level = PriceLevel::new(dec!(1));
        level.push(Order::new(VenueId::new(), Side::Sell, Decimal::MAX, dec!(1)));
        assert_eq!(level.total_quantity(), Ok(Decimal::MAX));

        level.push(Order::new(VenueId::new(), Side::Sell, Decimal::MAX, dec!(1)));
        assert_eq!(level.total_quantity(), Err(ExecutionError::Overflow));
        assert_eq!(level.len(), 2);

        let mut index = PriceBucketIndex::new(PriceOrder::Ascending);
        index.insert(Order::new(VenueId::new(), Side::Sell, Decimal::MAX, dec!(1)));
        index.insert(Order::new(VenueId::new(), Side::Sell, dec!(1), dec!(1)));
        assert_eq!(index.depth(1), Err(ExecutionError::Overflow));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_best_price_per_direction() {
        let venue = VenueId::new();
        let mut bids = PriceBucketIndex::new(PriceOrder::Descending);
        let mut asks = PriceBucketIndex::new(PriceOrder::Ascending);
        for price in [dec!(50000), dec!(50100), dec!(49900)] {
            bids.insert(Order::new(venue, Side::Buy, dec!(1), price));
            asks.insert(Order::new(venue, Side::Sell, dec!(1), price));
        }

        // Best bid is the highest price, best ask the lowest
        assert_eq!(bids.best_price(), Some(dec!(50100)));
        assert_eq!(asks.best_price(), Some(dec!(49900)));
    }

    #[test]
    fn test_levels_are_removed_when_drained() {
        let venue = VenueId::new();
        let mut index = PriceBucketIndex::new(PriceOrder::Ascending);
        index.insert(Order::new(venue, Side::Sell, dec!(15), dec!(105)));
        index.insert(Order::new(venue, Side::Sell, dec!(5), dec!(105)));
        index.insert(Order::new(venue, Side::Sell, dec!(20), dec!(110)));

        assert_eq!(index.level_count(), 2);
        assert_eq!(
            index.depth(5).unwrap(),
            vec![(dec!(105), dec!(20)), (dec!(110), dec!(20))]
        );

        assert_eq!(index.pop_best().map(|o| o.quantity), Some(dec!(15)));
        assert_eq!(index.pop_best().map(|o| o.quantity), Some(dec!(5)));
        assert_eq!(index.level_count(), 1);
        assert_eq!(index.pop_best().map(|o| o.price), Some(dec!(110)));
        assert_eq!(index.pop_best(), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_equal_decimal_values_share_a_level() {
        let venue = VenueId::new();
        let mut index = PriceBucketIndex::new(PriceOrder::Descending);
        index.insert(Order::new(venue, Side::Buy, dec!(1), dec!(110)));
        index.insert(Order::new(venue, Side::Buy, dec!(1), dec!(110.00)));

        assert_eq!(index.level_count(), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_depth_descending() {
        let venue = VenueId::new();
        let mut index = PriceBucketIndex::new(PriceOrder::Descending);
        for (qty, price) in [(dec!(20), dec!(110)), (dec!(20), dec!(108)), (dec!(20), dec!(116))] {
            index.insert(Order::new(venue, Side::Buy, qty, price));
        }

        assert_eq!(
            index.depth(2).unwrap(),
            vec![(dec!(116), dec!(20)), (dec!(110), dec!(20))]
        );
    }
}
