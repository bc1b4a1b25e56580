// ============================================================================
// Price Index Interface
// Defines the contract for pluggable price-ordered order containers
// ============================================================================

use crate::domain::{Order, Side};
use crate::numeric::Price;
use std::cmp::Ordering;

/// Direction in which an index releases orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceOrder {
    /// Cheapest first (sell orders consumed by a buy request)
    Ascending,
    /// Highest first (buy orders consumed by a sell request)
    Descending,
}

impl PriceOrder {
    /// Extraction order that serves a request of `side` best.
    pub fn for_request(side: Side) -> Self {
        match side {
            Side::Buy => PriceOrder::Ascending,
            Side::Sell => PriceOrder::Descending,
        }
    }

    /// Compare two prices so that the better one sorts first.
    #[inline]
    pub fn compare(self, a: &Price, b: &Price) -> Ordering {
        match self {
            PriceOrder::Ascending => a.cmp(b),
            PriceOrder::Descending => b.cmp(a),
        }
    }
}

/// Strategy pattern interface for price indexes
/// Implementations: BinaryHeap, AVL tree, price buckets, sorted vector
///
/// An index is built for one request side and only ever holds the
/// counter-orders for that side. Orders with equal prices are released in
/// insertion order.
pub trait PriceIndex: Send {
    /// Add a counter-order
    fn insert(&mut self, order: Order);

    /// Remove and return the best remaining order
    fn pop_best(&mut self) -> Option<Order>;

    /// Number of orders still held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direction this index releases orders in
    fn price_order(&self) -> PriceOrder;

    /// Get the backend name for logging/metrics
    fn name(&self) -> &str;
}

// ============================================================================
// Priority Key
// ============================================================================

/// Total order over (price, arrival) for one extraction direction.
///
/// The smaller key is the better order: price compares per
/// [`PriceOrder`], arrival sequence breaks ties first-in first-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityKey {
    pub price: Price,
    pub sequence: u64,
    direction: PriceOrder,
}

impl PriorityKey {
    pub fn new(price: Price, sequence: u64, direction: PriceOrder) -> Self {
        Self {
            price,
            sequence,
            direction,
        }
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.direction
            .compare(&self.price, &other.price)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

// ============================================================================
// Lazy Extraction
// ============================================================================

/// Iterator that drains an index best-first.
pub struct ExtractInOrder<'a, I: PriceIndex + ?Sized> {
    index: &'a mut I,
}

impl<I: PriceIndex + ?Sized> Iterator for ExtractInOrder<'_, I> {
    type Item = Order;

    fn next(&mut self) -> Option<Order> {
        self.index.pop_best()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.index.len();
        (len, Some(len))
    }
}

/// Drain `index` lazily in price order.
///
/// Orders not pulled from the iterator stay in the index.
pub fn extract_in_order<I: PriceIndex + ?Sized>(index: &mut I) -> ExtractInOrder<'_, I> {
    ExtractInOrder { index }
}
