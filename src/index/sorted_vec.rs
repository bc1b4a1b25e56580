// ============================================================================
// Sorted Vector Price Index
// Collect first, sort once, then scan
// ============================================================================

use crate::domain::Order;
use crate::interfaces::{PriceIndex, PriceOrder, PriorityKey};

/// Sorted vector price index
///
/// Inserts append; the first extraction after an insert sorts the vector
/// worst-first so the best order can be popped off the end.
pub struct SortedVecIndex {
    entries: Vec<(PriorityKey, Order)>,
    direction: PriceOrder,
    next_sequence: u64,
    sorted: bool,
}

impl SortedVecIndex {
    pub fn new(direction: PriceOrder) -> Self {
        Self {
            entries: Vec::new(),
            direction,
            next_sequence: 0,
            sorted: true,
        }
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.entries.sort_unstable_by(|(a, _), (b, _)| b.cmp(a));
            self.sorted = true;
        }
    }
}

impl PriceIndex for SortedVecIndex {
    fn insert(&mut self, order: Order) {
        let key = PriorityKey::new(order.price, self.next_sequence, self.direction);
        self.next_sequence += 1;
        self.entries.push((key, order));
        self.sorted = false;
    }

    fn pop_best(&mut self) -> Option<Order> {
        self.ensure_sorted();
        self.entries.pop().map(|(_, order)| order)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn price_order(&self) -> PriceOrder {
        self.direction
    }

    fn name(&self) -> &str {
        "SortedVec"
    }
}
