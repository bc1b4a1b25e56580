// ============================================================================
// Binary Heap Price Index
// Priority queue over (price, arrival)
// ============================================================================

use crate::domain::Order;
use crate::interfaces::{PriceIndex, PriceOrder, PriorityKey};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

struct HeapEntry {
    key: PriorityKey,
    order: Order,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Binary heap price index
///
/// `BinaryHeap` is a max-heap; wrapping entries in `Reverse` turns it into a
/// min-heap on [`PriorityKey`], whose minimum is the best order.
pub struct BinaryHeapIndex {
    heap: BinaryHeap<Reverse<HeapEntry>>,
    direction: PriceOrder,
    next_sequence: u64,
}

impl BinaryHeapIndex {
    pub fn new(direction: PriceOrder) -> Self {
        Self {
            heap: BinaryHeap::new(),
            direction,
            next_sequence: 0,
        }
    }

    pub fn with_capacity(direction: PriceOrder, capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            direction,
            next_sequence: 0,
        }
    }

    /// Best order without removing it
    pub fn peek_best(&self) -> Option<&Order> {
        self.heap.peek().map(|Reverse(entry)| &entry.order)
    }
}

impl PriceIndex for BinaryHeapIndex {
    fn insert(&mut self, order: Order) {
        let key = PriorityKey::new(order.price, self.next_sequence, self.direction);
        self.next_sequence += 1;
        self.heap.push(Reverse(HeapEntry { key, order }));
    }

    fn pop_best(&mut self) -> Option<Order> {
        self.heap.pop().map(|Reverse(entry)| entry.order)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn price_order(&self) -> PriceOrder {
        self.direction
    }

    fn name(&self) -> &str {
        "BinaryHeap"
    }
}
