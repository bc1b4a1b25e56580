// ============================================================================
// Price Index Factory
// Creates price indexes from configuration
// ============================================================================

use crate::domain::{IndexBackend, Order, Side};
use crate::error::ExecutionResult;
use crate::index::{AvlTreeIndex, BinaryHeapIndex, PriceBucketIndex, SortedVecIndex};
use crate::interfaces::{PriceIndex, PriceOrder};

/// Creates an empty index serving a request of `request_side`
///
/// # Example
/// ```
/// use meta_exchange::prelude::*;
/// use meta_exchange::index::create_index;
///
/// let index = create_index(IndexBackend::AvlTree, Side::Buy);
/// assert_eq!(index.price_order(), PriceOrder::Ascending);
/// assert!(index.is_empty());
/// ```
pub fn create_index(backend: IndexBackend, request_side: Side) -> Box<dyn PriceIndex> {
    let direction = PriceOrder::for_request(request_side);
    match backend {
        IndexBackend::BinaryHeap => Box::new(BinaryHeapIndex::new(direction)),
        IndexBackend::AvlTree => Box::new(AvlTreeIndex::new(direction)),
        IndexBackend::PriceBuckets => Box::new(PriceBucketIndex::new(direction)),
        IndexBackend::SortedVec => Box::new(SortedVecIndex::new(direction)),
    }
}

/// Creates an index holding the counter-orders of `orders` for `request_side`
///
/// Same-side orders are skipped. Every inserted order is validated first.
///
/// # Errors
/// `MalformedOrder` for the first counter-order failing validation.
pub fn build_index<'a, I>(
    backend: IndexBackend,
    request_side: Side,
    orders: I,
) -> ExecutionResult<Box<dyn PriceIndex>>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut index = create_index(backend, request_side);
    for order in orders {
        if !order.counters(request_side) {
            continue;
        }
        order.validate()?;
        index.insert(order.clone());
    }
    Ok(index)
}
