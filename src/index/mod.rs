// ============================================================================
// Index Module
// Price index backends for one venue's counter-orders
// ============================================================================

mod avl_tree;
mod heap;
mod price_buckets;
mod sorted_vec;

pub mod factory;

pub use avl_tree::AvlTreeIndex;
pub use factory::{build_index, create_index};
pub use heap::BinaryHeapIndex;
pub use price_buckets::{PriceBucketIndex, PriceLevel};
pub use sorted_vec::SortedVecIndex;
