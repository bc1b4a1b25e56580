// ============================================================================
// Fill Collector
// Lock-free sink for fills proposed by concurrent venue workers
// ============================================================================

use crossbeam_skiplist::SkipMap;
use rust_decimal::Decimal;

use crate::domain::{Fill, OrderId, Side};
use crate::error::ExecutionResult;
use crate::interfaces::PriceOrder;
use crate::numeric::{checked_sub, Quantity};

/// Identity of one proposed fill
///
/// Ordered by order id first so that all proposals for the same order sit
/// next to each other, lowest venue position first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalKey {
    pub order_id: OrderId,
    /// Position of the venue in the request
    pub venue_position: usize,
    /// Extraction step inside that venue's walk
    pub sequence: usize,
}

impl ProposalKey {
    pub fn new(order_id: OrderId, venue_position: usize, sequence: usize) -> Self {
        Self {
            order_id,
            venue_position,
            sequence,
        }
    }
}

/// Concurrent fill collector
///
/// Workers record into a shared skip map with insert-if-absent semantics.
/// The final ordering is computed from keys and prices in
/// [`into_ranked_fills`](Self::into_ranked_fills), never from arrival order.
pub struct FillCollector {
    /// Key: proposal identity, Value: proposed fill
    proposals: SkipMap<ProposalKey, Fill>,
}

impl FillCollector {
    pub fn new() -> Self {
        Self {
            proposals: SkipMap::new(),
        }
    }

    /// Record a proposal. A second proposal under an existing key is ignored.
    pub fn record(&self, key: ProposalKey, fill: Fill) {
        self.proposals.get_or_insert(key, fill);
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Dedupe, rank and cap the collected proposals.
    ///
    /// 1. One proposal per order id, the lowest venue position wins
    /// 2. Sort by price (best first for `side`), larger quantity, venue
    ///    position, extraction step
    /// 3. Take proposals best-first until `target` is covered, trimming the
    ///    last one
    pub fn into_ranked_fills(self, side: Side, target: Quantity) -> ExecutionResult<Vec<Fill>> {
        let direction = PriceOrder::for_request(side);

        let mut unique: Vec<(ProposalKey, Fill)> = Vec::with_capacity(self.proposals.len());
        for entry in self.proposals.iter() {
            let key = *entry.key();
            if unique.last().is_some_and(|(last, _)| last.order_id == key.order_id) {
                continue;
            }
            unique.push((key, entry.value().clone()));
        }

        unique.sort_by(|(ka, a), (kb, b)| {
            direction
                .compare(&a.price, &b.price)
                .then_with(|| b.quantity.cmp(&a.quantity))
                .then_with(|| ka.venue_position.cmp(&kb.venue_position))
                .then_with(|| ka.sequence.cmp(&kb.sequence))
                .then_with(|| ka.order_id.cmp(&kb.order_id))
        });

        let mut ranked = Vec::new();
        let mut remaining = target;
        for (_, fill) in unique {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = remaining.min(fill.quantity);
            remaining = checked_sub(remaining, take)?;
            ranked.push(if take < fill.quantity {
                fill.with_quantity(take)
            } else {
                fill
            });
        }

        Ok(ranked)
    }
}

impl Default for FillCollector {
    fn default() -> Self {
        Self::new()
    }
}
