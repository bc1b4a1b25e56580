// ============================================================================
// Greedy Matcher
// Walks one venue's index best-first until the target is covered
// ============================================================================

use crate::domain::{Fill, Side};
use crate::engine::CancellationToken;
use crate::error::{ExecutionError, ExecutionResult};
use crate::interfaces::{extract_in_order, PriceIndex, PriceOrder};
use crate::numeric::{checked_sub, ensure_positive, Quantity};
use rust_decimal::Decimal;

/// Fills proposed by one venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Fills in extraction order (best price first)
    pub fills: Vec<Fill>,
    /// Part of the target this venue could not cover
    pub remaining: Quantity,
}

impl MatchOutcome {
    pub fn filled_quantity(&self) -> Quantity {
        self.fills.iter().map(|fill| fill.quantity).sum()
    }
}

/// Greedy matcher for one request side
///
/// Each extracted order contributes `min(remaining, order.quantity)`.
/// The matcher never mutates source orders; partial consumption is
/// expressed only through the fill quantity.
///
/// # Example
/// ```text
/// Index (buy request): sell 15 @ 105, sell 20 @ 110
/// Target: 30
/// Result: 15 @ 105, 15 @ 110, remaining 0
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    side: Side,
    cancellation: Option<CancellationToken>,
}

impl Matcher {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            cancellation: None,
        }
    }

    /// Builder method: Poll `token` before every extraction
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Consume counter-orders from `index` until `target` is covered or the
    /// index runs dry.
    ///
    /// # Errors
    /// - `InvalidArgument` if `target <= 0` or the index is ordered for the
    ///   other side; the index is left untouched
    /// - `SameSideOrder` if an extracted order carries the requested side
    /// - `Cancelled` if the token fires mid-walk
    /// - `Overflow` on decimal overflow
    pub fn fill<I>(&self, index: &mut I, target: Quantity) -> ExecutionResult<MatchOutcome>
    where
        I: PriceIndex + ?Sized,
    {
        ensure_positive(target)?;

        let expected = PriceOrder::for_request(self.side);
        if index.price_order() != expected {
            return Err(ExecutionError::invalid_argument(format!(
                "{} index is ordered {:?}, a {} request needs {:?}",
                index.name(),
                index.price_order(),
                self.side,
                expected
            )));
        }

        let mut fills = Vec::new();
        let mut remaining = target;

        while remaining > Decimal::ZERO {
            if self.is_cancelled() {
                return Err(ExecutionError::Cancelled);
            }

            let Some(order) = extract_in_order(&mut *index).next() else {
                break;
            };

            if !order.counters(self.side) {
                return Err(ExecutionError::SameSideOrder { order_id: order.id });
            }

            let quantity = remaining.min(order.quantity);
            let fill = order.fill(quantity)?;
            remaining = checked_sub(remaining, quantity)?;
            fills.push(fill);
        }

        tracing::trace!(
            side = %self.side,
            fills = fills.len(),
            %remaining,
            "venue walk finished"
        );

        Ok(MatchOutcome { fills, remaining })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IndexBackend, Order, VenueId};
    use crate::index::{build_index, create_index, BinaryHeapIndex};
    use rust_decimal_macros::dec;

    fn asks(venue: VenueId) -> Vec<Order> {
        vec![
            Order::new(venue, Side::Sell, dec!(15), dec!(105)),
            Order::new(venue, Side::Sell, dec!(20), dec!(110)),
        ]
    }

    #[test]
    fn test_partial_fill_of_last_order() {
        let venue = VenueId::new();
        let orders = asks(venue);
        let mut index = build_index(IndexBackend::AvlTree, Side::Buy, &orders).unwrap();

        let outcome = Matcher::new(Side::Buy).fill(index.as_mut(), dec!(30)).unwrap();

        assert_eq!(outcome.remaining, dec!(0));
        assert_eq!(outcome.fills.len(), 2);
        assert_eq!((outcome.fills[0].quantity, outcome.fills[0].price), (dec!(15), dec!(105)));
        assert_eq!((outcome.fills[1].quantity, outcome.fills[1].price), (dec!(15), dec!(110)));
        assert_eq!(outcome.fills[1].order_id, orders[1].id);
        // The walk stops as soon as the target is covered
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_stops_without_touching_surplus() {
        let venue = VenueId::new();
        let mut index = build_index(IndexBackend::BinaryHeap, Side::Buy, &asks(venue)).unwrap();

        let outcome = Matcher::new(Side::Buy).fill(index.as_mut(), dec!(10)).unwrap();
        assert_eq!(outcome.fills.len(), 1);
        assert_eq!(outcome.filled_quantity(), dec!(10));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_insufficient_liquidity_is_not_an_error() {
        let venue = VenueId::new();
        let mut index = build_index(IndexBackend::SortedVec, Side::Buy, &asks(venue)).unwrap();

        let outcome = Matcher::new(Side::Buy).fill(index.as_mut(), dec!(50)).unwrap();
        assert_eq!(outcome.filled_quantity(), dec!(35));
        assert_eq!(outcome.remaining, dec!(15));
    }

    #[test]
    fn test_non_positive_target_leaves_index_untouched() {
        let venue = VenueId::new();
        let mut index = build_index(IndexBackend::PriceBuckets, Side::Buy, &asks(venue)).unwrap();

        for target in [dec!(0), dec!(-1)] {
            let result = Matcher::new(Side::Buy).fill(index.as_mut(), target);
            assert!(matches!(result, Err(ExecutionError::InvalidArgument(_))));
        }
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_wrong_direction_is_rejected() {
        let mut index = create_index(IndexBackend::BinaryHeap, Side::Sell);
        let result = Matcher::new(Side::Buy).fill(index.as_mut(), dec!(1));
        assert!(matches!(result, Err(ExecutionError::InvalidArgument(_))));
    }

    #[test]
    fn test_same_side_order_is_rejected() {
        let venue = VenueId::new();
        // Bypass build_index filtering by inserting directly
        let mut index = BinaryHeapIndex::new(PriceOrder::Ascending);
        let stray = Order::new(venue, Side::Buy, dec!(5), dec!(100));
        index.insert(stray.clone());

        let result = Matcher::new(Side::Buy).fill(&mut index, dec!(1));
        assert_eq!(result, Err(ExecutionError::SameSideOrder { order_id: stray.id }));
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let venue = VenueId::new();
        let mut index = build_index(IndexBackend::AvlTree, Side::Buy, &asks(venue)).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = Matcher::new(Side::Buy)
            .with_cancellation(token)
            .fill(index.as_mut(), dec!(1));
        assert_eq!(result, Err(ExecutionError::Cancelled));
    }

    /// Cancels its token when the given pop is served
    struct CancelOnPop {
        inner: BinaryHeapIndex,
        token: CancellationToken,
        cancel_on: usize,
        pops: usize,
    }

    impl PriceIndex for CancelOnPop {
        fn insert(&mut self, order: Order) {
            self.inner.insert(order);
        }

        fn pop_best(&mut self) -> Option<Order> {
            self.pops += 1;
            if self.pops == self.cancel_on {
                self.token.cancel();
            }
            self.inner.pop_best()
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn price_order(&self) -> PriceOrder {
            self.inner.price_order()
        }

        fn name(&self) -> &str {
            "cancel-on-pop"
        }
    }

    #[test]
    fn test_cancellation_mid_walk_leaves_rest_of_index() {
        let venue = VenueId::new();
        let token = CancellationToken::new();
        let mut index = CancelOnPop {
            inner: BinaryHeapIndex::new(PriceOrder::Ascending),
            token: token.clone(),
            cancel_on: 3,
            pops: 0,
        };
        for price in 100..110 {
            index.insert(Order::new(venue, Side::Sell, dec!(1), Decimal::from(price)));
        }

        let result = Matcher::new(Side::Buy)
            .with_cancellation(token.clone())
            .fill(&mut index, dec!(100));

        assert_eq!(result, Err(ExecutionError::Cancelled));
        assert!(token.is_cancelled());
        assert_eq!(index.pops, 3);
        assert_eq!(index.len(), 7);
        assert_eq!(index.pop_best().map(|order| order.price), Some(dec!(103)));
    }

    #[test]
    fn test_empty_index() {
        let mut index = create_index(IndexBackend::PriceBuckets, Side::Sell);
        let outcome = Matcher::new(Side::Sell).fill(index.as_mut(), dec!(3)).unwrap();
        assert!(outcome.fills.is_empty());
        assert_eq!(outcome.remaining, dec!(3));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_fills_cover_min_of_target_and_liquidity(
                quantities in prop::collection::vec(1u32..100, 0..50),
                target in 1u32..3000,
                backend_pick in 0usize..4,
            ) {
                let venue = VenueId::new();
                let orders: Vec<_> = quantities
                    .iter()
                    .enumerate()
                    .map(|(i, q)| {
                        Order::new(venue, Side::Buy, Decimal::from(*q), Decimal::from(500 + (i % 7) as u32))
                    })
                    .collect();
                let available: Decimal = orders.iter().map(|o| o.quantity).sum();
                let target = Decimal::from(target);

                let backend = IndexBackend::ALL[backend_pick];
                let mut index = build_index(backend, Side::Sell, &orders).unwrap();
                let outcome = Matcher::new(Side::Sell).fill(index.as_mut(), target).unwrap();

                prop_assert_eq!(outcome.filled_quantity(), target.min(available));
                prop_assert_eq!(outcome.remaining, (target - available).max(Decimal::ZERO));
                prop_assert!(outcome.fills.iter().all(|f| f.side == Side::Buy));
                prop_assert!(outcome.fills.windows(2).all(|w| w[0].price >= w[1].price));
            }
        }
    }
}
