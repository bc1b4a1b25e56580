// ============================================================================
// Fill Domain Model
// ============================================================================

use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;

use super::{OrderId, Side, VenueId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consumption of (part of) one resting order toward a request.
///
/// Carries the identity of the source order; `quantity` is the amount
/// actually taken and never exceeds the source order's quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fill {
    /// Venue the source order rests on
    pub venue_id: VenueId,

    /// Source order identity
    pub order_id: OrderId,

    /// Side of the source order (opposite of the request)
    pub side: Side,

    /// Consumed quantity
    pub quantity: Quantity,

    /// Execution price (the source order's limit price)
    pub price: Price,
}

impl Fill {
    pub(crate) fn new(
        venue_id: VenueId,
        order_id: OrderId,
        side: Side,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self {
            venue_id,
            order_id,
            side,
            quantity,
            price,
        }
    }

    /// Same fill with a smaller quantity.
    pub(crate) fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Notional value of the fill (price * quantity).
    ///
    /// Returns `None` if the multiplication overflows.
    pub fn notional_value(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}
