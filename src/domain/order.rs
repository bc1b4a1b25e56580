// ============================================================================
// Order Domain Model
// ============================================================================

use crate::domain::Fill;
use crate::error::{ExecutionError, ExecutionResult};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one venue (order book / exchange)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VenueId(Uuid);

impl VenueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VenueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side whose orders can fill a request of this side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ExecutionError;

    /// Only the exact literals `buy` and `sell` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(ExecutionError::invalid_argument(format!(
                "unsupported side '{}', must be buy or sell",
                other
            ))),
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A resting order on one venue.
///
/// Orders are never mutated by the engine. Consuming part of an order
/// produces a [`Fill`] that carries the same identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub venue_id: VenueId,
    pub id: OrderId,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
}

impl Order {
    pub fn new(venue_id: VenueId, side: Side, quantity: Quantity, price: Price) -> Self {
        Self::with_id(venue_id, OrderId::new(), side, quantity, price)
    }

    pub fn with_id(
        venue_id: VenueId,
        id: OrderId,
        side: Side,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self {
            venue_id,
            id,
            side,
            quantity,
            price,
        }
    }

    /// Check that the order can take part in matching.
    pub fn validate(&self) -> ExecutionResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(self.malformed("quantity must be positive"));
        }
        if self.price < Decimal::ZERO {
            return Err(self.malformed("price cannot be negative"));
        }
        Ok(())
    }

    /// Consume `quantity` of this order.
    ///
    /// # Errors
    /// `InvalidArgument` when `quantity` is not in `(0, self.quantity]`.
    pub fn fill(&self, quantity: Quantity) -> ExecutionResult<Fill> {
        if quantity <= Decimal::ZERO || quantity > self.quantity {
            return Err(ExecutionError::invalid_argument(format!(
                "fill of {} is outside (0, {}] for order {}",
                quantity, self.quantity, self.id
            )));
        }
        Ok(Fill::new(
            self.venue_id,
            self.id,
            self.side,
            quantity,
            self.price,
        ))
    }

    /// Whether this order can fill a request of `side`.
    pub fn counters(&self, side: Side) -> bool {
        self.side == side.opposite()
    }

    fn malformed(&self, reason: &str) -> ExecutionError {
        ExecutionError::MalformedOrder {
            venue_id: self.venue_id,
            order_id: self.id,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_parsing() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
        assert!(matches!(
            "hold".parse::<Side>(),
            Err(ExecutionError::InvalidArgument(_))
        ));
        // Boundary literals are exact
        assert!("BUY".parse::<Side>().is_err());
        assert!(" sell".parse::<Side>().is_err());
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::Sell.to_string(), "sell");
    }

    #[test]
    fn test_order_validation() {
        let venue = VenueId::new();
        assert!(Order::new(venue, Side::Sell, dec!(1.5), dec!(0)).validate().is_ok());

        let empty = Order::new(venue, Side::Sell, dec!(0), dec!(100));
        assert!(matches!(
            empty.validate(),
            Err(ExecutionError::MalformedOrder { order_id, .. }) if order_id == empty.id
        ));

        let negative = Order::new(venue, Side::Buy, dec!(1), dec!(-0.01));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_fill_keeps_identity() {
        let order = Order::new(VenueId::new(), Side::Sell, dec!(20), dec!(110));
        let fill = order.fill(dec!(12.5)).unwrap();

        assert_eq!(fill.order_id, order.id);
        assert_eq!(fill.venue_id, order.venue_id);
        assert_eq!(fill.side, Side::Sell);
        assert_eq!(fill.quantity, dec!(12.5));
        assert_eq!(fill.price, dec!(110));
        // Source order untouched
        assert_eq!(order.quantity, dec!(20));
    }

    #[test]
    fn test_overfill_protection() {
        let order = Order::new(VenueId::new(), Side::Sell, dec!(5), dec!(100));
        assert!(order.fill(dec!(5)).is_ok());
        assert!(order.fill(dec!(5.000001)).is_err());
        assert!(order.fill(dec!(0)).is_err());
    }

    #[test]
    fn test_counters() {
        let sell = Order::new(VenueId::new(), Side::Sell, dec!(1), dec!(10));
        assert!(sell.counters(Side::Buy));
        assert!(!sell.counters(Side::Sell));
    }
}
