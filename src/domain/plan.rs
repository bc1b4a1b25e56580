// ============================================================================
// Execution Plan
// Ranked result of a best-execution request
// ============================================================================

use crate::error::ExecutionError;
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

use super::{Fill, Side, VenueId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Failure confined to one venue, reported next to the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VenueDiagnostic {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub error: ExecutionError,
}

/// One row of the plan as seen by boundary adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanEntry {
    pub venue_id: VenueId,
    /// Side of the counter-order being taken
    pub order_type: Side,
    pub amount: Quantity,
    pub price: Price,
}

/// Fills ranked best-to-worst, plus per-venue diagnostics.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionPlan {
    /// Requested side
    pub side: Side,
    /// Requested quantity
    pub requested: Quantity,
    /// Fills ordered by price (ascending for buy, descending for sell)
    pub fills: Vec<Fill>,
    /// Venues that failed and contributed nothing
    pub diagnostics: Vec<VenueDiagnostic>,
    pub computed_at: DateTime<Utc>,
}

impl ExecutionPlan {
    pub fn new(
        side: Side,
        requested: Quantity,
        fills: Vec<Fill>,
        diagnostics: Vec<VenueDiagnostic>,
    ) -> Self {
        Self {
            side,
            requested,
            fills,
            diagnostics,
            computed_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Sum of fill quantities.
    pub fn filled_quantity(&self) -> Quantity {
        self.fills.iter().map(|fill| fill.quantity).sum()
    }

    /// Part of the request that no venue could fill.
    pub fn unfilled_quantity(&self) -> Quantity {
        (self.requested - self.filled_quantity()).max(Decimal::ZERO)
    }

    pub fn is_fully_filled(&self) -> bool {
        self.unfilled_quantity().is_zero()
    }

    /// Total notional value. `None` on overflow.
    pub fn total_cost(&self) -> Option<Decimal> {
        self.fills.iter().try_fold(Decimal::ZERO, |acc, fill| {
            fill.notional_value().and_then(|value| acc.checked_add(value))
        })
    }

    /// Volume-weighted average price, `None` when nothing was filled.
    pub fn average_price(&self) -> Option<Price> {
        let filled = self.filled_quantity();
        if filled.is_zero() {
            return None;
        }
        self.total_cost()?.checked_div(filled)
    }

    /// Rows in the shape boundary adapters render.
    pub fn entries(&self) -> Vec<PlanEntry> {
        self.fills
            .iter()
            .map(|fill| PlanEntry {
                venue_id: fill.venue_id,
                order_type: fill.side,
                amount: fill.quantity,
                price: fill.price,
            })
            .collect()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Plan rows as a JSON array
    #[cfg(feature = "serde")]
    pub fn entries_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries())
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VenueId | OrderType | Amount | Price")?;
        for entry in self.entries() {
            writeln!(
                f,
                "{} | {} | {} | {}",
                entry.venue_id, entry.order_type, entry.amount, entry.price
            )?;
        }
        if !self.is_fully_filled() {
            writeln!(f, "unfilled: {}", self.unfilled_quantity())?;
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "venue {} failed: {}", diagnostic.venue_name, diagnostic.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderId;
    use rust_decimal_macros::dec;

    fn fill(quantity: Decimal, price: Decimal) -> Fill {
        Fill::new(VenueId::new(), OrderId::new(), Side::Sell, quantity, price)
    }

    #[test]
    fn test_quantities() {
        let plan = ExecutionPlan::new(
            Side::Buy,
            dec!(50),
            vec![fill(dec!(15), dec!(105)), fill(dec!(20), dec!(110))],
            Vec::new(),
        );

        assert_eq!(plan.filled_quantity(), dec!(35));
        assert_eq!(plan.unfilled_quantity(), dec!(15));
        assert!(!plan.is_fully_filled());
        assert_eq!(plan.total_cost(), Some(dec!(3775)));
        assert_eq!(plan.average_price(), Some(dec!(3775) / dec!(35)));
    }

    #[test]
    fn test_empty_plan() {
        let plan = ExecutionPlan::new(Side::Sell, dec!(1), Vec::new(), Vec::new());
        assert!(plan.is_empty());
        assert_eq!(plan.average_price(), None);
        assert_eq!(plan.unfilled_quantity(), dec!(1));
    }

    #[test]
    fn test_entries_and_table() {
        let plan = ExecutionPlan::new(
            Side::Buy,
            dec!(5),
            vec![fill(dec!(5), dec!(105))],
            Vec::new(),
        );

        let entries = plan.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].order_type, Side::Sell);
        assert_eq!(entries[0].amount, dec!(5));

        let table = plan.to_string();
        assert!(table.starts_with("VenueId | OrderType | Amount | Price"));
        assert!(table.contains("| sell | 5 | 105"));
        assert!(!table.contains("unfilled"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_entries_json() {
        let plan = ExecutionPlan::new(Side::Sell, dec!(5), vec![fill(dec!(5), dec!(110))], Vec::new());
        let json: serde_json::Value = serde_json::from_str(&plan.entries_json().unwrap()).unwrap();

        assert_eq!(json[0]["order_type"], "sell");
        assert_eq!(json[0]["amount"], "5");
        assert_eq!(json[0]["price"], "110");
    }
}
