// ============================================================================
// Numeric Module
// Exact decimal quantities and prices
// ============================================================================
//
// Prices and quantities are `rust_decimal::Decimal`: base-10, 96-bit
// mantissa, no binary floating point. Fill arithmetic goes through the
// checked helpers below so that an overflow surfaces as an error instead of
// a panic.

use crate::error::{ExecutionError, ExecutionResult};
use rust_decimal::Decimal;

/// Price per unit
pub type Price = Decimal;

/// Amount of the traded asset
pub type Quantity = Decimal;

/// Reject non-positive request amounts.
pub fn ensure_positive(quantity: Quantity) -> ExecutionResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ExecutionError::invalid_argument(
            "amount must be greater than 0",
        ));
    }
    Ok(())
}

/// `lhs - rhs`, mapping overflow to [`ExecutionError::Overflow`].
#[inline]
pub fn checked_sub(lhs: Quantity, rhs: Quantity) -> ExecutionResult<Quantity> {
    lhs.checked_sub(rhs).ok_or(ExecutionError::Overflow)
}

/// `lhs + rhs`, mapping overflow to [`ExecutionError::Overflow`].
#[inline]
pub fn checked_add(lhs: Quantity, rhs: Quantity) -> ExecutionResult<Quantity> {
    lhs.checked_add(rhs).ok_or(ExecutionError::Overflow)
}

/// Sum quantities with overflow checking.
pub fn checked_sum<I>(quantities: I) -> ExecutionResult<Quantity>
where
    I: IntoIterator<Item = Quantity>,
{
    quantities
        .into_iter()
        .try_fold(Decimal::ZERO, checked_add)
}
