//! Integer `a * b / c` with explicit rounding.

use crate::error::{LedgerError, LedgerResult};
use alloy_primitives::U256;

/// Rounding direction for a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// `a * b / c`, rounded as requested.
///
/// `c` must be non-zero; callers check their denominators first so that
/// each zero case maps to its own error.
pub fn mul_div(a: U256, b: U256, c: U256, rounding: Rounding) -> LedgerResult<U256> {
    if c.is_zero() {
        return Err(LedgerError::Overflow("mul_div: zero denominator"));
    }
    let product = a
        .checked_mul(b)
        .ok_or(LedgerError::Overflow("mul_div: product"))?;
    let quotient = product / c;
    match rounding {
        Rounding::Up if !(product % c).is_zero() => Ok(quotient + U256::from(1)),
        _ => Ok(quotient),
    }
}
