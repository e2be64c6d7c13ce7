//! Fixed-point codec between human-readable decimals and Core integers.
//!
//! Uses `rust_decimal` for exact decimal arithmetic. Every conversion takes
//! the decimal precision as an explicit argument; there is no default scale.
//!
//! `scale` truncates toward zero. Callers that need a minimum-received
//! guarantee must round up themselves before scaling.

use crate::error::{CoreError, CoreResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Precision of limit prices and sizes in Core trading actions (1e8).
pub const TRADING_DECIMALS: u8 = 8;

/// Largest precision `Decimal` can represent exactly.
pub const MAX_DECIMALS: u8 = 28;

fn pow10(decimals: u8) -> CoreResult<Decimal> {
    if decimals > MAX_DECIMALS {
        return Err(CoreError::UnsupportedDecimals(decimals));
    }
    Ok(Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0))
}

/// Scale a human amount to an integer at `decimals` precision.
///
/// Computes `floor(amount * 10^decimals)`. Fails on negative input or when
/// the result does not fit in a `u64`.
pub fn scale(amount: Decimal, decimals: u8) -> CoreResult<u64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::NegativeAmount(amount.to_string()));
    }
    let factor = pow10(decimals)?;
    let scaled = amount
        .checked_mul(factor)
        .ok_or_else(|| CoreError::ScaleOverflow(format!("{amount} * 10^{decimals}")))?
        .trunc();
    scaled
        .to_u64()
        .ok_or_else(|| CoreError::ScaleOverflow(format!("{amount} * 10^{decimals}")))
}

/// Inverse of [`scale`]: exact division by `10^decimals`.
///
/// `decimals` above [`MAX_DECIMALS`] is clamped, which never happens for
/// values produced by [`scale`].
pub fn unscale(amount_scaled: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(amount_scaled as i128, decimals.min(MAX_DECIMALS) as u32)
}

/// An integer amount tagged with the precision it was scaled at.
///
/// Operations that forward amounts to Core check the tag against the
/// precision they require, so an amount scaled for one network or one
/// token can never be forwarded as if it were scaled for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaledAmount {
    raw: u64,
    decimals: u8,
}

impl ScaledAmount {
    /// Scale a human amount (truncating).
    pub fn from_human(amount: Decimal, decimals: u8) -> CoreResult<Self> {
        Ok(Self {
            raw: scale(amount, decimals)?,
            decimals,
        })
    }

    /// Wrap an amount that is already scaled at `decimals`.
    pub fn from_raw(raw: u64, decimals: u8) -> CoreResult<Self> {
        if decimals > MAX_DECIMALS {
            return Err(CoreError::UnsupportedDecimals(decimals));
        }
        Ok(Self { raw, decimals })
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.raw
    }

    #[inline]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    pub fn to_human(&self) -> Decimal {
        unscale(self.raw, self.decimals)
    }

    /// Fail with `ScaleMismatch` unless this amount was scaled at `expected`.
    pub fn require_decimals(&self, expected: u8, context: &'static str) -> CoreResult<()> {
        if self.decimals != expected {
            return Err(CoreError::ScaleMismatch {
                context,
                expected,
                actual: self.decimals,
            });
        }
        Ok(())
    }

    /// Fail with `ZeroAmount` if the scaled value is zero.
    pub fn require_non_zero(&self) -> CoreResult<()> {
        if self.is_zero() {
            return Err(CoreError::ZeroAmount);
        }
        Ok(())
    }
}

impl fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}e-{}", self.raw, self.decimals)
    }
}

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to keep prices and sizes apart in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Scale to the Core trading precision (1e8), truncating.
    pub fn to_scaled(&self) -> CoreResult<u64> {
        scale(self.0, TRADING_DECIMALS)
    }

    /// `None` on overflow.
    pub fn checked_mul(&self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}


/// Size/quantity with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Absolute magnitude of a signed size.
    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Scale to the Core trading precision (1e8), truncating.
    pub fn to_scaled(&self) -> CoreResult<u64> {
        scale(self.0, TRADING_DECIMALS)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
