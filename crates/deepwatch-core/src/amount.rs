use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{CheckedSub, ToPrimitive, Zero};

use crate::constants::DECIMAL_PLACES;
use crate::error::DeepwatchError;

/// Arbitrary-precision unsigned DPR amount in full on-chain precision
/// (18 implied decimal places).
///
/// Validated balances range up to 10^50, past the end of `u128`, so every
/// arithmetic step stays in `BigUint` and amounts cross the engine boundary
/// as base-10 strings. No floating point anywhere on the path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_u128(value: u128) -> Self {
        Self(BigUint::from(value))
    }

    /// Whole-DPR constructor: scales by 10^18 into on-chain units.
    pub fn from_dpr(dpr: u64) -> Self {
        Self(BigUint::from(dpr) * BigUint::from(10u32).pow(DECIMAL_PLACES))
    }

    /// 10^exponent in raw (unscaled) units.
    pub fn pow10(exponent: u32) -> Self {
        Self::from_u128(10).pow(exponent)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self − rhs`, or `None` if the result would be negative.
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_sub(&rhs.0).map(Self)
    }

    /// `self − rhs`, clamped to zero.
    pub fn saturating_sub(&self, rhs: &Self) -> Self {
        self.checked_sub(rhs).unwrap_or_else(Self::zero)
    }

    /// `self^exponent`.
    pub fn pow(&self, exponent: u32) -> Self {
        Self(self.0.pow(exponent))
    }

    /// Quotient rounded half-up to a whole unit. Division by zero is a
    /// reported error, never coerced to zero or infinity.
    pub fn div_round(&self, divisor: &Self) -> Result<Self, DeepwatchError> {
        if divisor.is_zero() {
            return Err(DeepwatchError::DivisionByZero);
        }
        let quotient = &self.0 / &divisor.0;
        let remainder = &self.0 % &divisor.0;
        if &remainder * 2u32 >= divisor.0 {
            Ok(Self(quotient + 1u32))
        } else {
            Ok(Self(quotient))
        }
    }

    /// Quotient rounded up to a whole unit.
    pub fn div_ceil(&self, divisor: &Self) -> Result<Self, DeepwatchError> {
        if divisor.is_zero() {
            return Err(DeepwatchError::DivisionByZero);
        }
        let quotient = &self.0 / &divisor.0;
        let remainder = &self.0 % &divisor.0;
        if remainder.is_zero() {
            Ok(Self(quotient))
        } else {
            Ok(Self(quotient + 1u32))
        }
    }

    /// Narrow to `u128`; `None` once the value no longer fits.
    pub fn to_u128(&self) -> Option<u128> {
        self.0.to_u128()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl Mul<&Amount> for &Amount {
    type Output = Amount;

    fn mul(self, rhs: &Amount) -> Amount {
        Amount(&self.0 * &rhs.0)
    }
}

impl FromStr for Amount {
    type Err = DeepwatchError;

    /// Strict base-10 parse, ASCII digits only. No sign and no fractional
    /// point; anything else is treated as corrupted data.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DeepwatchError::InvalidBalance(s.to_string()));
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| DeepwatchError::InvalidBalance(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
