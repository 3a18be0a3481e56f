//! 8.8 fixed-point arithmetic
//!
//! Every scene coordinate, ray component and shading term is a 16-bit
//! signed integer scaled by 256: range roughly -128.0 to +127.996 with
//! 1/256 resolution. Products are widened to 32 bits before the shift
//! back down, so intermediate overflow is confined to callers that
//! exceed the scene's coordinate range (none do).

use std::ops::{Add, Mul, Neg, Sub};

/// Number of fractional bits.
pub const FX_SHIFT: u32 = 8;

/// An 8.8 fixed-point number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(i16);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    /// 1.0 = 256
    pub const ONE: Fixed = Fixed(1 << FX_SHIFT);
    /// 0.5 = 128
    pub const HALF: Fixed = Fixed(1 << (FX_SHIFT - 1));

    /// Convert a whole number to fixed point (shift left 8).
    pub const fn from_int(v: i16) -> Self {
        Fixed(v << FX_SHIFT)
    }

    /// Wrap a raw 8.8 bit pattern.
    pub const fn from_raw(raw: i16) -> Self {
        Fixed(raw)
    }

    /// The raw 8.8 bit pattern.
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Truncate to a whole number (arithmetic shift right 8).
    pub const fn to_int(self) -> i16 {
        self.0 >> FX_SHIFT
    }

    /// Widen to i32 for intermediate math that can exceed 16 bits.
    pub const fn wide(self) -> i32 {
        self.0 as i32
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, other: Fixed) -> Fixed {
        Fixed(self.0 + other.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, other: Fixed) -> Fixed {
        Fixed(self.0 - other.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    /// Widen both operands to i32, multiply, shift right 8, narrow back.
    fn mul(self, other: Fixed) -> Fixed {
        Fixed(((self.0 as i32 * other.0 as i32) >> FX_SHIFT) as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        assert_eq!(Fixed::from_int(7).to_int(), 7);
        assert_eq!(Fixed::from_int(-7).to_int(), -7);
        assert_eq!(Fixed::from_int(6).raw(), 1536);
    }

    #[test]
    fn test_truncation_is_arithmetic() {
        // -0.5 truncates toward negative infinity, as on the target's
        // arithmetic shift.
        assert_eq!((-Fixed::HALF).to_int(), -1);
        assert_eq!(Fixed::HALF.to_int(), 0);
    }

    #[test]
    fn test_mul() {
        assert_eq!(Fixed::ONE * Fixed::ONE, Fixed::ONE);
        assert_eq!(Fixed::HALF * Fixed::HALF, Fixed::from_raw(64));
        assert_eq!(Fixed::from_int(3) * Fixed::from_int(-2), Fixed::from_int(-6));
    }

    #[test]
    fn test_mul_widens_intermediate() {
        // 100 * 1.0: the pre-shift product (25600 * 256) overflows i16
        // by a wide margin and must be carried in i32.
        assert_eq!(Fixed::from_int(100) * Fixed::ONE, Fixed::from_int(100));
        assert_eq!(Fixed::from_int(-100) * Fixed::ONE, Fixed::from_int(-100));
    }
}
