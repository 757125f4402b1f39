//! Scalar numeric semantics shared by the interpreter: trapping integer
//! division, trapping and saturating float-to-int conversions, and the
//! IEEE 754 min/max rules.

use crate::traps::Trap;

pub(crate) fn i32_div_s(a: i32, b: i32) -> Result<i32, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    a.checked_div(b).ok_or(Trap::IntegerOverflow)
}

pub(crate) fn i32_div_u(a: u32, b: u32) -> Result<u32, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    Ok(a / b)
}

/// `INT_MIN % -1` is defined as 0, so only zero traps here.
pub(crate) fn i32_rem_s(a: i32, b: i32) -> Result<i32, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    Ok(a.wrapping_rem(b))
}

pub(crate) fn i32_rem_u(a: u32, b: u32) -> Result<u32, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    Ok(a % b)
}

pub(crate) fn i64_div_s(a: i64, b: i64) -> Result<i64, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    a.checked_div(b).ok_or(Trap::IntegerOverflow)
}

pub(crate) fn i64_div_u(a: u64, b: u64) -> Result<u64, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    Ok(a / b)
}

pub(crate) fn i64_rem_s(a: i64, b: i64) -> Result<i64, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    Ok(a.wrapping_rem(b))
}

pub(crate) fn i64_rem_u(a: u64, b: u64) -> Result<u64, Trap> {
    if b == 0 {
        return Err(Trap::IntegerDivisionByZero);
    }
    Ok(a % b)
}

/// Trapping float-to-int truncation: NaN is a conversion error, any
/// truncated value outside the target range is an overflow. The bounds are
/// exclusive above and inclusive below because the negative power of two
/// is exactly representable.
macro_rules! trunc {
    ($name:ident, $from:ty, $to:ty, $min:expr, $max_excl:expr) => {
        pub(crate) fn $name(x: $from) -> Result<$to, Trap> {
            if x.is_nan() {
                return Err(Trap::BadConversionToInteger);
            }
            let t = x.trunc();
            if t >= $max_excl || t < $min {
                return Err(Trap::IntegerOverflow);
            }
            Ok(t as $to)
        }
    };
}

trunc!(i32_trunc_f32, f32, i32, -2_147_483_648.0_f32, 2_147_483_648.0_f32);
trunc!(u32_trunc_f32, f32, u32, 0.0_f32, 4_294_967_296.0_f32);
trunc!(i32_trunc_f64, f64, i32, -2_147_483_648.0_f64, 2_147_483_648.0_f64);
trunc!(u32_trunc_f64, f64, u32, 0.0_f64, 4_294_967_296.0_f64);
trunc!(
    i64_trunc_f32,
    f32,
    i64,
    -9_223_372_036_854_775_808.0_f32,
    9_223_372_036_854_775_808.0_f32
);
trunc!(
    u64_trunc_f32,
    f32,
    u64,
    0.0_f32,
    18_446_744_073_709_551_616.0_f32
);
trunc!(
    i64_trunc_f64,
    f64,
    i64,
    -9_223_372_036_854_775_808.0_f64,
    9_223_372_036_854_775_808.0_f64
);
trunc!(
    u64_trunc_f64,
    f64,
    u64,
    0.0_f64,
    18_446_744_073_709_551_616.0_f64
);

/// IEEE 754 `minimum`: NaN operands propagate and `-0 < +0`.
macro_rules! minmax {
    ($min:ident, $max:ident, $ty:ty) => {
        pub(crate) fn $min(a: $ty, b: $ty) -> $ty {
            if a.is_nan() {
                return a;
            }
            if b.is_nan() {
                return b;
            }
            if a == b {
                return if a.is_sign_negative() { a } else { b };
            }
            if a < b {
                a
            } else {
                b
            }
        }

        pub(crate) fn $max(a: $ty, b: $ty) -> $ty {
            if a.is_nan() {
                return a;
            }
            if b.is_nan() {
                return b;
            }
            if a == b {
                return if a.is_sign_positive() { a } else { b };
            }
            if a > b {
                a
            } else {
                b
            }
        }
    };
}

minmax!(fmin32, fmax32, f32);
minmax!(fmin64, fmax64, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_s_overflow_traps() {
        assert_eq!(
            i32_div_s(i32::MIN, -1),
            Err(Trap::IntegerOverflow)
        );
        assert_eq!(i32_div_s(7, 0), Err(Trap::IntegerDivisionByZero));
        assert_eq!(i32_div_s(-7, 2), Ok(-3));
        assert_eq!(i64_div_s(i64::MIN, -1), Err(Trap::IntegerOverflow));
    }

    #[test]
    fn rem_s_min_by_minus_one_is_zero() {
        assert_eq!(i32_rem_s(i32::MIN, -1), Ok(0));
        assert_eq!(i64_rem_s(i64::MIN, -1), Ok(0));
    }

    #[test]
    fn trunc_bounds() {
        assert_eq!(i32_trunc_f64(2_147_483_647.9), Ok(i32::MAX));
        assert_eq!(i32_trunc_f64(-2_147_483_648.9), Ok(i32::MIN));
        assert_eq!(i32_trunc_f64(2_147_483_648.0), Err(Trap::IntegerOverflow));
        assert_eq!(
            i32_trunc_f32(f32::NAN),
            Err(Trap::BadConversionToInteger)
        );
        // Fractional values just above -1 truncate to zero.
        assert_eq!(u32_trunc_f64(-0.75), Ok(0));
        assert_eq!(u32_trunc_f64(-1.0), Err(Trap::IntegerOverflow));
    }

    #[test]
    fn min_max_zeroes_and_nans() {
        assert!(fmin32(-0.0, 0.0).is_sign_negative());
        assert!(fmax32(-0.0, 0.0).is_sign_positive());
        assert!(fmin64(f64::NAN, 1.0).is_nan());
        assert!(fmax32(1.0, f32::NAN).is_nan());
        assert_eq!(fmin64(1.0, 2.0), 1.0);
        assert_eq!(fmax64(1.0, 2.0), 2.0);
    }
}
