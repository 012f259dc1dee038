// ABOUTME: Typed value capabilities for tweaks: text round trip, ordering and numeric projection
// ABOUTME: Implements TweakValue for strings, booleans, integers and floats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! Typed tweak values
//!
//! A [`TweakValue`] knows how to parse itself from text and describe itself as
//! text. The display form doubles as the identity used for change detection,
//! so `parse(describe(v))` must give back `v`.
//!
//! Two optional capabilities feed the constraint checks:
//! - ordering, expressed as a `PartialOrd` bound, enables `min`/`max`
//! - [`Numeric`] enables `step`
//!
//! Each implementation opts in by delegating [`TweakValue::validate`] to the
//! checks it supports. Types without an order (like `bool`) keep the default,
//! which accepts every value.

use crate::constraints::{Constraints, REAL_TOLERANCE};
use crate::errors::TweakError;

/// 2^53: below this magnitude every integer is exactly representable as `f64`
const MAX_EXACT_REAL: f64 = 9_007_199_254_740_992.0;

/// A value type that can back a tweak
pub trait TweakValue: Clone + Send + Sync + 'static {
    /// Type label shown in listings and the query endpoint
    const TYPE_NAME: &'static str;

    /// Parse the textual form, returning `None` when the text is not a valid value
    fn parse(input: &str) -> Option<Self>;

    /// Display form used for listings and change detection
    fn describe(&self) -> String;

    /// Check the value against constraints.
    ///
    /// # Errors
    ///
    /// Returns [`TweakError::OutOfRange`] or [`TweakError::StepMismatch`] when
    /// the type supports the corresponding check and the value fails it.
    fn validate(&self, constraints: &Constraints<Self>) -> Result<(), TweakError> {
        let _ = constraints;
        Ok(())
    }
}

/// Values with a real-number projection, used for step alignment
pub trait Numeric: TweakValue + PartialOrd {
    /// Magnitude as a real number
    fn as_real(&self) -> f64;

    /// Convert back from a real number; integral types reject fractional input
    fn from_real(value: f64) -> Option<Self>;
}

impl TweakValue for String {
    const TYPE_NAME: &'static str = "String";

    fn parse(input: &str) -> Option<Self> {
        Some(input.to_owned())
    }

    fn describe(&self) -> String {
        self.clone()
    }

    fn validate(&self, constraints: &Constraints<Self>) -> Result<(), TweakError> {
        constraints.check_range(self)
    }
}

impl TweakValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Some(true),
            "false" | "0" | "no" | "n" | "off" => Some(false),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_value {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl TweakValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn parse(input: &str) -> Option<Self> {
                let trimmed = input.trim();
                if let Ok(value) = trimmed.parse::<$ty>() {
                    return Some(value);
                }
                // Only real-number text ("3.0", "1e3") falls back; plain digits
                // that overflow the type are rejected.
                if !trimmed.contains(['.', 'e', 'E']) {
                    return None;
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|real| real.is_finite())
                    .and_then(<$ty as Numeric>::from_real)
            }

            fn describe(&self) -> String {
                self.to_string()
            }

            fn validate(&self, constraints: &Constraints<Self>) -> Result<(), TweakError> {
                constraints.check_range(self)?;
                constraints.check_step(self)
            }
        }

        impl Numeric for $ty {
            #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
            fn as_real(&self) -> f64 {
                *self as f64
            }

            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_lossless
            )]
            fn from_real(value: f64) -> Option<Self> {
                let rounded = value.round();
                if (value - rounded).abs() >= REAL_TOLERANCE || rounded.abs() >= MAX_EXACT_REAL {
                    return None;
                }
                // `MAX as f64` rounds up to 2^BITS for 64-bit types, so the
                // upper bound is exclusive
                let upper = <$ty>::MAX as f64 + 1.0;
                if rounded < <$ty>::MIN as f64 || rounded >= upper {
                    return None;
                }
                Some(rounded as $ty)
            }
        }
    )*};
}

integer_value! {
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
}

macro_rules! float_value {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl TweakValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn parse(input: &str) -> Option<Self> {
                input.trim().parse::<$ty>().ok().filter(|value| value.is_finite())
            }

            // Debug formatting is the shortest round-trip form and always keeps
            // a decimal point or exponent ("1.0", "2.5", "1e-7").
            fn describe(&self) -> String {
                format!("{self:?}")
            }

            fn validate(&self, constraints: &Constraints<Self>) -> Result<(), TweakError> {
                constraints.check_range(self)?;
                constraints.check_step(self)
            }
        }

        impl Numeric for $ty {
            #[allow(clippy::cast_lossless)]
            fn as_real(&self) -> f64 {
                f64::from(*self)
            }

            #[allow(clippy::cast_possible_truncation)]
            fn from_real(value: f64) -> Option<Self> {
                value.is_finite().then_some(value as $ty)
            }
        }
    )*};
}

float_value! {
    f32 => "f32",
    f64 => "f64",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_accepts_common_spellings() {
        for text in ["true", "YES", " on ", "y", "1"] {
            assert_eq!(bool::parse(text), Some(true), "{text}");
        }
        for text in ["false", "No", "off", "n", "0"] {
            assert_eq!(bool::parse(text), Some(false), "{text}");
        }
        assert_eq!(bool::parse("maybe"), None);
    }

    #[test]
    fn test_integer_accepts_integral_real_text() {
        assert_eq!(i64::parse("3.0"), Some(3));
        assert_eq!(i64::parse("-12"), Some(-12));
        assert_eq!(i64::parse("3.5"), None);
        assert_eq!(u32::parse("-1"), None);
        assert_eq!(i32::parse("1e12"), None);
    }

    #[test]
    fn test_float_describe_keeps_decimal_point() {
        assert_eq!(1.0_f64.describe(), "1.0");
        assert_eq!(2.5_f64.describe(), "2.5");
        assert_eq!(f64::parse("1e-7"), Some(1e-7));
        assert_eq!(f64::parse("NaN"), None);
        assert_eq!(f64::parse("inf"), None);
    }

    #[test]
    fn test_display_round_trip() {
        for value in [0.1_f64, -3.75, 1e16, 123_456.789, f64::MIN_POSITIVE] {
            assert_eq!(f64::parse(&value.describe()), Some(value));
        }
        for value in [0.1_f32, 7.25, -1e-5] {
            assert_eq!(f32::parse(&value.describe()), Some(value));
        }
        for value in [i64::MIN, -1, 0, 42, i64::MAX] {
            assert_eq!(i64::parse(&value.describe()), Some(value));
        }
        for value in [String::new(), "hello world".to_owned(), " padded ".to_owned()] {
            assert_eq!(String::parse(&value.describe()), Some(value.clone()));
        }
        for value in [true, false] {
            assert_eq!(bool::parse(&value.describe()), Some(value));
        }
    }

    #[test]
    fn test_from_real_rejects_fractions_and_overflow() {
        assert_eq!(<i64 as Numeric>::from_real(4.000_000_01), Some(4));
        assert_eq!(<i64 as Numeric>::from_real(4.1), None);
        assert_eq!(<u64 as Numeric>::from_real(-2.0), None);
        assert_eq!(<i32 as Numeric>::from_real(1e10), None);
        assert_eq!(<i32 as Numeric>::from_real(2_147_483_648.0), None);
        assert_eq!(<i32 as Numeric>::from_real(2_147_483_647.0), Some(i32::MAX));
        assert_eq!(<u64 as Numeric>::from_real(18_446_744_073_709_551_616.0), None);
        assert_eq!(<i64 as Numeric>::from_real(9_223_372_036_854_775_808.0), None);
    }

    #[test]
    fn test_integer_text_out_of_range_is_rejected() {
        assert_eq!(u64::parse("18446744073709551616"), None);
        assert_eq!(u64::parse("18446744073709551615"), Some(u64::MAX));
        assert_eq!(i64::parse("9223372036854775808"), None);
        assert_eq!(i64::parse("-9223372036854775809"), None);
        assert_eq!(u32::parse("4294967296"), None);
    }

    #[test]
    fn test_real_text_beyond_exact_range_is_rejected() {
        assert_eq!(i64::parse("9007199254740993.0"), None);
        assert_eq!(i64::parse("9007199254740992.0"), None);
        assert_eq!(i64::parse("9007199254740991.0"), Some(9_007_199_254_740_991));
        assert_eq!(i64::parse("1e3"), Some(1000));
        assert_eq!(u64::parse("1.8446744073709552e19"), None);
    }
}
