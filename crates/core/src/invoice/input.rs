//! Lenient parsing of user-typed numbers.
//!
//! Form fields are read with the same rule the browser's `parseFloat(x) || 0`
//! applies: the longest numeric prefix wins, and anything that does not start
//! with a number is zero. These functions never fail.

use std::str::FromStr;

use clearline_shared::types::{MAX_AMOUNT, round_amount};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Parses the leading number of `text`, or zero.
///
/// `"12.5kg"` is `12.5`, `".5"` is `0.5`, `"1e3"` is `1000`, `"abc"` and `""`
/// are `0`.
#[must_use]
pub fn lenient_decimal(text: &str) -> Decimal {
    let prefix = numeric_prefix(text.trim_start());
    if prefix.is_empty() {
        return Decimal::ZERO;
    }

    let (negative, unsigned) = match prefix.as_bytes()[0] {
        b'-' => (true, &prefix[1..]),
        b'+' => (false, &prefix[1..]),
        _ => (false, prefix),
    };
    let normalized = if unsigned.starts_with('.') {
        format!("0{unsigned}")
    } else {
        unsigned.to_string()
    };

    let parsed = if normalized.contains(['e', 'E']) {
        Decimal::from_scientific(&normalized.to_ascii_lowercase())
    } else {
        Decimal::from_str(&normalized)
    };

    match parsed {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

/// Parses a non-negative money amount rounded to three decimals.
///
/// Negative input and input above [`MAX_AMOUNT`] are coerced to zero like
/// any other invalid value.
#[must_use]
pub fn lenient_amount(text: &str) -> Decimal {
    sanitize_amount(lenient_decimal(text))
}

/// Parses a quantity. Fractions are truncated; negative or oversized input
/// is zero.
#[must_use]
pub fn lenient_quantity(text: &str) -> u32 {
    let value = lenient_decimal(text);
    if value.is_sign_negative() {
        return 0;
    }
    value.trunc().to_u32().unwrap_or(0)
}

/// Rounds an amount to three decimals. Negative amounts and amounts above
/// [`MAX_AMOUNT`] become zero.
#[must_use]
pub fn sanitize_amount(amount: Decimal) -> Decimal {
    let rounded = round_amount(amount);
    if rounded.is_sign_negative() || rounded > MAX_AMOUNT {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Longest prefix of `text` that reads as a decimal number.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = frac_end - end - 1;
        if frac_digits > 0 {
            end = frac_end;
        }
    }

    if int_digits + frac_digits == 0 {
        return "";
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("10.005", dec!(10.005))]
    #[case("  42", dec!(42))]
    #[case("12.5kg", dec!(12.5))]
    #[case(".5", dec!(0.5))]
    #[case("5.", dec!(5))]
    #[case("+7", dec!(7))]
    #[case("-3.25", dec!(-3.25))]
    #[case("1e3", dec!(1000))]
    #[case("2.5E-1x", dec!(0.25))]
    #[case("4e", dec!(4))]
    #[case("abc", Decimal::ZERO)]
    #[case("", Decimal::ZERO)]
    #[case(".", Decimal::ZERO)]
    #[case("-", Decimal::ZERO)]
    #[case("1,000", dec!(1))]
    fn test_lenient_decimal(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(lenient_decimal(input), expected);
    }

    #[rstest]
    #[case("27.210", dec!(27.210))]
    #[case("0.0005", dec!(0.001))]
    #[case("-50", Decimal::ZERO)]
    #[case("abc", Decimal::ZERO)]
    #[case("1e15", dec!(1_000_000_000_000_000))]
    #[case("1e28", Decimal::ZERO)]
    #[case("79228162514264337593543950335", Decimal::ZERO)]
    fn test_lenient_amount(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(lenient_amount(input), expected);
    }

    #[test]
    fn test_sanitize_amount_caps_at_max() {
        assert_eq!(sanitize_amount(MAX_AMOUNT), MAX_AMOUNT);
        assert_eq!(sanitize_amount(MAX_AMOUNT + dec!(0.001)), Decimal::ZERO);
        assert_eq!(sanitize_amount(Decimal::MAX), Decimal::ZERO);
        assert_eq!(sanitize_amount(dec!(-0.0001)), Decimal::ZERO);
    }

    #[rstest]
    #[case("3", 3)]
    #[case("2.9", 2)]
    #[case("-1", 0)]
    #[case("x", 0)]
    #[case("", 0)]
    #[case("99999999999", 0)]
    fn test_lenient_quantity(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(lenient_quantity(input), expected);
    }
}
