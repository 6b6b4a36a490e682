//! Amount in words.
//!
//! Renders an invoice total the way it is printed under the totals box:
//! `82.710` becomes `"Eighty-Two Dinars and Seven Hundred Ten Fils only"`.
//!
//! Rules:
//! - The whole part uses short-scale English in Title Case, tens hyphenated
//!   with ones ("Eighty-Two").
//! - The major unit is singular only for exactly one ("One Dinar").
//! - The fractional part is expressed in thousandths, in words, followed by
//!   the minor unit. When there is no whole part the major unit is omitted
//!   ("Five Hundred Fils only").
//! - Zero renders as "Zero Dinar only".

use clearline_shared::types::Currency;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::InvoiceError;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

// One entry per group of three digits; enough for `u128::MAX`.
const SCALES: [&str; 13] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
    "Sextillion",
    "Septillion",
    "Octillion",
    "Nonillion",
    "Decillion",
    "Undecillion",
];

/// Minor units per major unit.
const MINOR_PER_MAJOR: u32 = 1000;

/// Converts an amount to words using Kuwaiti Dinar / Fils.
///
/// # Errors
///
/// Returns [`InvoiceError::InvalidAmount`] for negative amounts.
pub fn to_words(amount: Decimal) -> Result<String, InvoiceError> {
    amount_in_words(amount, Currency::Kwd)
}

/// Converts an amount to words using the unit names of `currency`.
///
/// # Errors
///
/// Returns [`InvoiceError::InvalidAmount`] for negative amounts.
pub fn amount_in_words(amount: Decimal, currency: Currency) -> Result<String, InvoiceError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(InvoiceError::InvalidAmount(amount));
    }
    // Drops the sign of negative zero.
    let amount = amount.abs();

    let whole_part = amount.trunc();
    let Some(mut whole) = whole_part.to_u128() else {
        return Err(InvoiceError::InvalidAmount(amount));
    };
    let mut fractional = ((amount - whole_part) * Decimal::from(MINOR_PER_MAJOR))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0);

    // 1.9996 rounds to 2 Dinars, not 1 Dinar and 1000 Fils.
    if fractional >= MINOR_PER_MAJOR {
        whole += 1;
        fractional = 0;
    }

    if whole == 0 && fractional == 0 {
        return Ok(format!("Zero {} only", currency.major_unit()));
    }

    let mut parts: Vec<String> = Vec::with_capacity(4);
    if whole > 0 {
        let unit = if whole == 1 {
            currency.major_unit()
        } else {
            currency.major_unit_plural()
        };
        parts.push(format!("{} {unit}", integer_to_words(whole)));
    }
    if fractional > 0 {
        if whole > 0 {
            parts.push("and".to_string());
        }
        parts.push(format!(
            "{} {}",
            integer_to_words(u128::from(fractional)),
            currency.minor_unit()
        ));
    }
    parts.push("only".to_string());

    Ok(capitalize_first(&parts.join(" ")))
}

/// Converts a non-negative integer to Title Case English words.
#[must_use]
pub fn integer_to_words(number: u128) -> String {
    if number == 0 {
        return "Zero".to_string();
    }

    let mut groups = Vec::new();
    let mut rest = number;
    while rest > 0 {
        #[allow(clippy::cast_possible_truncation)]
        groups.push((rest % 1000) as u16);
        rest /= 1000;
    }

    let mut words = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        words.push(group_to_words(group));
        if !SCALES[scale].is_empty() {
            words.push(SCALES[scale].to_string());
        }
    }
    words.join(" ")
}

/// Words for 1..=999.
fn group_to_words(group: u16) -> String {
    let mut parts = Vec::with_capacity(3);
    let hundreds = usize::from(group / 100);
    let rest = usize::from(group % 100);

    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds]));
    }
    match rest {
        0 => {}
        1..=9 => parts.push(ONES[rest].to_string()),
        10..=19 => parts.push(TEENS[rest - 10].to_string()),
        _ if rest % 10 == 0 => parts.push(TENS[rest / 10].to_string()),
        _ => parts.push(format!("{}-{}", TENS[rest / 10], ONES[rest % 10])),
    }
    parts.join(" ")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
