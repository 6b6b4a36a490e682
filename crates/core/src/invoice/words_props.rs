//! Property-based tests for amounts in words.

use clearline_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::words::{amount_in_words, integer_to_words, to_words};

/// Strategy to generate amounts with three decimals (0.000 to 999,999,999.999).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_000i64).prop_map(|fils| Decimal::new(fils, 3))
}

fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::Kwd),
        Just(Currency::Bhd),
        Just(Currency::Jod),
        Just(Currency::Omr),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every non-negative amount renders as a single capitalized sentence
    /// ending in "only".
    #[test]
    fn prop_well_formed(amount in amount(), currency in currency()) {
        let words = amount_in_words(amount, currency).unwrap();
        prop_assert!(words.ends_with(" only"));
        prop_assert!(words.chars().next().is_some_and(char::is_uppercase));
        prop_assert!(!words.contains("  "));
        prop_assert!(!words.contains("Zero ") || amount.is_zero());
    }

    /// The major unit is plural exactly when the whole part is not one.
    #[test]
    fn prop_major_unit_plural(whole in 2u64..1_000_000, fils in 0i64..1000) {
        let amount = Decimal::from(whole) + Decimal::new(fils, 3);
        let words = to_words(amount).unwrap();
        prop_assert!(words.contains(" Dinars"), "{}", words);
        prop_assert_eq!(words.contains(" Fils"), fils > 0);
    }

    #[test]
    fn prop_negative_rejected(fils in 1i64..1_000_000_000) {
        let amount = Decimal::new(-fils, 3);
        prop_assert_eq!(to_words(amount), Err(InvoiceError::InvalidAmount(amount)));
    }

    /// Distinct numbers below one million never share a rendering.
    #[test]
    fn prop_integer_words_injective(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        prop_assume!(a != b);
        prop_assert_ne!(integer_to_words(a), integer_to_words(b));
    }
}
