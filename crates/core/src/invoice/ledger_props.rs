//! Property-based tests for the charge ledger and invoice totals.
//!
//! - Subtotal always equals the sum of line amounts
//! - Section subtotals partition the subtotal
//! - Totals recomputation is deterministic

use clearline_shared::types::{Currency, MAX_AMOUNT, round_amount};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::ledger::ChargeLedger;
use super::line_item::{ChargeDescription, ChargeLineItem, ChargeSection};
use super::totals::InvoiceTotals;

/// Strategy to generate unit rates (0.000 to 9,999.999).
fn unit_rate() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|fils| Decimal::new(fils, 3))
}

/// Strategy to generate non-negative tax or advance amounts.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|fils| Decimal::new(fils, 3))
}

fn section() -> impl Strategy<Value = ChargeSection> {
    prop_oneof![Just(ChargeSection::Required), Just(ChargeSection::Marginal)]
}

/// Raw text a user might type into a numeric field.
fn field_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..500).prop_map(|n| n.to_string()),
        unit_rate().prop_map(|d| d.to_string()),
        Just(String::new()),
        Just("abc".to_string()),
        Just("-3".to_string()),
        Just("1e2".to_string()),
        Just("1e28".to_string()),
        Just("4294967295".to_string()),
        Just(Decimal::MAX.to_string()),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Add(ChargeSection, u32, Decimal),
    Remove(usize),
    SetQuantity(usize, String),
    SetUnitRate(usize, String),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (section(), 0u32..1_000, unit_rate()).prop_map(|(s, q, r)| Op::Add(s, q, r)),
        2 => (0usize..12).prop_map(Op::Remove),
        2 => (0usize..12, field_text()).prop_map(|(i, t)| Op::SetQuantity(i, t)),
        2 => (0usize..12, field_text()).prop_map(|(i, t)| Op::SetUnitRate(i, t)),
        1 => Just(Op::Clear),
    ]
}

fn apply(ledger: &mut ChargeLedger, op: Op) {
    match op {
        Op::Add(section, quantity, rate) => {
            ledger.add_item(
                ChargeLineItem::new(ChargeDescription::catalog("HANDLING CHARGES"))
                    .with_section(section)
                    .with_quantity(quantity)
                    .with_unit_rate(rate),
            );
        }
        Op::Remove(index) => {
            ledger.remove_item(index);
        }
        Op::SetQuantity(index, text) => {
            ledger.set_quantity_input(index, &text);
        }
        Op::SetUnitRate(index, text) => {
            ledger.set_unit_rate_input(index, &text);
        }
        Op::Clear => ledger.clear(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* sequence of edits, the subtotal equals the sum of the
    /// line amounts and every amount is `round3(quantity * rate)`, or zero
    /// when that exceeds `MAX_AMOUNT`.
    #[test]
    fn prop_subtotal_matches_items(ops in prop::collection::vec(op(), 0..40)) {
        let mut ledger = ChargeLedger::new();
        for op in ops {
            apply(&mut ledger, op);

            let sum: Decimal = ledger.items().iter().map(ChargeLineItem::amount).sum();
            prop_assert_eq!(ledger.subtotal(), sum);

            for item in ledger.items() {
                let product = round_amount(Decimal::from(item.quantity()) * item.unit_rate());
                let expected = if product > MAX_AMOUNT { Decimal::ZERO } else { product };
                prop_assert_eq!(item.amount(), expected);
                prop_assert!(item.unit_rate() >= Decimal::ZERO);
                prop_assert!(item.unit_rate() <= MAX_AMOUNT);
            }
        }
    }

    /// Row positions stay 1-based and contiguous after any edit sequence.
    #[test]
    fn prop_rows_are_contiguous(ops in prop::collection::vec(op(), 0..40)) {
        let mut ledger = ChargeLedger::new();
        for op in ops {
            apply(&mut ledger, op);
        }
        let positions: Vec<usize> = ledger.rows().map(|row| row.position).collect();
        let expected: Vec<usize> = (1..=ledger.len()).collect();
        prop_assert_eq!(positions, expected);
    }

    #[test]
    fn prop_section_subtotals_partition(ops in prop::collection::vec(op(), 0..40)) {
        let mut ledger = ChargeLedger::new();
        for op in ops {
            apply(&mut ledger, op);
        }
        prop_assert_eq!(
            ledger.section_subtotal(ChargeSection::Required)
                + ledger.section_subtotal(ChargeSection::Marginal),
            ledger.subtotal()
        );
    }

    /// Recomputing twice from the same inputs gives identical totals, and
    /// `total - advance == balance_due`.
    #[test]
    fn prop_recompute_idempotent(
        ops in prop::collection::vec(op(), 0..20),
        tax in amount(),
        advance in amount(),
    ) {
        let mut ledger = ChargeLedger::new();
        for op in ops {
            apply(&mut ledger, op);
        }
        let first = InvoiceTotals::recompute(&ledger, tax, advance, Currency::Kwd).unwrap();
        let second = InvoiceTotals::recompute(&ledger, tax, advance, Currency::Kwd).unwrap();

        prop_assert_eq!(first.total, ledger.subtotal() + tax);
        prop_assert_eq!(first.balance_due, first.total - advance);
        prop_assert_eq!(first, second);
    }
}
