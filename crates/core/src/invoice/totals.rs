//! Invoice totals.
//!
//! Tax is a flat, caller-supplied amount added to the subtotal. Advance is
//! the amount already paid; the balance due is not clamped, so overpayment
//! shows up as a negative balance.

use clearline_shared::types::{Currency, MAX_AMOUNT, format_amount, round_amount};
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::ledger::ChargeLedger;
use super::line_item::ChargeSection;
use super::words::amount_in_words;

/// Totals derived from a ledger plus tax and advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Sum of all charge amounts.
    pub subtotal: Decimal,
    /// Sum of required-section charges.
    pub required_subtotal: Decimal,
    /// Sum of marginal-section charges.
    pub marginal_subtotal: Decimal,
    /// Flat tax amount.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
    /// Amount already paid.
    pub advance: Decimal,
    /// `total - advance`; negative when overpaid.
    pub balance_due: Decimal,
    /// `total` in words.
    pub amount_in_words: String,
    /// Currency of every amount above.
    pub currency: Currency,
}

/// Totals rendered for display, every amount with three decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTotals {
    /// Subtotal.
    pub subtotal: String,
    /// Required-section subtotal.
    pub required_subtotal: String,
    /// Marginal-section subtotal.
    pub marginal_subtotal: String,
    /// Tax.
    pub tax: String,
    /// Total.
    pub total: String,
    /// Advance.
    pub advance: String,
    /// Balance due.
    pub balance_due: String,
    /// Total in words.
    pub amount_in_words: String,
}

impl InvoiceTotals {
    /// Computes totals for `ledger`.
    ///
    /// Pure: the same inputs always give the same totals.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidAmount`] if `tax` or `advance` is negative,
    /// and [`InvoiceError::AmountOutOfRange`] if either is above [`MAX_AMOUNT`]
    /// or the total does not fit in a `Decimal`.
    pub fn recompute(
        ledger: &ChargeLedger,
        tax: Decimal,
        advance: Decimal,
        currency: Currency,
    ) -> Result<Self, InvoiceError> {
        let tax = ensure_amount(tax)?;
        let advance = ensure_amount(advance)?;

        let subtotal = ledger.subtotal();
        let total = subtotal
            .checked_add(tax)
            .ok_or(InvoiceError::AmountOutOfRange(subtotal))?;
        let balance_due = total
            .checked_sub(advance)
            .ok_or(InvoiceError::AmountOutOfRange(total))?;

        Ok(Self {
            subtotal,
            required_subtotal: ledger.section_subtotal(ChargeSection::Required),
            marginal_subtotal: ledger.section_subtotal(ChargeSection::Marginal),
            tax,
            total,
            advance,
            balance_due,
            amount_in_words: amount_in_words(total, currency)?,
            currency,
        })
    }

    /// Returns true when the advance exceeds the total.
    #[must_use]
    pub fn is_overpaid(&self) -> bool {
        self.balance_due < Decimal::ZERO
    }

    /// Formats every amount with three decimals.
    #[must_use]
    pub fn formatted(&self) -> FormattedTotals {
        FormattedTotals {
            subtotal: format_amount(self.subtotal),
            required_subtotal: format_amount(self.required_subtotal),
            marginal_subtotal: format_amount(self.marginal_subtotal),
            tax: format_amount(self.tax),
            total: format_amount(self.total),
            advance: format_amount(self.advance),
            balance_due: format_amount(self.balance_due),
            amount_in_words: self.amount_in_words.clone(),
        }
    }
}

fn ensure_amount(amount: Decimal) -> Result<Decimal, InvoiceError> {
    if amount < Decimal::ZERO {
        return Err(InvoiceError::InvalidAmount(amount));
    }
    let amount = round_amount(amount);
    if amount > MAX_AMOUNT {
        return Err(InvoiceError::AmountOutOfRange(amount));
    }
    Ok(amount)
}
