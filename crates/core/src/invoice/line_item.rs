//! Charge line items.
//!
//! A line item is one row of the charges table: a description, a quantity, a
//! unit rate and the derived amount. The amount is never set directly; every
//! setter recomputes it as `round3(quantity * unit_rate)`.

use clearline_shared::types::format_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::{lenient_amount, lenient_quantity, sanitize_amount};

/// Unit label used when none is given.
pub const DEFAULT_UNIT: &str = "each";

/// Which charges table a row belongs to.
///
/// The charges wizard keeps required (pass-through) charges apart from
/// marginal charges (profit margin, service fees). Other flows only use
/// `Required`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeSection {
    /// Pass-through charges.
    #[default]
    Required,
    /// Margin and fee charges.
    Marginal,
}

/// Description of a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ChargeDescription {
    /// A name from the charge catalog.
    Catalog(String),
    /// Free text typed by the user.
    Custom(String),
}

impl ChargeDescription {
    /// Creates a catalog description.
    #[must_use]
    pub fn catalog(name: impl Into<String>) -> Self {
        Self::Catalog(name.into())
    }

    /// Creates a custom description.
    #[must_use]
    pub fn custom(text: impl Into<String>) -> Self {
        Self::Custom(text.into())
    }

    /// Returns the description text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Catalog(text) | Self::Custom(text) => text,
        }
    }

    /// Returns true for free-text descriptions.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Returns true if the text is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl std::fmt::Display for ChargeDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the charges table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeLineItem {
    description: ChargeDescription,
    section: ChargeSection,
    quantity: u32,
    unit: String,
    unit_rate: Decimal,
    amount: Decimal,
}

impl ChargeLineItem {
    /// Creates a required charge with quantity 1 and unit rate 0.
    #[must_use]
    pub fn new(description: ChargeDescription) -> Self {
        Self {
            description,
            section: ChargeSection::Required,
            quantity: 1,
            unit: DEFAULT_UNIT.to_string(),
            unit_rate: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.set_quantity(quantity);
        self
    }

    /// Sets the unit rate. Negative rates become zero.
    #[must_use]
    pub fn with_unit_rate(mut self, unit_rate: Decimal) -> Self {
        self.set_unit_rate(unit_rate);
        self
    }

    /// Sets the section.
    #[must_use]
    pub fn with_section(mut self, section: ChargeSection) -> Self {
        self.section = section;
        self
    }

    /// Sets the unit label.
    #[must_use]
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.set_unit(unit);
        self
    }

    /// Sets the quantity and recomputes the amount.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.recalculate();
    }

    /// Sets the unit rate and recomputes the amount.
    pub fn set_unit_rate(&mut self, unit_rate: Decimal) {
        self.unit_rate = sanitize_amount(unit_rate);
        self.recalculate();
    }

    /// Sets the quantity from raw field text; unparseable text is zero.
    pub fn set_quantity_input(&mut self, text: &str) {
        self.set_quantity(lenient_quantity(text));
    }

    /// Sets the unit rate from raw field text; unparseable text is zero.
    pub fn set_unit_rate_input(&mut self, text: &str) {
        self.set_unit_rate(lenient_amount(text));
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: ChargeDescription) {
        self.description = description;
    }

    /// Sets the unit label; blank text falls back to [`DEFAULT_UNIT`].
    pub fn set_unit(&mut self, unit: &str) {
        let unit = unit.trim();
        self.unit = if unit.is_empty() {
            DEFAULT_UNIT.to_string()
        } else {
            unit.to_string()
        };
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &ChargeDescription {
        &self.description
    }

    /// Returns the section.
    #[must_use]
    pub fn section(&self) -> ChargeSection {
        self.section
    }

    /// Returns the quantity.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit label.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the unit rate.
    #[must_use]
    pub fn unit_rate(&self) -> Decimal {
        self.unit_rate
    }

    /// Returns the computed amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount with exactly three decimals, e.g. `"30.015"`.
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount)
    }

    /// Unit rate with exactly three decimals.
    #[must_use]
    pub fn formatted_unit_rate(&self) -> String {
        format_amount(self.unit_rate)
    }

    /// Returns true if both quantity and unit rate are positive.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.quantity > 0 && self.unit_rate > Decimal::ZERO
    }

    /// An amount that overflows or exceeds `MAX_AMOUNT` is zero, like any
    /// other unusable input.
    fn recalculate(&mut self) {
        self.amount = Decimal::from(self.quantity)
            .checked_mul(self.unit_rate)
            .map_or(Decimal::ZERO, sanitize_amount);
    }
}
