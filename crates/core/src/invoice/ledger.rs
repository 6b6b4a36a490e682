//! Charge ledger.
//!
//! Ordered list of line items with a maintained subtotal. Every mutating
//! method recomputes the subtotal before returning, so
//! `subtotal() == sum(item.amount())` holds whenever the ledger is observable.

use rust_decimal::Decimal;

use super::catalog::DefaultCharge;
use super::line_item::{ChargeDescription, ChargeLineItem, ChargeSection};

/// A line item together with its 1-based display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeRow<'a> {
    /// 1-based position, contiguous across the ledger.
    pub position: usize,
    /// The line item.
    pub item: &'a ChargeLineItem,
}

/// Ordered collection of charges for one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeLedger {
    items: Vec<ChargeLineItem>,
    subtotal: Decimal,
}

impl ChargeLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item and returns its 1-based position.
    pub fn add_item(&mut self, item: ChargeLineItem) -> usize {
        self.items.push(item);
        self.recalculate();
        self.items.len()
    }

    /// Removes the item at `index` (0-based).
    ///
    /// Returns `None` without changing anything when there is no such item.
    pub fn remove_item(&mut self, index: usize) -> Option<ChargeLineItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.recalculate();
        Some(removed)
    }

    /// Appends the starter charges.
    pub fn seed_defaults(&mut self, defaults: &[DefaultCharge]) {
        self.items
            .extend(defaults.iter().map(DefaultCharge::to_line_item));
        self.recalculate();
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    /// Applies `edit` to the item at `index` and recomputes the subtotal.
    ///
    /// Returns false when there is no such item.
    pub fn update_item<F>(&mut self, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut ChargeLineItem),
    {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        edit(item);
        self.recalculate();
        true
    }

    /// Sets the quantity of the item at `index`.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> bool {
        self.update_item(index, |item| item.set_quantity(quantity))
    }

    /// Sets the unit rate of the item at `index`.
    pub fn set_unit_rate(&mut self, index: usize, unit_rate: Decimal) -> bool {
        self.update_item(index, |item| item.set_unit_rate(unit_rate))
    }

    /// Sets the quantity of the item at `index` from raw field text.
    pub fn set_quantity_input(&mut self, index: usize, text: &str) -> bool {
        self.update_item(index, |item| item.set_quantity_input(text))
    }

    /// Sets the unit rate of the item at `index` from raw field text.
    pub fn set_unit_rate_input(&mut self, index: usize, text: &str) -> bool {
        self.update_item(index, |item| item.set_unit_rate_input(text))
    }

    /// Replaces the description of the item at `index`.
    pub fn set_description(&mut self, index: usize, description: ChargeDescription) -> bool {
        self.update_item(index, |item| item.set_description(description))
    }

    /// Sum of all computed amounts.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Sum of the computed amounts in one section.
    #[must_use]
    pub fn section_subtotal(&self, section: ChargeSection) -> Decimal {
        self.items
            .iter()
            .filter(|item| item.section() == section)
            .map(ChargeLineItem::amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the ledger has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index` (0-based).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ChargeLineItem> {
        self.items.get(index)
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[ChargeLineItem] {
        &self.items
    }

    /// Items with their 1-based display positions.
    pub fn rows(&self) -> impl Iterator<Item = ChargeRow<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ChargeRow {
                position: index + 1,
                item,
            })
    }

    fn recalculate(&mut self) {
        self.subtotal = self
            .items
            .iter()
            .map(ChargeLineItem::amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
    }
}
