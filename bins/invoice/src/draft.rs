//! Draft invoice files.
//!
//! A draft is the JSON the invoice form would hold before submission. Field
//! values are kept as typed: quantities and rates may be numbers or raw text,
//! and anything unparseable counts as zero.

use clearline_core::invoice::{ChargeSection, InvoiceError, InvoiceFlow, InvoiceMeta, InvoiceSession};
use serde::Deserialize;
use serde_json::Value;

/// A draft invoice.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    /// Flow the draft was written in.
    pub flow: Option<InvoiceFlow>,
    /// Charges; when absent the flow's starting rows are kept.
    pub charges: Option<Vec<DraftCharge>>,
    /// Tax field.
    pub tax: Value,
    /// Advance field.
    pub advance: Value,
    /// Header fields needed for submission.
    pub invoice: Option<InvoiceMeta>,
}

/// One charge row of a draft.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftCharge {
    /// Section.
    pub section: ChargeSection,
    /// Description text.
    pub description: String,
    /// Quantity field; absent keeps the default of 1.
    pub quantity: Option<Value>,
    /// Unit rate field.
    pub unit_rate: Option<Value>,
    /// Unit label.
    pub unit: Option<String>,
}

impl Draft {
    /// Replays the draft's fields onto `session`.
    pub fn apply(&self, session: &mut InvoiceSession) -> Result<(), InvoiceError> {
        if let Some(charges) = &self.charges {
            session.clear()?;
            for charge in charges {
                let index = session.add_charge(charge.section, &charge.description)? - 1;
                if let Some(quantity) = &charge.quantity {
                    session.set_quantity(index, &field_text(quantity))?;
                }
                if let Some(rate) = &charge.unit_rate {
                    session.set_unit_rate(index, &field_text(rate))?;
                }
                if let Some(unit) = &charge.unit {
                    session.set_unit(index, unit)?;
                }
            }
        }
        session.set_tax_input(&field_text(&self.tax))?;
        session.set_advance_input(&field_text(&self.advance))
    }
}

/// Text of a form field as the user typed it.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}
