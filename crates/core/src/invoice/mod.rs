//! Freight invoice charges.
//!
//! This module implements the invoice charge calculator:
//! - Charge line items and the ledger that keeps their subtotal
//! - Invoice totals with tax, advance and balance due
//! - Amounts in words for the printed invoice
//! - The charge catalog and default charges
//! - The authoring session and the API payload it produces

pub mod catalog;
pub mod error;
pub mod input;
pub mod ledger;
pub mod line_item;
pub mod payload;
pub mod session;
pub mod totals;
pub mod words;

#[cfg(test)]
mod ledger_props;
#[cfg(test)]
mod words_props;

pub use catalog::{ChargeCatalog, ChargeType, DefaultCharge};
pub use error::InvoiceError;
pub use ledger::{ChargeLedger, ChargeRow};
pub use line_item::{ChargeDescription, ChargeLineItem, ChargeSection, DEFAULT_UNIT};
pub use payload::{
    AdvancePayment, AdvancePaymentDetails, ApiEnvelope, ChargePayload, CreateInvoiceRequest,
    CreateInvoiceResponse, InvoiceData, InvoiceId, InvoiceMeta, TotalsPayload,
};
pub use session::{InvoiceFlow, InvoiceSession};
pub use totals::{FormattedTotals, InvoiceTotals};
pub use words::{amount_in_words, integer_to_words, to_words};
