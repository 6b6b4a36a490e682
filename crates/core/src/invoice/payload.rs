//! Wire types for the back-office invoice API.
//!
//! Field names are camelCase and amounts are JSON numbers, matching what the
//! invoice-creation endpoint accepts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::{ChargeLineItem, ChargeSection};
use super::totals::InvoiceTotals;

/// Details entered alongside the charges when an invoice is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMeta {
    /// Job card the invoice belongs to.
    pub job_card_id: String,
    /// Invoice number, when assigned by the user.
    #[serde(default)]
    pub invoice_no: Option<String>,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// How the advance was paid. Ignored when no advance is recorded.
    #[serde(default)]
    pub advance_payment: Option<AdvancePaymentDetails>,
}

/// Payment details for an advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePaymentDetails {
    /// Payment date.
    pub date: NaiveDate,
    /// Payment method, e.g. "cash" or "knet".
    pub method: String,
    /// Cheque number or transfer reference.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Body of `POST /invoices/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Job card the invoice belongs to.
    pub job_card_id: String,
    /// Invoice header.
    pub invoice_data: InvoiceData,
    /// Charges in display order.
    pub charges: Vec<ChargePayload>,
    /// Computed totals.
    pub totals: TotalsPayload,
    /// Advance payment, present only when an advance was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_payment: Option<AdvancePayment>,
}

/// Invoice header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Invoice number, when assigned by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Free-text notes.
    pub notes: String,
}

/// One charge row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargePayload {
    /// Section the charge belongs to.
    #[serde(rename = "type")]
    pub section: ChargeSection,
    /// Description text.
    pub description: String,
    /// Quantity.
    pub qty: u32,
    /// Unit label.
    pub unit: String,
    /// Unit rate.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_amount: Decimal,
    /// Computed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<&ChargeLineItem> for ChargePayload {
    fn from(item: &ChargeLineItem) -> Self {
        Self {
            section: item.section(),
            description: item.description().as_str().trim().to_string(),
            qty: item.quantity(),
            unit: item.unit().to_string(),
            unit_amount: item.unit_rate(),
            amount: item.amount(),
        }
    }
}

/// Totals as sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsPayload {
    /// Sum of all charges.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Sum of required charges.
    #[serde(with = "rust_decimal::serde::float")]
    pub required_charges_subtotal: Decimal,
    /// Sum of marginal charges.
    #[serde(with = "rust_decimal::serde::float")]
    pub marginal_charges_subtotal: Decimal,
    /// Tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    /// Total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Advance.
    #[serde(with = "rust_decimal::serde::float")]
    pub advance: Decimal,
    /// Balance due.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_due: Decimal,
    /// Total in words.
    pub amount_in_words: String,
}

impl From<&InvoiceTotals> for TotalsPayload {
    fn from(totals: &InvoiceTotals) -> Self {
        Self {
            subtotal: totals.subtotal,
            required_charges_subtotal: totals.required_subtotal,
            marginal_charges_subtotal: totals.marginal_subtotal,
            tax: totals.tax,
            total: totals.total,
            advance: totals.advance,
            balance_due: totals.balance_due,
            amount_in_words: totals.amount_in_words.clone(),
        }
    }
}

/// Advance payment as sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePayment {
    /// Amount paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment method.
    pub method: String,
    /// Cheque number or transfer reference.
    pub reference: Option<String>,
}

/// Response of `POST /invoices/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    /// Whether the invoice was stored.
    pub success: bool,
    /// Error or status message.
    #[serde(default)]
    pub message: Option<String>,
    /// Number assigned by the back office.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Database id of the stored invoice.
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
}

/// Invoice id as returned by the back office, numeric or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvoiceId {
    /// Numeric id.
    Number(u64),
    /// String id.
    Text(String),
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Generic `{success, message, data}` envelope used by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Error or status message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}
