//! Invoice error types.
//!
//! Numeric input never produces an error here: malformed quantities and
//! amounts are coerced to zero before they reach the ledger. The only
//! arithmetic failures are a negative amount handed to a function whose
//! precondition is non-negativity, and a tax or advance above `MAX_AMOUNT`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while computing or finalizing an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// Amount is negative where a non-negative amount is required.
    #[error("Amount must not be negative, got {0}")]
    InvalidAmount(Decimal),

    /// Amount is above the largest amount an invoice can carry.
    #[error("Amount {0} is too large")]
    AmountOutOfRange(Decimal),

    /// Invoice has no charges.
    #[error("Please add at least one charge")]
    NoCharges,

    /// A charge row has an empty description.
    #[error("Charge #{position} has no description")]
    EmptyDescription {
        /// 1-based row position.
        position: usize,
    },

    /// A required charge has a zero quantity or zero unit rate.
    #[error("Quantity and unit rate must be greater than 0 for required charge #{position}")]
    IncompleteRequiredCharge {
        /// 1-based row position.
        position: usize,
    },

    /// Invoice is not attached to a job card.
    #[error("Job card not specified")]
    MissingJobCard,
}

impl InvoiceError {
    /// Returns the error code for API responses and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::NoCharges => "NO_CHARGES",
            Self::EmptyDescription { .. } => "EMPTY_DESCRIPTION",
            Self::IncompleteRequiredCharge { .. } => "INCOMPLETE_REQUIRED_CHARGE",
            Self::MissingJobCard => "MISSING_JOB_CARD",
        }
    }
}

impl From<InvoiceError> for clearline_shared::AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::InvalidAmount(_) | InvoiceError::AmountOutOfRange(_) => {
                Self::Validation(err.to_string())
            }
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
