//! HTTP client for the Clearline back-office API.
//!
//! Two endpoints are used by the invoice flow:
//! - `GET /charge-types` supplies the charge catalog
//! - `POST /invoices/create` stores a finalized invoice

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ClientError;
