//! Core business logic for Clearline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `invoice` - Charge ledger, invoice totals, amount in words and the
//!   invoice payload sent to the back-office API

pub mod invoice;
