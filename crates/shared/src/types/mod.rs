//! Common types used across the application.

pub mod money;

pub use money::{Currency, MAX_AMOUNT, format_amount, round_amount};
