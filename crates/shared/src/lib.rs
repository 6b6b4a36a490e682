//! Shared types, errors, and configuration for Clearline.
//!
//! This crate provides common types used across all other crates:
//! - Currencies and three-decimal (fils) money helpers
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
