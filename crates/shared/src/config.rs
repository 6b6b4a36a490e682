//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Back-office API configuration.
    pub api: ApiConfig,
    /// Invoice authoring configuration.
    pub invoice: InvoiceConfig,
}

/// Back-office REST API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Bearer token sent with invoice submissions.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 10,
            token: None,
        }
    }
}

/// Invoice authoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Currency used for totals and amounts in words.
    pub currency: Currency,
    /// Days between invoice date and due date.
    pub due_days: u32,
    /// Charges seeded when an invoice form is opened.
    pub default_charges: Vec<DefaultChargeConfig>,
    /// Charge names used when the charge-types endpoint is unavailable.
    /// Empty means the built-in list.
    pub charge_catalog: Vec<String>,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            currency: Currency::Kwd,
            due_days: 30,
            default_charges: vec![
                DefaultChargeConfig::new(
                    "CUSTOMS CLEARANCE SERVICE CHARGE (NUWASIB)",
                    Decimal::new(30_000, 3),
                ),
                DefaultChargeConfig::new("INSPECTION CHARGES", Decimal::new(10_000, 3)),
                DefaultChargeConfig::new(
                    "GLOBAL CLEARINGHOUSE SYSTEMS CHARGES",
                    Decimal::new(27_210, 3),
                ),
            ],
            charge_catalog: Vec::new(),
        }
    }
}

/// A configured starter charge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultChargeConfig {
    /// Charge description.
    pub description: String,
    /// Unit rate in major units.
    pub unit_rate: Decimal,
    /// Quantity, defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl DefaultChargeConfig {
    /// Creates a starter charge with quantity 1.
    #[must_use]
    pub fn new(description: impl Into<String>, unit_rate: Decimal) -> Self {
        Self {
            description: description.into(),
            unit_rate,
            quantity: default_quantity(),
        }
    }
}

fn default_quantity() -> u32 {
    1
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CLEARLINE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
