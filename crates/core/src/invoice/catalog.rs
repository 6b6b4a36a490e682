//! Charge catalog and default charges.
//!
//! The catalog is the list of charge-type names offered in the description
//! dropdown. It normally comes from the back-office `charge-types` endpoint;
//! when that is unavailable the built-in freight charge list is used.

use clearline_shared::config::{DefaultChargeConfig, InvoiceConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::{ChargeDescription, ChargeLineItem, ChargeSection};

/// Charge types offered when the catalog endpoint cannot be reached.
pub const FALLBACK_CHARGE_TYPES: [&str; 9] = [
    "CUSTOMS CLEARANCE SERVICE CHARGE (NUWASIB)",
    "INSPECTION CHARGES",
    "GLOBAL CLEARINGHOUSE SYSTEMS CHARGES",
    "CHAMBER OF COMMERCE LEGALIZATION CHARGES",
    "CHAMBER OF COMMERCE LEGALIZATION SERVICE CHARGES",
    "TRANSPORTATION CHARGES",
    "DOCUMENTATION CHARGES",
    "STORAGE CHARGES",
    "HANDLING CHARGES",
];

/// Extra options offered only for marginal charges.
pub const MARGINAL_CHARGE_TYPES: [&str; 3] = ["Profit Margin", "Service Fee", "Administration Fee"];

/// A charge type as returned by the `charge-types` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeType {
    /// Display name.
    pub name: String,
}

/// Names offered in the charge description dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeCatalog {
    names: Vec<String>,
}

impl ChargeCatalog {
    /// Builds a catalog, trimming names and dropping blanks and duplicates.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let name = name.trim().to_string();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// The built-in freight charge list.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CHARGE_TYPES)
    }

    /// Builds a catalog from endpoint data, falling back when it is empty.
    #[must_use]
    pub fn from_charge_types(types: &[ChargeType]) -> Self {
        Self::new(types.iter().map(|t| t.name.as_str())).or_fallback()
    }

    /// Builds a catalog from configured names, falling back when none are set.
    #[must_use]
    pub fn from_config(config: &InvoiceConfig) -> Self {
        Self::new(config.charge_catalog.iter().map(String::as_str)).or_fallback()
    }

    fn or_fallback(self) -> Self {
        if self.names.is_empty() {
            Self::fallback()
        } else {
            self
        }
    }

    /// Catalog names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Dropdown options for a section.
    #[must_use]
    pub fn options(&self, section: ChargeSection) -> Vec<&str> {
        let mut options: Vec<&str> = self.names.iter().map(String::as_str).collect();
        if section == ChargeSection::Marginal {
            options.extend(
                MARGINAL_CHARGE_TYPES
                    .iter()
                    .filter(|extra| !self.names.iter().any(|name| name.as_str() == **extra)),
            );
        }
        options
    }

    /// Returns true if `name` is offered for `section`.
    #[must_use]
    pub fn contains(&self, section: ChargeSection, name: &str) -> bool {
        self.options(section).contains(&name)
    }

    /// Classifies typed text as a catalog entry or a custom description.
    #[must_use]
    pub fn resolve(&self, section: ChargeSection, text: &str) -> ChargeDescription {
        let text = text.trim();
        if self.contains(section, text) {
            ChargeDescription::catalog(text)
        } else {
            ChargeDescription::custom(text)
        }
    }
}

impl Default for ChargeCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

/// A charge seeded into a new invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultCharge {
    /// Catalog name.
    pub description: String,
    /// Quantity.
    pub quantity: u32,
    /// Unit rate.
    pub unit_rate: Decimal,
}

impl DefaultCharge {
    /// Creates a default charge with quantity 1.
    #[must_use]
    pub fn new(description: impl Into<String>, unit_rate: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity: 1,
            unit_rate,
        }
    }

    /// Customs clearance 30.000, inspection 10.000, clearinghouse 27.210.
    #[must_use]
    pub fn standard_set() -> Vec<Self> {
        Self::from_config(&InvoiceConfig::default())
    }

    /// Default charges from configuration.
    #[must_use]
    pub fn from_config(config: &InvoiceConfig) -> Vec<Self> {
        config.default_charges.iter().map(Self::from).collect()
    }

    /// Builds the required-section line item for this charge.
    #[must_use]
    pub fn to_line_item(&self) -> ChargeLineItem {
        ChargeLineItem::new(ChargeDescription::catalog(self.description.clone()))
            .with_quantity(self.quantity)
            .with_unit_rate(self.unit_rate)
    }
}

impl From<&DefaultChargeConfig> for DefaultCharge {
    fn from(config: &DefaultChargeConfig) -> Self {
        Self {
            description: config.description.clone(),
            quantity: config.quantity,
            unit_rate: config.unit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fallback_catalog() {
        let catalog = ChargeCatalog::fallback();
        assert_eq!(catalog.names().len(), 9);
        assert_eq!(catalog, ChargeCatalog::default());
        assert!(catalog.contains(ChargeSection::Required, "STORAGE CHARGES"));
    }

    #[test]
    fn test_new_trims_and_dedups() {
        let catalog = ChargeCatalog::new(["  A ", "B", "A", "", "   "]);
        assert_eq!(catalog.names(), ["A", "B"]);
    }

    #[test]
    fn test_from_charge_types() {
        let types = vec![
            ChargeType { name: "DEMURRAGE".into() },
            ChargeType { name: "PORT CHARGES".into() },
        ];
        let catalog = ChargeCatalog::from_charge_types(&types);
        assert_eq!(catalog.names(), ["DEMURRAGE", "PORT CHARGES"]);

        assert_eq!(ChargeCatalog::from_charge_types(&[]), ChargeCatalog::fallback());
    }

    #[test]
    fn test_from_config() {
        let mut config = InvoiceConfig::default();
        assert_eq!(ChargeCatalog::from_config(&config), ChargeCatalog::fallback());

        config.charge_catalog = vec!["DEMURRAGE".into()];
        assert_eq!(ChargeCatalog::from_config(&config).names(), ["DEMURRAGE"]);
    }

    #[test]
    fn test_marginal_options() {
        let catalog = ChargeCatalog::new(["HANDLING CHARGES", "Service Fee"]);
        assert_eq!(
            catalog.options(ChargeSection::Required),
            vec!["HANDLING CHARGES", "Service Fee"]
        );
        assert_eq!(
            catalog.options(ChargeSection::Marginal),
            vec!["HANDLING CHARGES", "Service Fee", "Profit Margin", "Administration Fee"]
        );
        assert!(!catalog.contains(ChargeSection::Required, "Profit Margin"));
        assert!(catalog.contains(ChargeSection::Marginal, "Profit Margin"));
    }

    #[test]
    fn test_resolve() {
        let catalog = ChargeCatalog::fallback();
        assert_eq!(
            catalog.resolve(ChargeSection::Required, " INSPECTION CHARGES "),
            ChargeDescription::catalog("INSPECTION CHARGES")
        );
        assert_eq!(
            catalog.resolve(ChargeSection::Required, "Profit Margin"),
            ChargeDescription::custom("Profit Margin")
        );
        assert_eq!(
            catalog.resolve(ChargeSection::Marginal, "Profit Margin"),
            ChargeDescription::catalog("Profit Margin")
        );
    }

    #[test]
    fn test_standard_set() {
        let defaults = DefaultCharge::standard_set();
        assert_eq!(
            defaults,
            vec![
                DefaultCharge::new("CUSTOMS CLEARANCE SERVICE CHARGE (NUWASIB)", dec!(30.000)),
                DefaultCharge::new("INSPECTION CHARGES", dec!(10.000)),
                DefaultCharge::new("GLOBAL CLEARINGHOUSE SYSTEMS CHARGES", dec!(27.210)),
            ]
        );

        let item = defaults[2].to_line_item();
        assert_eq!(item.amount(), dec!(27.210));
        assert_eq!(item.section(), ChargeSection::Required);
    }
}
