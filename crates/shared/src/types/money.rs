//! Money helpers and currencies.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` throughout.
//!
//! All supported currencies are dinar-style currencies with a minor unit of
//! 1/1000, so amounts are rounded and displayed with three decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used for every stored and displayed amount.
pub const AMOUNT_DECIMAL_PLACES: u32 = 3;

/// Largest amount accepted for a rate, tax, advance or line amount
/// (one quadrillion).
///
/// Sums of capped amounts stay far below `Decimal::MAX`, so ledger and
/// totals arithmetic cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Rounds an amount to three decimal places, half away from zero.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly three decimal places (`30` -> `"30.000"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_amount(amount);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(AMOUNT_DECIMAL_PLACES);
    rounded.to_string()
}

/// ISO 4217 currency codes supported by the system.
///
/// Every variant uses a minor unit of 1/1000 of the major unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Kuwaiti Dinar
    #[default]
    Kwd,
    /// Bahraini Dinar
    Bhd,
    /// Jordanian Dinar
    Jod,
    /// Omani Rial
    Omr,
}

impl Currency {
    /// Number of decimal places of the minor unit.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        AMOUNT_DECIMAL_PLACES
    }

    /// Singular name of the major unit, as used in amounts in words.
    #[must_use]
    pub const fn major_unit(self) -> &'static str {
        match self {
            Self::Kwd | Self::Bhd | Self::Jod => "Dinar",
            Self::Omr => "Rial",
        }
    }

    /// Plural name of the major unit.
    #[must_use]
    pub const fn major_unit_plural(self) -> &'static str {
        match self {
            Self::Kwd | Self::Bhd | Self::Jod => "Dinars",
            Self::Omr => "Rials",
        }
    }

    /// Name of the minor unit. Not pluralized.
    #[must_use]
    pub const fn minor_unit(self) -> &'static str {
        match self {
            Self::Kwd | Self::Bhd | Self::Jod => "Fils",
            Self::Omr => "Baisa",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kwd => write!(f, "KWD"),
            Self::Bhd => write!(f, "BHD"),
            Self::Jod => write!(f, "JOD"),
            Self::Omr => write!(f, "OMR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KWD" => Ok(Self::Kwd),
            "BHD" => Ok(Self::Bhd),
            "JOD" => Ok(Self::Jod),
            "OMR" => Ok(Self::Omr),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
