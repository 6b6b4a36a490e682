//! Invoice authoring session.
//!
//! One session owns the ledger, the tax and advance inputs and the derived
//! totals for a single invoice being written. Every mutator recomputes the
//! totals before it returns, so `totals()` is always current.

use chrono::{Days, NaiveDate};
use clearline_shared::config::InvoiceConfig;
use clearline_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::catalog::{ChargeCatalog, DefaultCharge};
use super::error::InvoiceError;
use super::input::lenient_amount;
use super::ledger::ChargeLedger;
use super::line_item::{ChargeDescription, ChargeLineItem, ChargeSection};
use super::payload::{
    AdvancePayment, ChargePayload, CreateInvoiceRequest, InvoiceData, InvoiceMeta, TotalsPayload,
};
use super::totals::InvoiceTotals;

/// Payment terms used when none are configured.
pub const DEFAULT_DUE_DAYS: u32 = 30;

/// Payment method recorded when an advance has no payment details.
pub const DEFAULT_ADVANCE_METHOD: &str = "cash";

/// Screen the invoice is being written from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceFlow {
    /// Quick invoice modal on the dashboard.
    #[default]
    DashboardModal,
    /// Full-page invoice form.
    StandaloneForm,
    /// Charges step of the job-card wizard.
    ChargesWizard,
}

impl InvoiceFlow {
    /// Returns true if the flow starts from the default charges.
    #[must_use]
    pub fn seeds_defaults(self) -> bool {
        !matches!(self, Self::ChargesWizard)
    }
}

impl std::fmt::Display for InvoiceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DashboardModal => write!(f, "dashboard_modal"),
            Self::StandaloneForm => write!(f, "standalone_form"),
            Self::ChargesWizard => write!(f, "charges_wizard"),
        }
    }
}

impl std::str::FromStr for InvoiceFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dashboard_modal" | "modal" => Ok(Self::DashboardModal),
            "standalone_form" | "form" => Ok(Self::StandaloneForm),
            "charges_wizard" | "wizard" => Ok(Self::ChargesWizard),
            other => Err(format!("unknown invoice flow: {other}")),
        }
    }
}

/// State of one invoice being authored.
#[derive(Debug, Clone)]
pub struct InvoiceSession {
    flow: InvoiceFlow,
    currency: Currency,
    catalog: ChargeCatalog,
    defaults: Vec<DefaultCharge>,
    due_days: u32,
    ledger: ChargeLedger,
    tax: Decimal,
    advance: Decimal,
    totals: InvoiceTotals,
}

impl InvoiceSession {
    /// Opens a session and fills the ledger the way `flow` starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial totals cannot be computed.
    pub fn open(
        flow: InvoiceFlow,
        catalog: ChargeCatalog,
        defaults: Vec<DefaultCharge>,
        currency: Currency,
    ) -> Result<Self, InvoiceError> {
        let ledger = ChargeLedger::new();
        let totals = InvoiceTotals::recompute(&ledger, Decimal::ZERO, Decimal::ZERO, currency)?;
        let mut session = Self {
            flow,
            currency,
            catalog,
            defaults,
            due_days: DEFAULT_DUE_DAYS,
            ledger,
            tax: Decimal::ZERO,
            advance: Decimal::ZERO,
            totals,
        };
        session.populate();
        session.refresh()?;
        info!(flow = %flow, charges = session.ledger.len(), "Invoice session opened");
        Ok(session)
    }

    /// Opens a session with currency, defaults and payment terms from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial totals cannot be computed.
    pub fn from_config(
        flow: InvoiceFlow,
        catalog: ChargeCatalog,
        config: &InvoiceConfig,
    ) -> Result<Self, InvoiceError> {
        let session = Self::open(
            flow,
            catalog,
            DefaultCharge::from_config(config),
            config.currency,
        )?;
        Ok(session.with_due_days(config.due_days))
    }

    /// Sets the payment terms in days.
    #[must_use]
    pub fn with_due_days(mut self, due_days: u32) -> Self {
        self.due_days = due_days;
        self
    }

    fn populate(&mut self) {
        if self.flow.seeds_defaults() {
            self.ledger.seed_defaults(&self.defaults);
        } else {
            for section in [ChargeSection::Required, ChargeSection::Marginal] {
                self.ledger.add_item(
                    ChargeLineItem::new(ChargeDescription::custom(String::new()))
                        .with_section(section),
                );
            }
        }
    }

    fn refresh(&mut self) -> Result<(), InvoiceError> {
        self.totals = InvoiceTotals::recompute(&self.ledger, self.tax, self.advance, self.currency)?;
        debug!(
            subtotal = %self.totals.subtotal,
            total = %self.totals.total,
            balance_due = %self.totals.balance_due,
            "Invoice totals updated"
        );
        Ok(())
    }

    /// Appends a charge with quantity 1 and rate 0 and returns its position.
    ///
    /// `description` is matched against the catalog; anything else is kept
    /// as a custom description.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn add_charge(
        &mut self,
        section: ChargeSection,
        description: &str,
    ) -> Result<usize, InvoiceError> {
        let description = self.catalog.resolve(section, description);
        self.add_item(ChargeLineItem::new(description).with_section(section))
    }

    /// Appends a fully built line item and returns its position.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn add_item(&mut self, item: ChargeLineItem) -> Result<usize, InvoiceError> {
        let position = self.ledger.add_item(item);
        self.refresh()?;
        debug!(position, "Charge added");
        Ok(position)
    }

    /// Removes the charge at `index` (0-based); out of range is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn remove_charge(&mut self, index: usize) -> Result<Option<ChargeLineItem>, InvoiceError> {
        let removed = self.ledger.remove_item(index);
        if removed.is_some() {
            self.refresh()?;
            debug!(index, "Charge removed");
        }
        Ok(removed)
    }

    /// Sets a quantity from raw field text.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn set_quantity(&mut self, index: usize, text: &str) -> Result<bool, InvoiceError> {
        let changed = self.ledger.set_quantity_input(index, text);
        self.refresh_if(changed)
    }

    /// Sets a unit rate from raw field text.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn set_unit_rate(&mut self, index: usize, text: &str) -> Result<bool, InvoiceError> {
        let changed = self.ledger.set_unit_rate_input(index, text);
        self.refresh_if(changed)
    }

    /// Sets a description, resolving it against the catalog for the row's section.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn set_description(&mut self, index: usize, text: &str) -> Result<bool, InvoiceError> {
        let Some(section) = self.ledger.get(index).map(ChargeLineItem::section) else {
            return Ok(false);
        };
        let description = self.catalog.resolve(section, text);
        let changed = self.ledger.set_description(index, description);
        self.refresh_if(changed)
    }

    /// Sets a unit label; blank text resets it to the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn set_unit(&mut self, index: usize, unit: &str) -> Result<bool, InvoiceError> {
        let changed = self.ledger.update_item(index, |item| item.set_unit(unit));
        self.refresh_if(changed)
    }

    fn refresh_if(&mut self, changed: bool) -> Result<bool, InvoiceError> {
        if changed {
            self.refresh()?;
        }
        Ok(changed)
    }

    /// Sets the tax amount.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidAmount`] if `tax` is negative; the
    /// session is left unchanged.
    pub fn set_tax(&mut self, tax: Decimal) -> Result<(), InvoiceError> {
        self.totals = InvoiceTotals::recompute(&self.ledger, tax, self.advance, self.currency)?;
        self.tax = self.totals.tax;
        debug!(tax = %self.tax, "Tax updated");
        Ok(())
    }

    /// Sets the tax amount from raw field text; unparseable text is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn set_tax_input(&mut self, text: &str) -> Result<(), InvoiceError> {
        self.set_tax(lenient_amount(text))
    }

    /// Sets the advance already paid.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidAmount`] if `advance` is negative; the
    /// session is left unchanged.
    pub fn set_advance(&mut self, advance: Decimal) -> Result<(), InvoiceError> {
        self.totals = InvoiceTotals::recompute(&self.ledger, self.tax, advance, self.currency)?;
        self.advance = self.totals.advance;
        debug!(advance = %self.advance, "Advance updated");
        Ok(())
    }

    /// Sets the advance from raw field text; unparseable text is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn set_advance_input(&mut self, text: &str) -> Result<(), InvoiceError> {
        self.set_advance(lenient_amount(text))
    }

    /// Drops every charge and refills the ledger the way the flow starts.
    ///
    /// Tax and advance are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn reset(&mut self) -> Result<(), InvoiceError> {
        self.ledger.clear();
        self.populate();
        self.refresh()?;
        debug!(flow = %self.flow, "Invoice session reset");
        Ok(())
    }

    /// Drops every charge.
    ///
    /// # Errors
    ///
    /// Returns an error if the totals cannot be recomputed.
    pub fn clear(&mut self) -> Result<(), InvoiceError> {
        self.ledger.clear();
        self.refresh()
    }

    /// Flow this session was opened for.
    #[must_use]
    pub fn flow(&self) -> InvoiceFlow {
        self.flow
    }

    /// Currency of every amount.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Catalog used to resolve descriptions.
    #[must_use]
    pub fn catalog(&self) -> &ChargeCatalog {
        &self.catalog
    }

    /// The charges.
    #[must_use]
    pub fn ledger(&self) -> &ChargeLedger {
        &self.ledger
    }

    /// Current totals.
    #[must_use]
    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    /// Payment terms in days.
    #[must_use]
    pub fn due_days(&self) -> u32 {
        self.due_days
    }

    /// Checks that the invoice can be submitted.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in row order.
    pub fn validate(&self, meta: &InvoiceMeta) -> Result<(), InvoiceError> {
        if self.ledger.is_empty() {
            return Err(InvoiceError::NoCharges);
        }
        for row in self.ledger.rows() {
            if row.item.description().is_blank() {
                return Err(InvoiceError::EmptyDescription {
                    position: row.position,
                });
            }
            if row.item.section() == ChargeSection::Required && !row.item.is_priced() {
                return Err(InvoiceError::IncompleteRequiredCharge {
                    position: row.position,
                });
            }
        }
        if meta.job_card_id.trim().is_empty() {
            return Err(InvoiceError::MissingJobCard);
        }
        Ok(())
    }

    /// Validates the invoice and builds the creation request.
    ///
    /// # Errors
    ///
    /// Returns the first validation problem; see [`Self::validate`].
    pub fn finalize(&self, meta: &InvoiceMeta) -> Result<CreateInvoiceRequest, InvoiceError> {
        self.validate(meta)?;

        let advance_payment = (self.totals.advance > Decimal::ZERO).then(|| {
            let details = meta.advance_payment.as_ref();
            AdvancePayment {
                amount: self.totals.advance,
                date: details.map_or(meta.invoice_date, |d| d.date),
                method: details.map_or_else(
                    || DEFAULT_ADVANCE_METHOD.to_string(),
                    |d| d.method.clone(),
                ),
                reference: details.and_then(|d| d.reference.clone()),
            }
        });

        let request = CreateInvoiceRequest {
            job_card_id: meta.job_card_id.trim().to_string(),
            invoice_data: InvoiceData {
                invoice_date: meta.invoice_date,
                invoice_no: meta
                    .invoice_no
                    .as_deref()
                    .map(str::trim)
                    .filter(|no| !no.is_empty())
                    .map(str::to_string),
                due_date: self.due_date(meta.invoice_date),
                notes: meta.notes.trim().to_string(),
            },
            charges: self.ledger.items().iter().map(ChargePayload::from).collect(),
            totals: TotalsPayload::from(&self.totals),
            advance_payment,
        };

        info!(
            job_card_id = %request.job_card_id,
            charges = request.charges.len(),
            total = %self.totals.total,
            "Invoice finalized"
        );
        Ok(request)
    }

    /// Invoice date plus the payment terms.
    #[must_use]
    pub fn due_date(&self, invoice_date: NaiveDate) -> NaiveDate {
        invoice_date
            .checked_add_days(Days::new(u64::from(self.due_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::payload::AdvancePaymentDetails;
    use rust_decimal_macros::dec;

    fn modal() -> InvoiceSession {
        InvoiceSession::open(
            InvoiceFlow::DashboardModal,
            ChargeCatalog::fallback(),
            DefaultCharge::standard_set(),
            Currency::Kwd,
        )
        .unwrap()
    }

    fn wizard() -> InvoiceSession {
        InvoiceSession::open(
            InvoiceFlow::ChargesWizard,
            ChargeCatalog::fallback(),
            DefaultCharge::standard_set(),
            Currency::Kwd,
        )
        .unwrap()
    }

    fn meta() -> InvoiceMeta {
        InvoiceMeta {
            job_card_id: "JC-2024-0042".into(),
            invoice_no: Some(" INV-77 ".into()),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: "Urgent shipment".into(),
            advance_payment: None,
        }
    }

    #[test]
    fn test_seeded_flows() {
        for flow in [InvoiceFlow::DashboardModal, InvoiceFlow::StandaloneForm] {
            let session = InvoiceSession::open(
                flow,
                ChargeCatalog::fallback(),
                DefaultCharge::standard_set(),
                Currency::Kwd,
            )
            .unwrap();
            assert_eq!(session.ledger().len(), 3);
            assert_eq!(session.totals().subtotal, dec!(67.210));
            assert_eq!(
                session.totals().amount_in_words,
                "Sixty-Seven Dinars and Two Hundred Ten Fils only"
            );
        }
    }

    #[test]
    fn test_wizard_starts_with_empty_rows() {
        let session = wizard();
        let sections: Vec<ChargeSection> =
            session.ledger().items().iter().map(ChargeLineItem::section).collect();
        assert_eq!(sections, vec![ChargeSection::Required, ChargeSection::Marginal]);
        assert_eq!(session.totals().subtotal, Decimal::ZERO);
        assert_eq!(session.totals().amount_in_words, "Zero Dinar only");
    }

    #[test]
    fn test_mutators_keep_totals_current() {
        let mut session = modal();
        assert_eq!(session.remove_charge(1).unwrap().unwrap().amount(), dec!(10.000));
        assert_eq!(session.totals().subtotal, dec!(57.210));

        let position = session.add_charge(ChargeSection::Required, "STORAGE CHARGES").unwrap();
        assert_eq!(position, 3);
        assert!(session.set_quantity(2, "2").unwrap());
        assert!(session.set_unit_rate(2, "5.250").unwrap());
        assert_eq!(session.totals().subtotal, dec!(67.710));

        assert!(session.set_unit_rate(2, "abc").unwrap());
        assert_eq!(session.totals().subtotal, dec!(57.210));

        assert!(!session.set_quantity(10, "4").unwrap());
        assert!(session.remove_charge(10).unwrap().is_none());
        assert_eq!(session.totals().subtotal, dec!(57.210));
    }

    #[test]
    fn test_tax_and_advance() {
        let mut session = modal();
        session.set_tax(dec!(2.790)).unwrap();
        session.set_advance_input("100").unwrap();
        assert_eq!(session.totals().total, dec!(70.000));
        assert_eq!(session.totals().balance_due, dec!(-30.000));
        assert_eq!(session.totals().amount_in_words, "Seventy Dinars only");

        assert_eq!(
            session.set_tax(dec!(-1)),
            Err(InvoiceError::InvalidAmount(dec!(-1)))
        );
        assert_eq!(session.totals().tax, dec!(2.790));

        session.set_tax_input("not a number").unwrap();
        assert_eq!(session.totals().tax, Decimal::ZERO);
    }

    #[test]
    fn test_oversized_amounts_keep_session_usable() {
        let mut session = modal();
        let subtotal = session.totals().subtotal;
        assert!(session.set_unit_rate(0, "79228162514264337593543950335").unwrap());
        assert!(session.set_unit_rate(1, "79228162514264337593543950335").unwrap());
        assert_eq!(session.ledger().get(0).unwrap().amount(), Decimal::ZERO);
        assert_eq!(session.ledger().get(1).unwrap().amount(), Decimal::ZERO);
        assert!(session.totals().subtotal < subtotal);

        assert!(session.set_unit_rate(0, "1e28").unwrap());
        assert!(session.set_quantity(0, "10").unwrap());
        assert_eq!(session.ledger().get(0).unwrap().amount(), Decimal::ZERO);

        session.set_tax(dec!(1.5)).unwrap();
        assert_eq!(
            session.set_tax(Decimal::MAX),
            Err(InvoiceError::AmountOutOfRange(Decimal::MAX))
        );
        assert_eq!(session.totals().tax, dec!(1.5));

        session.set_advance_input("1e28").unwrap();
        assert_eq!(session.totals().advance, Decimal::ZERO);
    }

    #[test]
    fn test_set_description_resolves_against_catalog() {
        let mut session = wizard();
        assert!(session.set_description(1, "Profit Margin").unwrap());
        assert!(!session.ledger().get(1).unwrap().description().is_custom());

        assert!(session.set_description(0, "Port storage").unwrap());
        assert!(session.ledger().get(0).unwrap().description().is_custom());

        assert!(!session.set_description(5, "x").unwrap());
    }

    #[test]
    fn test_reset_and_clear() {
        let mut session = modal();
        session.set_advance(dec!(5)).unwrap();
        session.clear().unwrap();
        assert!(session.ledger().is_empty());
        assert_eq!(session.totals().balance_due, dec!(-5));

        session.reset().unwrap();
        assert_eq!(session.ledger().len(), 3);
        assert_eq!(session.totals().balance_due, dec!(62.210));
    }

    #[test]
    fn test_validation_errors() {
        let mut session = modal();
        session.clear().unwrap();
        assert_eq!(session.finalize(&meta()), Err(InvoiceError::NoCharges));

        let mut session = wizard();
        assert_eq!(
            session.finalize(&meta()),
            Err(InvoiceError::EmptyDescription { position: 1 })
        );

        session.set_description(0, "INSPECTION CHARGES").unwrap();
        session.set_description(1, "Service Fee").unwrap();
        assert_eq!(
            session.finalize(&meta()),
            Err(InvoiceError::IncompleteRequiredCharge { position: 1 })
        );

        // Marginal rows may stay unpriced.
        session.set_unit_rate(0, "10").unwrap();
        assert!(session.finalize(&meta()).is_ok());

        let mut no_job = meta();
        no_job.job_card_id = "  ".into();
        assert_eq!(session.finalize(&no_job), Err(InvoiceError::MissingJobCard));
    }

    #[test]
    fn test_finalize_builds_request() {
        let session = modal();
        let request = session.finalize(&meta()).unwrap();

        assert_eq!(request.job_card_id, "JC-2024-0042");
        assert_eq!(request.invoice_data.invoice_no.as_deref(), Some("INV-77"));
        assert_eq!(
            request.invoice_data.due_date,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert_eq!(request.charges.len(), 3);
        assert_eq!(request.charges[2].amount, dec!(27.210));
        assert_eq!(request.totals.total, dec!(67.210));
        assert!(request.advance_payment.is_none());
    }

    #[test]
    fn test_finalize_with_advance() {
        let mut session = modal();
        session.set_advance(dec!(20)).unwrap();

        let request = session.finalize(&meta()).unwrap();
        let advance = request.advance_payment.unwrap();
        assert_eq!(advance.amount, dec!(20));
        assert_eq!(advance.method, DEFAULT_ADVANCE_METHOD);
        assert_eq!(advance.date, meta().invoice_date);

        let mut with_details = meta();
        with_details.advance_payment = Some(AdvancePaymentDetails {
            date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            method: "knet".into(),
            reference: Some("TX-881".into()),
        });
        let advance = session.finalize(&with_details).unwrap().advance_payment.unwrap();
        assert_eq!(advance.method, "knet");
        assert_eq!(advance.reference.as_deref(), Some("TX-881"));
        assert_eq!(request.totals.balance_due, dec!(47.210));
    }

    #[test]
    fn test_from_config_due_days() {
        let mut config = InvoiceConfig::default();
        config.due_days = 14;
        let session =
            InvoiceSession::from_config(InvoiceFlow::StandaloneForm, ChargeCatalog::default(), &config)
                .unwrap();
        assert_eq!(session.due_days(), 14);
        assert_eq!(
            session.due_date(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()),
            NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
        );
    }

    #[test]
    fn test_flow_parsing() {
        assert_eq!("wizard".parse::<InvoiceFlow>(), Ok(InvoiceFlow::ChargesWizard));
        assert_eq!("standalone-form".parse::<InvoiceFlow>(), Ok(InvoiceFlow::StandaloneForm));
        assert_eq!(InvoiceFlow::DashboardModal.to_string(), "dashboard_modal");
        assert!("kanban".parse::<InvoiceFlow>().is_err());
    }
}
