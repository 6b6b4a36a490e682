//! Clearline invoice CLI
//!
//! Builds freight invoices from draft files, prints the charges and totals,
//! and submits finalized invoices to the back office.

mod draft;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clearline_client::ApiClient;
use clearline_core::invoice::{
    ChargeCatalog, ChargeSection, InvoiceFlow, InvoiceSession, amount_in_words,
};
use clearline_shared::config::InvoiceConfig;
use clearline_shared::types::Currency;
use clearline_shared::{AppConfig, AppError, AppResult};

use crate::draft::Draft;

#[derive(Debug, Parser)]
#[command(name = "clearline", author, version, about = "Freight invoice charges and totals")]
struct Cli {
    /// Currency for amounts and words, e.g. KWD or OMR.
    #[arg(long, global = true, env = "CLEARLINE_CURRENCY")]
    currency: Option<Currency>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the charges and totals of a draft invoice.
    Totals {
        /// Draft invoice JSON file.
        draft: PathBuf,
        /// Flow to open, overriding the draft.
        #[arg(long)]
        flow: Option<InvoiceFlow>,
        /// Load the charge catalog from the back office.
        #[arg(long)]
        fetch_catalog: bool,
    },
    /// Finalize a draft invoice and submit it.
    Submit {
        /// Draft invoice JSON file.
        draft: PathBuf,
        /// Flow to open, overriding the draft.
        #[arg(long)]
        flow: Option<InvoiceFlow>,
        /// Print the request body instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print an amount in words.
    Words {
        /// Amount, e.g. 82.710.
        amount: Decimal,
    },
    /// List the charge types offered in the description dropdown.
    ChargeTypes {
        /// Include the marginal-only options.
        #[arg(long)]
        marginal: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays clean for output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clearline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(currency) = cli.currency {
        config.invoice.currency = currency;
    }

    if let Err(err) = run(cli.command, &config).await {
        error!(code = err.error_code(), "{err}");
        return Err(err.into());
    }
    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> AppResult<()> {
    match command {
        Command::Totals {
            draft,
            flow,
            fetch_catalog,
        } => {
            let draft = read_draft(&draft)?;
            let fallback = ChargeCatalog::from_config(&config.invoice);
            let catalog = if fetch_catalog {
                ApiClient::new(&config.api)?.load_catalog(fallback).await
            } else {
                fallback
            };
            let session = open_session(&draft, flow, catalog, &config.invoice)?;
            print_session(&session);
        }
        Command::Submit {
            draft,
            flow,
            dry_run,
        } => {
            let draft = read_draft(&draft)?;
            let client = ApiClient::new(&config.api)?;
            let catalog = client
                .load_catalog(ChargeCatalog::from_config(&config.invoice))
                .await;
            let session = open_session(&draft, flow, catalog, &config.invoice)?;
            print_session(&session);

            let meta = draft
                .invoice
                .as_ref()
                .ok_or_else(|| AppError::Validation("Draft has no invoice section".to_string()))?;
            let request = session.finalize(meta)?;

            if dry_run {
                let body = serde_json::to_string_pretty(&request)
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                println!("{body}");
                return Ok(());
            }

            let response = client.create_invoice(&request).await?;
            println!(
                "Invoice created: {}",
                response.invoice_number.as_deref().unwrap_or("(no number)")
            );
            if let Some(id) = response.invoice_id {
                info!(invoice_id = %id, "Stored invoice");
            }
        }
        Command::Words { amount } => {
            println!("{}", amount_in_words(amount, config.invoice.currency)?);
        }
        Command::ChargeTypes { marginal } => {
            let section = if marginal {
                ChargeSection::Marginal
            } else {
                ChargeSection::Required
            };
            let catalog = ApiClient::new(&config.api)?
                .load_catalog(ChargeCatalog::from_config(&config.invoice))
                .await;
            for name in catalog.options(section) {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn read_draft(path: &Path) -> AppResult<Draft> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::Validation(format!("Cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| AppError::Validation(format!("Invalid draft {}: {e}", path.display())))
}

fn open_session(
    draft: &Draft,
    flow: Option<InvoiceFlow>,
    catalog: ChargeCatalog,
    config: &InvoiceConfig,
) -> AppResult<InvoiceSession> {
    let flow = flow.or(draft.flow).unwrap_or_default();
    let mut session = InvoiceSession::from_config(flow, catalog, config)?;
    draft.apply(&mut session)?;
    Ok(session)
}

fn print_session(session: &InvoiceSession) {
    println!("{}", render_session(session));
}

fn render_session(session: &InvoiceSession) -> String {
    let mut lines = Vec::new();
    for row in session.ledger().rows() {
        let item = row.item;
        let section = match item.section() {
            ChargeSection::Required => "",
            ChargeSection::Marginal => " (marginal)",
        };
        lines.push(format!("{:>3}. {}{section}", row.position, item.description()));
        lines.push(format!(
            "     {} {} x {} = {}",
            item.quantity(),
            item.unit(),
            item.formatted_unit_rate(),
            item.formatted_amount(),
        ));
    }

    let totals = session.totals();
    let formatted = totals.formatted();
    let code = totals.currency;
    lines.push(String::new());
    if !totals.marginal_subtotal.is_zero() {
        lines.push(format!("Required charges: {:>16} {code}", formatted.required_subtotal));
        lines.push(format!("Marginal charges: {:>16} {code}", formatted.marginal_subtotal));
    }
    lines.push(format!("Subtotal:         {:>16} {code}", formatted.subtotal));
    lines.push(format!("Tax:              {:>16} {code}", formatted.tax));
    lines.push(format!("Total:            {:>16} {code}", formatted.total));
    lines.push(format!("Advance:          {:>16} {code}", formatted.advance));
    lines.push(format!("Balance due:      {:>16} {code}", formatted.balance_due));
    if totals.is_overpaid() {
        lines.push("(advance exceeds total)".to_string());
    }
    lines.push(formatted.amount_in_words);
    lines.join("\n")
}
