//! Purchase CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::services::{CardService, PurchaseService, RecordPurchaseInput};
use crate::storage::Storage;

use super::{parse_date, parse_money};

/// Purchase subcommands
#[derive(Subcommand)]
pub enum PurchaseCommands {
    /// Record a purchase on a credit card
    Add {
        /// Card name or ID
        card: String,
        /// Total amount (e.g., "100.00")
        amount: String,
        /// What was bought
        description: String,
        /// Number of installments
        #[arg(short = 'n', long, default_value = "1")]
        installments: u32,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
    },
    /// List purchases on a card
    List {
        /// Card name or ID
        card: String,
    },
}

/// Handle a purchase command
pub fn handle_purchase_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PurchaseCommands,
) -> LedgerResult<()> {
    let cards = CardService::new(storage);
    let service = PurchaseService::new(storage, settings);

    match cmd {
        PurchaseCommands::Add {
            card,
            amount,
            description,
            installments,
            date,
            merchant,
        } => {
            let card = cards.require(&card)?;
            let purchase = service.record(RecordPurchaseInput {
                card_id: card.id,
                description,
                amount: parse_money(&amount)?,
                purchase_date: parse_date(date.as_deref())?,
                installments,
                merchant,
            })?;

            println!(
                "Recorded purchase on {}: {} {}",
                card.name,
                purchase.description,
                settings.format_money(purchase.amount)
            );
            for installment in &purchase.schedule {
                println!(
                    "  {}/{}  {}  due {}",
                    installment.installment_number,
                    purchase.installments,
                    settings.format_money(installment.amount),
                    installment.due_date.format(&settings.date_format)
                );
            }
        }

        PurchaseCommands::List { card } => {
            let card = cards.require(&card)?;
            let purchases = service.list_for_card(card.id)?;
            if purchases.is_empty() {
                println!("No purchases on {}.", card.name);
            }
            for purchase in purchases {
                let paid = purchase.schedule.iter().filter(|i| i.is_paid).count();
                println!(
                    "{}  {:<30}  {:>12}  {}/{} paid  {:>12} to go",
                    purchase.purchase_date.format(&settings.date_format),
                    purchase.description,
                    settings.format_money(purchase.amount),
                    paid,
                    purchase.installments,
                    settings.format_money(purchase.outstanding())
                );
            }
        }
    }

    Ok(())
}
