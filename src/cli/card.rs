//! Credit card CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_card_details, format_card_list};
use crate::error::LedgerResult;
use crate::services::{CardService, CreateCardInput};
use crate::storage::Storage;

use super::parse_money;

/// Credit card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Register a new credit card
    Create {
        /// Card name
        name: String,
        /// Total credit limit (e.g., "5000.00")
        #[arg(short, long)]
        limit: String,
        /// Day of month the bill closes (1-31)
        #[arg(long)]
        closing_day: u32,
        /// Day of month the bill is due (1-31)
        #[arg(long)]
        due_day: u32,
        /// Card brand
        #[arg(short, long, default_value = "other")]
        brand: String,
        /// Last four digits of the card number
        #[arg(long)]
        last_four: Option<String>,
        /// Monthly interest on overdue bills, in percent
        #[arg(long)]
        interest: Option<f64>,
        /// Annual fee
        #[arg(long)]
        annual_fee: Option<String>,
    },
    /// List credit cards
    List {
        /// Include inactive cards
        #[arg(short, long)]
        all: bool,
    },
    /// Show card details
    Show {
        /// Card name or ID
        card: String,
    },
    /// Change a card's total limit
    Limit {
        /// Card name or ID
        card: String,
        /// New total limit
        amount: String,
    },
    /// Stop accepting purchases on a card
    Deactivate {
        /// Card name or ID
        card: String,
    },
}

/// Handle a credit card command
pub fn handle_card_command(storage: &Storage, settings: &Settings, cmd: CardCommands) -> LedgerResult<()> {
    let service = CardService::new(storage);

    match cmd {
        CardCommands::Create {
            name,
            limit,
            closing_day,
            due_day,
            brand,
            last_four,
            interest,
            annual_fee,
        } => {
            let annual_fee = annual_fee.as_deref().map(parse_money).transpose()?;
            let card = service.create(CreateCardInput {
                name,
                brand,
                total_limit: parse_money(&limit)?,
                closing_day,
                due_day,
                last_four_digits: last_four,
                interest_rate: interest,
                annual_fee,
            })?;

            println!("Created card: {}", card);
            println!("  Limit:  {}", settings.format_money(card.total_limit));
            println!("  Closes: day {}, due: day {}", card.closing_day, card.due_day);
            println!("  ID:     {}", card.id);
        }

        CardCommands::List { all } => {
            print!("{}", format_card_list(&service.list(all)?, settings));
        }

        CardCommands::Show { card } => {
            print!("{}", format_card_details(&service.require(&card)?, settings));
        }

        CardCommands::Limit { card, amount } => {
            let found = service.require(&card)?;
            let updated = service.set_limit(found.id, parse_money(&amount)?)?;
            println!(
                "{}: limit {}, available {}",
                updated.name,
                settings.format_money(updated.total_limit),
                settings.format_money(updated.available_limit)
            );
        }

        CardCommands::Deactivate { card } => {
            let found = service.require(&card)?;
            let updated = service.deactivate(found.id)?;
            println!("Deactivated card: {}", updated.name);
        }
    }

    Ok(())
}
