//! Bill CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_bill_list, format_statement, format_transitions};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, PaymentMethod};
use crate::services::{BillService, CardService};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_period};

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// List bills
    List {
        /// Only bills of this card
        #[arg(short, long)]
        card: Option<String>,
    },
    /// Show a bill statement
    Show {
        /// Card name or ID
        card: String,
        /// Reference period (MM/YYYY)
        period: String,
    },
    /// Advance bill statuses (close, mark paid or overdue)
    Refresh {
        /// Evaluate as of this date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Pay a bill
    Pay {
        /// Card name or ID
        card: String,
        /// Reference period (MM/YYYY)
        period: String,
        /// Amount to pay, defaults to the remaining balance
        #[arg(short, long)]
        amount: Option<String>,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Payment method (pix, boleto, debit, transfer, cash, other)
        #[arg(short, long, default_value = "pix")]
        method: String,
    },
}

/// Handle a bill command
pub fn handle_bill_command(storage: &Storage, settings: &Settings, cmd: BillCommands) -> LedgerResult<()> {
    let cards = CardService::new(storage);
    let service = BillService::new(storage, settings);

    match cmd {
        BillCommands::List { card } => {
            let card_id = card.map(|c| cards.require(&c)).transpose()?.map(|c| c.id);
            let bills = service.list(card_id)?;
            print!("{}", format_bill_list(&bills, &cards.list(true)?, settings));
        }

        BillCommands::Show { card, period } => {
            let card = cards.require(&card)?;
            let (month, year) = parse_period(&period)?;
            print!("{}", format_statement(&service.statement(card.id, month, year)?, settings));
        }

        BillCommands::Refresh { date } => {
            let today = parse_date(date.as_deref())?;
            println!("{}", format_transitions(&service.refresh(today)?));
        }

        BillCommands::Pay {
            card,
            period,
            amount,
            date,
            method,
        } => {
            let card = cards.require(&card)?;
            let (month, year) = parse_period(&period)?;
            let method = PaymentMethod::parse(&method).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid payment method: '{}'. Valid methods: pix, boleto, debit, transfer, cash, other",
                    method
                ))
            })?;

            let bill = service.statement(card.id, month, year)?.bill;
            let amount = match amount {
                Some(amount) => parse_money(&amount)?,
                None => bill.remaining_amount().max(Money::zero()),
            };

            service.pay(bill.id, amount, parse_date(date.as_deref())?, method)?;
            let bill = service.statement(card.id, month, year)?.bill;

            println!(
                "Paid {} on {} {:02}/{}",
                settings.format_money(amount),
                card.name,
                month,
                year
            );
            println!(
                "  Remaining: {}  Status: {}",
                settings.format_money(bill.remaining_amount().max(Money::zero())),
                bill.status
            );
        }
    }

    Ok(())
}
