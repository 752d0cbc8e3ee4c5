//! Transaction CLI commands
//!
//! `txn add --card` runs the card selection the form uses, so a card
//! expense lands on the credit-card account unless `--account` is given.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_transaction_register;
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionType;
use crate::services::{
    select_credit_card, AccountService, CardSelection, CardService, CreateTransactionInput,
    TransactionFilter, TransactionForm, TransactionService,
};
use crate::storage::Storage;

use super::{parse_date, parse_money};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a transaction
    Add {
        /// Amount, always positive (e.g., "45.90")
        amount: String,
        /// Description
        description: String,
        /// Record as income instead of expense
        #[arg(short, long)]
        income: bool,
        /// Account name or ID, defaults to the default account
        #[arg(short, long)]
        account: Option<String>,
        /// Credit card name or ID
        #[arg(short, long)]
        card: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Filter by account
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by card
        #[arg(short, long)]
        card: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let accounts = AccountService::new(storage);
    let cards = CardService::new(storage);
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            income,
            account,
            card,
            date,
        } => {
            let mut form = match account {
                Some(account) => TransactionForm::with_pinned_account(accounts.require(&account)?.id),
                None => TransactionForm::with_default_account(
                    storage.accounts.get_default()?.map(|a| a.id),
                ),
            };

            if let Some(card) = card {
                let card = cards.require(&card)?;
                let changes =
                    select_credit_card(&mut form, CardSelection::Card(card.id), &accounts.list()?);
                tracing::debug!(?changes, "card selected");
            }

            let txn = service.create(CreateTransactionInput {
                transaction_type: if income {
                    TransactionType::Income
                } else {
                    TransactionType::Expense
                },
                amount: parse_money(&amount)?,
                description,
                date: parse_date(date.as_deref())?,
                account_id: form.account_id,
                credit_card_id: form.credit_card_id,
                kind: None,
            })?;

            println!(
                "Added: {} {}  [{}]",
                txn.description,
                settings.format_money(txn.signed_amount()),
                txn.account_name.as_deref().unwrap_or("no account")
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            card,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(account) = account {
                filter = filter.account(accounts.require(&account)?.id);
            }
            if let Some(card) = card {
                filter = filter.card(cards.require(&card)?.id);
            }

            print!("{}", format_transaction_register(&service.list(filter)?, settings));
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| LedgerError::NotFound {
                    entity_type: "Transaction",
                    identifier: id,
                })?;
            let txn = service.delete(txn.id)?;
            println!("Deleted: {}", txn);
        }
    }

    Ok(())
}
