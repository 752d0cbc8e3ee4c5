//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod account;
pub mod bill;
pub mod card;
pub mod export;
pub mod purchase;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use bill::{handle_bill_command, BillCommands};
pub use card::{handle_card_command, CardCommands};
pub use export::{handle_export_command, ExportCommands};
pub use purchase::{handle_purchase_command, PurchaseCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;

/// Parse a `YYYY-MM-DD` argument, defaulting to today
pub(crate) fn parse_date(arg: Option<&str>) -> LedgerResult<NaiveDate> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LedgerError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub(crate) fn parse_money(arg: &str) -> LedgerResult<Money> {
    Money::parse(arg).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1500.00' or '1500,00'. Error: {}",
            arg, e
        ))
    })
}

/// Parse a `MM/YYYY` bill period
pub(crate) fn parse_period(arg: &str) -> LedgerResult<(u32, i32)> {
    let invalid = || {
        LedgerError::Validation(format!("Invalid period: '{}'. Use MM/YYYY", arg))
    };

    let (month, year) = arg.trim().split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((month, year))
}
