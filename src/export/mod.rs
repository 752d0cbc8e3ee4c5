//! Export module for cardledger
//!
//! CSV exports of bills, installments and ledger transactions for use in
//! spreadsheets.

pub mod csv;

pub use self::csv::{export_bills_csv, export_installments_csv, export_transactions_csv};
