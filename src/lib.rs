//! cardledger - credit card bills, installments and balances from the terminal
//!
//! The crate tracks credit cards with their billing cycles, splits purchases
//! into installments posted to monthly bills, records bill payments and keeps
//! a ledger of plain transactions. Balances are summarized per account with a
//! classifier that separates card spending from bill payments.
//!
//! # Architecture
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (cards, bills, purchases, transactions)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use cardledger::config::{LedgerPaths, Settings};
//! use cardledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
