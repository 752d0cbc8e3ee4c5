//! Storage layer for cardledger
//!
//! JSON file repositories with atomic writes, plus the audit logger every
//! mutating service writes through.

pub mod accounts;
pub mod bills;
pub mod cards;
pub mod file_io;
pub mod purchases;
pub mod repository;
pub mod transactions;

pub use accounts::AccountRepository;
pub use bills::BillRepository;
pub use cards::CardRepository;
pub use file_io::{read_json, write_json_atomic};
pub use purchases::{PaymentRepository, PurchaseRepository};
pub use repository::{Record, Repository};
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    audit: AuditLogger,
    pub accounts: AccountRepository,
    pub cards: CardRepository,
    pub bills: BillRepository,
    pub purchases: PurchaseRepository,
    pub payments: PaymentRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            accounts: AccountRepository::new(paths.accounts_file()),
            cards: CardRepository::new(paths.cards_file()),
            bills: BillRepository::new(paths.bills_file()),
            purchases: PurchaseRepository::new(paths.purchases_file()),
            payments: PaymentRepository::new(paths.payments_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.accounts.load()?;
        self.cards.load()?;
        self.bills.load()?;
        self.purchases.load()?;
        self.payments.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.accounts.save()?;
        self.cards.save()?;
        self.bills.save()?;
        self.purchases.save()?;
        self.payments.save()?;
        self.transactions.save()?;
        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update; nothing is written when only bookkeeping fields changed
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), LedgerError> {
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after, None);
        let diff = match (&entry.before, &entry.after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };
        if diff.is_none() {
            return Ok(());
        }

        self.audit.log(&AuditEntry {
            diff_summary: diff,
            ..entry
        })
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
