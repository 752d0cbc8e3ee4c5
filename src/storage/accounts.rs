//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json, ordered by name.

use std::cmp::Ordering;

use crate::error::LedgerError;
use crate::models::{Account, AccountId};

use super::repository::{Record, Repository};

pub type AccountRepository = Repository<Account>;

impl Record for Account {
    type Id = AccountId;
    const ENTITY: &'static str = "Account";

    fn id(&self) -> AccountId {
        self.id
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then(self.created_at.cmp(&other.created_at))
    }
}

impl Repository<Account> {
    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        let name = name.trim().to_lowercase();
        self.find(|a| a.name.to_lowercase() == name)
    }

    /// Check if a name is taken, optionally ignoring one account
    pub fn name_exists(&self, name: &str, exclude: Option<AccountId>) -> Result<bool, LedgerError> {
        let name = name.trim().to_lowercase();
        Ok(self
            .find(|a| a.name.to_lowercase() == name && Some(a.id) != exclude)?
            .is_some())
    }

    /// The account flagged as default, if any
    pub fn get_default(&self) -> Result<Option<Account>, LedgerError> {
        self.find(|a| a.is_default)
    }

    /// The credit-card shadow account, if any
    pub fn get_shadow(&self) -> Result<Option<Account>, LedgerError> {
        self.find(|a| a.is_shadow())
    }
}
