//! Account service
//!
//! Account CRUD, the default-account invariant and lookup of the
//! credit-card shadow account.

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, AccountType};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(&self, name: &str, account_type: AccountType) -> LedgerResult<Account> {
        self.create_account(Account::new(name, account_type))
    }

    /// Persist a fully built account, such as one with bank details attached
    pub fn create_account(&self, mut account: Account) -> LedgerResult<Account> {
        account.name = account.name.trim().to_string();
        if account.name.is_empty() {
            return Err(LedgerError::Validation("Account name cannot be empty".into()));
        }

        if self.storage.accounts.name_exists(&account.name, None)? {
            return Err(LedgerError::Duplicate {
                entity_type: "Account",
                identifier: account.name,
            });
        }

        // A second shadow account would make card attribution ambiguous
        if account.account_type.is_shadow() {
            if let Some(shadow) = self.storage.accounts.get_shadow()? {
                return Err(LedgerError::Duplicate {
                    entity_type: "Credit card account",
                    identifier: shadow.name,
                });
            }
        }

        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        tracing::info!(account = %account.name, kind = %account.account_type, "account created");
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        Ok(None)
    }

    /// Find an account or fail with not-found
    pub fn require(&self, identifier: &str) -> LedgerResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::account_not_found(identifier))
    }

    /// All accounts ordered by name
    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// The credit-card shadow account, if one exists
    pub fn card_account(&self) -> LedgerResult<Option<Account>> {
        self.storage.accounts.get_shadow()
    }

    /// Make `id` the only default account
    pub fn set_default(&self, id: AccountId) -> LedgerResult<Account> {
        let target = self.storage.accounts.require(id)?;

        for account in self.storage.accounts.get_all()? {
            let should_be_default = account.id == target.id;
            if account.is_default != should_be_default {
                self.write_default_flag(account, should_be_default)?;
            }
        }

        self.storage.accounts.save()?;
        self.storage.accounts.require(id)
    }

    /// Establish "exactly one default account"
    ///
    /// Creates a checking account named after `settings.default_account_name`
    /// when there are no accounts, promotes the first account by name when
    /// none is default, and clears extra defaults. Returns the default
    /// account. A second call changes nothing.
    pub fn ensure_default_account(&self, settings: &Settings) -> LedgerResult<Account> {
        let accounts = self.storage.accounts.get_all()?;

        if accounts.is_empty() {
            let mut account = Account::new(
                settings.default_account_name.trim(),
                AccountType::Checking,
            );
            account.is_default = true;
            account
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;

            self.storage.accounts.upsert(account.clone())?;
            self.storage.accounts.save()?;
            self.storage.log_create(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &account,
            )?;

            tracing::info!(account = %account.name, "created default account");
            return Ok(account);
        }

        let defaults: Vec<&Account> = accounts.iter().filter(|a| a.is_default).collect();
        let keep = match defaults.first() {
            Some(first) => first.id,
            None => accounts[0].id,
        };

        let mut changed = false;
        for account in &accounts {
            let should_be_default = account.id == keep;
            if account.is_default != should_be_default {
                self.write_default_flag(account.clone(), should_be_default)?;
                changed = true;
            }
        }

        if changed {
            self.storage.accounts.save()?;
            tracing::info!(account = %keep, "default account repaired");
        }

        self.storage.accounts.require(keep)
    }

    fn write_default_flag(&self, account: Account, is_default: bool) -> LedgerResult<()> {
        let before = account.clone();
        let mut account = account;
        account.set_default(is_default);

        self.storage.accounts.upsert(account.clone())?;
        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )
    }
}
