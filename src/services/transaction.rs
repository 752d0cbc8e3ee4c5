//! Transaction service
//!
//! Creates, lists and deletes ledger transactions. Purchases and bill
//! payments post their ledger side through [`TransactionService::post`].

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, CreditCardId, Money, Transaction, TransactionId, TransactionKind, TransactionType,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub credit_card_id: Option<CreditCardId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn card(mut self, card_id: CreditCardId) -> Self {
        self.credit_card_id = Some(card_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub description: String,
    pub date: NaiveDate,
    pub account_id: Option<AccountId>,
    pub credit_card_id: Option<CreditCardId>,
    pub kind: Option<TransactionKind>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a transaction from user input
    ///
    /// An expense linked to a card without an explicit kind is tagged as
    /// card spend.
    pub fn create(&self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        if let Some(card_id) = input.credit_card_id {
            self.storage.cards.require(card_id)?;
        }

        let kind = input.kind.or_else(|| {
            (input.credit_card_id.is_some() && input.transaction_type == TransactionType::Expense)
                .then_some(TransactionKind::CardSpend)
        });

        let mut txn = Transaction::new(
            input.transaction_type,
            input.amount,
            input.description.trim(),
            input.date,
        );
        txn.account_id = input.account_id;
        txn.credit_card_id = input.credit_card_id;
        txn.kind = kind;

        self.post(txn)
    }

    /// Validate a transaction and attach its account name, without storing it
    ///
    /// Services that write a ledger entry alongside other records stage it
    /// here, save it after everything else and then call
    /// [`TransactionService::audit_posted`].
    pub fn prepare(&self, mut txn: Transaction) -> LedgerResult<Transaction> {
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if let Some(account_id) = txn.account_id {
            let account = self
                .storage
                .accounts
                .get(account_id)?
                .ok_or_else(|| LedgerError::account_not_found(account_id.to_string()))?;
            txn.account_name = Some(account.name);
        }

        Ok(txn)
    }

    /// Validate, attach the account name and persist a transaction
    pub fn post(&self, txn: Transaction) -> LedgerResult<Transaction> {
        let txn = self.prepare(txn)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.audit_posted(&txn)?;
        Ok(txn)
    }

    /// Audit a transaction that has been saved
    pub fn audit_posted(&self, txn: &Transaction) -> LedgerResult<()> {
        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            txn,
        )?;

        tracing::debug!(txn = %txn.id, kind = ?txn.kind, "transaction posted");
        Ok(())
    }

    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or its short `txn-` form
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Transaction>> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }
        self.storage
            .transactions
            .find(|t| t.id.to_string() == identifier)
    }

    /// Transactions newest first, narrowed by `filter`
    pub fn list(&self, filter: TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = if let Some(account_id) = filter.account_id {
            self.storage.transactions.get_by_account(account_id)?
        } else if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            self.storage.transactions.get_by_date_range(start, end)?
        } else {
            self.storage.transactions.get_all()?
        };

        if let Some(card_id) = filter.credit_card_id {
            transactions.retain(|t| t.credit_card_id == Some(card_id));
        }
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Delete a plain transaction
    ///
    /// Card spend and bill payment entries belong to a purchase or payment
    /// and cannot be removed on their own.
    pub fn delete(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self.storage.transactions.require(id)?;

        let linked = matches!(
            txn.kind,
            Some(TransactionKind::CardSpend) | Some(TransactionKind::CardPayment)
        ) && self.is_linked(&txn)?;
        if linked {
            return Err(LedgerError::Validation(format!(
                "Transaction {} belongs to a card purchase or bill payment",
                id
            )));
        }

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        Ok(txn)
    }

    fn is_linked(&self, txn: &Transaction) -> LedgerResult<bool> {
        let paid_by = self
            .storage
            .payments
            .find(|p| p.transaction_id == Some(txn.id))?;
        let spent_by = self
            .storage
            .purchases
            .find(|p| p.transaction_id == Some(txn.id))?;
        Ok(paid_by.is_some() || spent_by.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Account, AccountType, CreditCard};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn input(amount: i64, description: &str) -> CreateTransactionInput {
        CreateTransactionInput {
            transaction_type: TransactionType::Expense,
            amount: Money::from_cents(amount),
            description: description.to_string(),
            date: date(10),
            account_id: None,
            credit_card_id: None,
            kind: None,
        }
    }

    #[test]
    fn test_create_fills_account_name() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::new("Inter", AccountType::Checking);
        storage.accounts.upsert(account.clone()).unwrap();

        let service = TransactionService::new(&storage);
        let mut input = input(1500, " Padaria ");
        input.account_id = Some(account.id);

        let txn = service.create(input).unwrap();
        assert_eq!(txn.account_name.as_deref(), Some("Inter"));
        assert_eq!(txn.description, "Padaria");
        assert_eq!(txn.kind, None);
    }

    #[test]
    fn test_card_expense_tagged_as_spend() {
        let (_temp_dir, storage) = create_test_storage();
        let card = CreditCard::new("Nubank", "Mastercard", Money::from_cents(100_000), 5, 12);
        storage.cards.upsert(card.clone()).unwrap();

        let service = TransactionService::new(&storage);
        let mut input = input(5000, "Uber");
        input.credit_card_id = Some(card.id);

        let txn = service.create(input).unwrap();
        assert_eq!(txn.kind, Some(TransactionKind::CardSpend));
    }

    #[test]
    fn test_unknown_references_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let mut with_account = input(100, "x");
        with_account.account_id = Some(AccountId::new());
        assert!(service.create(with_account).unwrap_err().is_not_found());

        let mut with_card = input(100, "x");
        with_card.credit_card_id = Some(CreditCardId::new());
        assert!(service.create(with_card).unwrap_err().is_not_found());

        assert!(service.create(input(0, "zero")).unwrap_err().is_validation());
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        for (day, description) in [(1, "a"), (15, "b"), (28, "c")] {
            let mut input = input(100, description);
            input.date = date(day);
            service.create(input).unwrap();
        }

        let ranged = service
            .list(TransactionFilter::new().date_range(date(10), date(31)))
            .unwrap();
        assert_eq!(ranged.len(), 2);
        assert_eq!(ranged[0].description, "c");

        let limited = service.list(TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(input(100, "Café")).unwrap();

        let short = txn.id.to_string();
        assert!(short.starts_with("txn-"));
        assert_eq!(service.find(&short).unwrap().unwrap().id, txn.id);
        assert!(service.find("txn-00000000").unwrap().is_none());
    }

    #[test]
    fn test_delete_plain_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(input(100, "Café")).unwrap();

        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap().is_none());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }
}
