//! Transaction repository, newest first
//!
//! Records are normalized on load so upstream dumps with signed amounts or
//! padded names come out in canonical shape.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::models::{AccountId, Transaction, TransactionId};

use super::repository::{Record, Repository};

pub type TransactionRepository = Repository<Transaction>;

impl Record for Transaction {
    type Id = TransactionId;
    const ENTITY: &'static str = "Transaction";

    fn id(&self) -> TransactionId {
        self.id
    }

    fn compare(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then(other.created_at.cmp(&self.created_at))
    }

    fn normalize(self) -> Self {
        Transaction::normalize(self)
    }
}

impl Repository<Transaction> {
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.filter(|t| t.account_id == Some(account_id))
    }

    /// Transactions dated within `[start, end]`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.filter(|t| t.date >= start && t.date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionType};
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_load_normalizes_signed_amounts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        std::fs::write(
            &path,
            r#"[{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "type": "income",
                "amount": -1500,
                "description": "  Fatura cartão  ",
                "date": "2025-01-10"
            }]"#,
        )
        .unwrap();

        let repo = TransactionRepository::new(path);
        repo.load().unwrap();

        let txn = &repo.get_all().unwrap()[0];
        assert_eq!(txn.transaction_type, TransactionType::Expense);
        assert_eq!(txn.amount.cents(), 1500);
        assert_eq!(txn.description, "Fatura cartão");
    }

    #[test]
    fn test_ordering_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        let account_id = AccountId::new();

        repo.upsert(Transaction::expense(Money::from_cents(100), "a", date(1)).with_account(account_id))
            .unwrap();
        repo.upsert(Transaction::expense(Money::from_cents(200), "b", date(20)))
            .unwrap();
        repo.upsert(Transaction::income(Money::from_cents(300), "c", date(10)).with_account(account_id))
            .unwrap();

        let all: Vec<_> = repo.get_all().unwrap().into_iter().map(|t| t.description).collect();
        assert_eq!(all, vec!["b", "c", "a"]);

        assert_eq!(repo.get_by_account(account_id).unwrap().len(), 2);
        assert_eq!(repo.get_by_date_range(date(5), date(15)).unwrap().len(), 1);
    }
}
