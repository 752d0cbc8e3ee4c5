//! Ledger transaction model
//!
//! One canonical shape for income and expense records. Upstream records
//! arrive in mixed casing (`accountId` / `account_id`); serde aliases map
//! both onto the same fields so nothing downstream has to branch on it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CreditCardId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" | "in" | "receita" => Some(Self::Income),
            "expense" | "out" | "despesa" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Card role of a transaction, set by whoever creates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A purchase charged to a credit card
    CardSpend,
    /// A payment settling a card bill
    CardPayment,
    /// Anything unrelated to cards
    Plain,
}

impl TransactionKind {
    /// Stored form, as used in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardSpend => "card_spend",
            Self::CardPayment => "card_payment",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardSpend => write!(f, "Card spend"),
            Self::CardPayment => write!(f, "Card payment"),
            Self::Plain => write!(f, "Plain"),
        }
    }
}

/// An income or expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Magnitude; the sign comes from `transaction_type`
    pub amount: Money,

    #[serde(default, alias = "accountId", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    #[serde(default, alias = "accountName", skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,

    #[serde(default, alias = "creditCardId", skip_serializing_if = "Option::is_none")]
    pub credit_card_id: Option<CreditCardId>,

    /// Authoritative card role; `None` for records created before tagging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,

    #[serde(default)]
    pub description: String,

    pub date: NaiveDate,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create an untagged transaction
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            transaction_type,
            amount,
            account_id: None,
            account_name: None,
            credit_card_id: None,
            kind: None,
            description: description.into(),
            date,
            created_at: Utc::now(),
        }
    }

    pub fn expense(amount: Money, description: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, description, date)
    }

    pub fn income(amount: Money, description: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount, description, date)
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_card(mut self, card_id: CreditCardId) -> Self {
        self.credit_card_id = Some(card_id);
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Income positive, expense negative
    pub fn signed_amount(&self) -> Money {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Fold a signed upstream amount into type + magnitude and trim text fields
    pub fn normalize(mut self) -> Self {
        if self.amount.is_negative() {
            self.amount = self.amount.abs();
            self.transaction_type = TransactionType::Expense;
        }
        self.description = self.description.trim().to_string();
        self.account_name = self
            .account_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }
        if self.kind == Some(TransactionKind::CardSpend) && self.transaction_type != TransactionType::Expense {
            return Err(TransactionValidationError::CardSpendMustBeExpense);
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    NegativeAmount(Money),
    CardSpendMustBeExpense,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::NegativeAmount(amount) => write!(
                f,
                "Transaction amount must be a magnitude, got {}",
                amount
            ),
            Self::CardSpendMustBeExpense => write!(f, "Card spending must be an expense"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_signed_amount() {
        let income = Transaction::income(Money::from_cents(1000), "Salário", date());
        let expense = Transaction::expense(Money::from_cents(1000), "Mercado", date());
        assert_eq!(income.signed_amount().cents(), 1000);
        assert_eq!(expense.signed_amount().cents(), -1000);
    }

    #[test]
    fn test_camel_case_ingestion() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "expense",
            "amount": 5000,
            "creditCardId": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "accountName": " Nubank ",
            "description": "Uber",
            "date": "2025-01-15"
        }"#;
        let txn: Transaction = serde_json::from_str::<Transaction>(json).unwrap().normalize();
        assert!(txn.credit_card_id.is_some());
        assert_eq!(txn.account_name.as_deref(), Some("Nubank"));
        assert!(txn.kind.is_none());
    }

    #[test]
    fn test_normalize_signed_amount() {
        let mut txn = Transaction::income(Money::from_cents(-250), "Estorno", date());
        txn = txn.normalize();
        assert_eq!(txn.transaction_type, TransactionType::Expense);
        assert_eq!(txn.amount.cents(), 250);
    }

    #[test]
    fn test_validation() {
        let txn = Transaction::expense(Money::zero(), "Nothing", date());
        assert_eq!(txn.validate(), Err(TransactionValidationError::ZeroAmount));

        let txn = Transaction::income(Money::from_cents(100), "Refund", date())
            .with_kind(TransactionKind::CardSpend);
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::CardSpendMustBeExpense)
        );
    }

    #[test]
    fn test_display() {
        let txn = Transaction::expense(Money::from_cents(5000), "Padaria", date());
        assert_eq!(format!("{}", txn), "2025-01-15 Padaria -$50.00");
    }
}
