//! Account model
//!
//! A named money container. Accounts of type `credit_card` are shadow
//! accounts: they collect the spending stream of the cards rather than
//! holding a real bank balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;

/// Type of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    Cash,
    /// Shadow account attributing card activity to a single bucket
    CreditCard,
    Other,
}

impl AccountType {
    /// True for the synthetic card-spending account type
    pub fn is_shadow(&self) -> bool {
        matches!(self, Self::CreditCard)
    }

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "checking" | "corrente" => Some(Self::Checking),
            "savings" | "poupanca" | "poupança" => Some(Self::Savings),
            "cash" | "dinheiro" => Some(Self::Cash),
            "credit_card" | "credit" | "creditcard" | "card" => Some(Self::CreditCard),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::Cash => write!(f, "Cash"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A money container owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// Owner on the hosted platform, when known
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub name: String,

    #[serde(default, alias = "bankId", skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,

    #[serde(default, alias = "accountNumber", skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Exactly one account per user carries this flag
    #[serde(default, alias = "isDefault")]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with default values
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            user_id: None,
            name: name.into(),
            bank_id: None,
            account_number: None,
            agency: None,
            account_type,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach bank details (bank code, agency and account number)
    pub fn with_bank_details(
        mut self,
        bank_id: Option<String>,
        agency: Option<String>,
        account_number: Option<String>,
    ) -> Self {
        self.bank_id = bank_id;
        self.agency = agency;
        self.account_number = account_number;
        self
    }

    pub fn is_shadow(&self) -> bool {
        self.account_type.is_shadow()
    }

    /// Set or clear the default flag
    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
