//! Credit card model
//!
//! Holds the card's limit accounting and its billing-cycle configuration.
//! `available_limit + used_limit == total_limit` holds after every
//! `charge`, `release` and `set_total_limit`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CreditCardId;
use super::money::Money;

/// A credit card with its limits and cycle days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CreditCardId,

    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub name: String,

    /// Card network (visa, mastercard, elo, ...)
    #[serde(default)]
    pub brand: String,

    #[serde(default, alias = "lastFourDigits", skip_serializing_if = "Option::is_none")]
    pub last_four_digits: Option<String>,

    #[serde(alias = "totalLimit")]
    pub total_limit: Money,

    #[serde(alias = "availableLimit")]
    pub available_limit: Money,

    #[serde(alias = "usedLimit")]
    pub used_limit: Money,

    /// Day of month the statement closes (1-31, clamped to month length)
    #[serde(alias = "closingDay")]
    pub closing_day: u32,

    /// Day of month the statement is due (1-31, clamped to month length)
    #[serde(alias = "dueDay")]
    pub due_day: u32,

    /// Monthly interest rate in percent, charged on overdue balances
    #[serde(default, alias = "interestRate", skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,

    #[serde(default, alias = "annualFee", skip_serializing_if = "Option::is_none")]
    pub annual_fee: Option<Money>,

    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,

    #[serde(default = "default_color")]
    pub color: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

fn default_color() -> String {
    "#8A05BE".to_string()
}

impl CreditCard {
    /// Create a new card with its whole limit available
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        total_limit: Money,
        closing_day: u32,
        due_day: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CreditCardId::new(),
            user_id: None,
            name: name.into(),
            brand: brand.into(),
            last_four_digits: None,
            total_limit,
            available_limit: total_limit,
            used_limit: Money::zero(),
            closing_day,
            due_day,
            interest_rate: None,
            annual_fee: None,
            is_active: true,
            color: default_color(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move `amount` from available to used
    pub fn charge(&mut self, amount: Money) -> Result<(), CardLimitError> {
        if !self.is_active {
            return Err(CardLimitError::Inactive);
        }
        if amount > self.available_limit {
            return Err(CardLimitError::Exceeded {
                requested: amount,
                available: self.available_limit,
            });
        }
        self.used_limit += amount;
        self.available_limit = self.total_limit - self.used_limit;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move `amount` back from used to available; used never drops below zero
    pub fn release(&mut self, amount: Money) {
        self.used_limit = self.used_limit.saturating_sub(amount);
        self.available_limit = self.total_limit - self.used_limit;
        self.updated_at = Utc::now();
    }

    /// Change the total limit, keeping what is already used
    pub fn set_total_limit(&mut self, total_limit: Money) {
        self.total_limit = total_limit;
        self.available_limit = total_limit - self.used_limit;
        self.updated_at = Utc::now();
    }

    pub fn limits_balanced(&self) -> bool {
        self.available_limit + self.used_limit == self.total_limit
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Validate the card configuration
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }
        if !(1..=31).contains(&self.closing_day) {
            return Err(CardValidationError::InvalidDay(self.closing_day));
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(CardValidationError::InvalidDay(self.due_day));
        }
        if let Some(digits) = &self.last_four_digits {
            if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(CardValidationError::InvalidLastFour(digits.clone()));
            }
        }
        if self.total_limit.is_negative() {
            return Err(CardValidationError::NegativeLimit);
        }
        if matches!(self.interest_rate, Some(rate) if rate < 0.0) {
            return Err(CardValidationError::NegativeRate);
        }
        Ok(())
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last_four_digits {
            Some(digits) => write!(f, "{} ({} •••• {})", self.name, self.brand, digits),
            None => write!(f, "{} ({})", self.name, self.brand),
        }
    }
}

/// Why a charge was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLimitError {
    Inactive,
    Exceeded { requested: Money, available: Money },
}

impl fmt::Display for CardLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "Card is inactive"),
            Self::Exceeded {
                requested,
                available,
            } => write!(f, "Charge of {} exceeds available {}", requested, available),
        }
    }
}

impl std::error::Error for CardLimitError {}

/// Validation errors for credit cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    InvalidDay(u32),
    InvalidLastFour(String),
    NegativeLimit,
    NegativeRate,
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::InvalidDay(day) => write!(f, "Day must be between 1 and 31, got {}", day),
            Self::InvalidLastFour(s) => write!(f, "Last four digits must be 4 digits, got '{}'", s),
            Self::NegativeLimit => write!(f, "Card limit cannot be negative"),
            Self::NegativeRate => write!(f, "Interest rate cannot be negative"),
        }
    }
}

impl std::error::Error for CardValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CreditCard {
        CreditCard::new("Roxinho", "mastercard", Money::from_cents(100000), 5, 12)
    }

    #[test]
    fn test_new_card_fully_available() {
        let card = card();
        assert_eq!(card.available_limit, card.total_limit);
        assert!(card.used_limit.is_zero());
        assert!(card.limits_balanced());
    }

    #[test]
    fn test_charge_and_release_keep_invariant() {
        let mut card = card();
        card.charge(Money::from_cents(30000)).unwrap();
        assert_eq!(card.used_limit.cents(), 30000);
        assert_eq!(card.available_limit.cents(), 70000);
        assert!(card.limits_balanced());

        card.release(Money::from_cents(50000));
        assert!(card.used_limit.is_zero());
        assert_eq!(card.available_limit, card.total_limit);
    }

    #[test]
    fn test_charge_over_limit() {
        let mut card = card();
        let err = card.charge(Money::from_cents(100001)).unwrap_err();
        assert!(matches!(err, CardLimitError::Exceeded { .. }));
        assert!(card.used_limit.is_zero());
    }

    #[test]
    fn test_inactive_card_refuses_charge() {
        let mut card = card();
        card.deactivate();
        assert_eq!(
            card.charge(Money::from_cents(1)),
            Err(CardLimitError::Inactive)
        );
    }

    #[test]
    fn test_set_total_limit() {
        let mut card = card();
        card.charge(Money::from_cents(40000)).unwrap();
        card.set_total_limit(Money::from_cents(200000));
        assert_eq!(card.available_limit.cents(), 160000);
        assert!(card.limits_balanced());
    }

    #[test]
    fn test_validation() {
        let mut card = card();
        assert!(card.validate().is_ok());

        card.closing_day = 0;
        assert_eq!(card.validate(), Err(CardValidationError::InvalidDay(0)));

        card.closing_day = 5;
        card.last_four_digits = Some("12a4".into());
        assert!(matches!(
            card.validate(),
            Err(CardValidationError::InvalidLastFour(_))
        ));
    }
}
