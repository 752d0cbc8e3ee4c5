//! Credit card purchases and their installments
//!
//! A purchase of `amount` split into `N` installments owns exactly `N`
//! installment records whose amounts sum to `amount` to the cent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::CreditCard;
use super::cycle::BillingCycle;
use super::ids::{BillId, CreditCardId, InstallmentId, PurchaseId, TransactionId};
use super::money::Money;

/// Upper bound on installments accepted for one purchase
pub const MAX_INSTALLMENTS: u32 = 48;

/// Split `amount` into `parts` installments
///
/// Every installment is `amount / parts` rounded half-up to the cent; the
/// residual goes to the final installment so the sum is exactly `amount`.
///
/// # Examples
/// ```
/// use cardledger::models::{split_installments, Money};
/// let parts = split_installments(Money::from_cents(10000), 3);
/// assert_eq!(parts, vec![
///     Money::from_cents(3333),
///     Money::from_cents(3333),
///     Money::from_cents(3334),
/// ]);
/// ```
pub fn split_installments(amount: Money, parts: u32) -> Vec<Money> {
    if parts == 0 {
        return Vec::new();
    }

    let base = amount.div_round(parts);
    let mut amounts = vec![base; parts as usize];
    let leading: Money = amounts[..amounts.len() - 1].iter().sum();
    if let Some(last) = amounts.last_mut() {
        *last = amount - leading;
    }
    amounts
}

/// One scheduled slice of a purchase, posted to one bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardInstallment {
    pub id: InstallmentId,

    #[serde(alias = "purchaseId")]
    pub purchase_id: PurchaseId,

    /// 1-based position within the purchase
    #[serde(alias = "installmentNumber")]
    pub installment_number: u32,

    pub amount: Money,

    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate,

    /// Bill this installment posts against (non-owning)
    #[serde(default, alias = "billId")]
    pub bill_id: Option<BillId>,

    #[serde(default, alias = "isPaid")]
    pub is_paid: bool,
}

/// A purchase made on a credit card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardPurchase {
    pub id: PurchaseId,

    #[serde(alias = "cardId")]
    pub card_id: CreditCardId,

    /// Bill of the first installment
    #[serde(default, alias = "billId")]
    pub bill_id: Option<BillId>,

    pub description: String,

    pub amount: Money,

    #[serde(alias = "purchaseDate")]
    pub purchase_date: NaiveDate,

    pub installments: u32,

    #[serde(alias = "installmentAmount")]
    pub installment_amount: Money,

    #[serde(default, alias = "isInstallment")]
    pub is_installment: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    /// Installments owned by this purchase
    #[serde(default)]
    pub schedule: Vec<CreditCardInstallment>,

    /// Ledger entry posted for this purchase
    #[serde(default, alias = "transactionId", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,

    pub created_at: DateTime<Utc>,
}

impl CreditCardPurchase {
    /// Create a purchase without a schedule yet
    pub fn new(
        card_id: CreditCardId,
        description: impl Into<String>,
        amount: Money,
        purchase_date: NaiveDate,
        installments: u32,
    ) -> Self {
        Self {
            id: PurchaseId::new(),
            card_id,
            bill_id: None,
            description: description.into(),
            amount,
            purchase_date,
            installments,
            installment_amount: amount.div_round(installments.max(1)),
            is_installment: installments > 1,
            merchant: None,
            schedule: Vec::new(),
            transaction_id: None,
            created_at: Utc::now(),
        }
    }

    /// Validate amount and installment count
    pub fn validate(&self) -> Result<(), PurchaseValidationError> {
        if self.description.trim().is_empty() {
            return Err(PurchaseValidationError::EmptyDescription);
        }
        if !self.amount.is_positive() {
            return Err(PurchaseValidationError::NonPositiveAmount(self.amount));
        }
        if self.installments == 0 || self.installments > MAX_INSTALLMENTS {
            return Err(PurchaseValidationError::InvalidInstallments(self.installments));
        }
        // Rounding the leading installments up can leave nothing for the last one
        if split_installments(self.amount, self.installments)
            .iter()
            .any(|amount| !amount.is_positive())
        {
            return Err(PurchaseValidationError::InstallmentBelowOneCent);
        }
        Ok(())
    }

    /// Lay out the installment schedule over the card's billing cycles
    ///
    /// Installment `k` falls in the purchase's cycle shifted by `k - 1`
    /// months. Bill ids are left unset; linking them is the caller's job.
    pub fn schedule_on(&mut self, card: &CreditCard) -> Vec<BillingCycle> {
        let first = BillingCycle::containing(card, self.purchase_date);
        let amounts = split_installments(self.amount, self.installments);

        let mut cycles = Vec::with_capacity(amounts.len());
        self.schedule = amounts
            .into_iter()
            .enumerate()
            .map(|(index, amount)| {
                let cycle = first.shift(index as i32);
                cycles.push(cycle);
                CreditCardInstallment {
                    id: InstallmentId::new(),
                    purchase_id: self.id,
                    installment_number: index as u32 + 1,
                    amount,
                    due_date: cycle.due_date,
                    bill_id: None,
                    is_paid: false,
                }
            })
            .collect();

        cycles
    }

    /// Sum of the installment schedule
    pub fn scheduled_total(&self) -> Money {
        self.schedule.iter().map(|i| i.amount).sum()
    }

    /// Sum of installments not yet paid
    pub fn outstanding(&self) -> Money {
        self.schedule
            .iter()
            .filter(|i| !i.is_paid)
            .map(|i| i.amount)
            .sum()
    }
}

impl fmt::Display for CreditCardPurchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_installment {
            write!(
                f,
                "{} {} {} ({}x {})",
                self.purchase_date.format("%Y-%m-%d"),
                self.description,
                self.amount,
                self.installments,
                self.installment_amount
            )
        } else {
            write!(
                f,
                "{} {} {}",
                self.purchase_date.format("%Y-%m-%d"),
                self.description,
                self.amount
            )
        }
    }
}

/// Validation errors for purchases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    InvalidInstallments(u32),
    InstallmentBelowOneCent,
}

impl fmt::Display for PurchaseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Purchase description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Purchase amount must be positive, got {}", amount)
            }
            Self::InvalidInstallments(n) => write!(
                f,
                "Installments must be between 1 and {}, got {}",
                MAX_INSTALLMENTS, n
            ),
            Self::InstallmentBelowOneCent => {
                write!(f, "Each installment must be at least one cent")
            }
        }
    }
}

impl std::error::Error for PurchaseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_split_three_ways() {
        let parts = split_installments(Money::from_cents(10000), 3);
        let cents: Vec<i64> = parts.iter().map(|m| m.cents()).collect();
        assert_eq!(cents, vec![3333, 3333, 3334]);
    }

    #[test]
    fn test_split_rounds_half_up_and_reconciles_last() {
        // 100.00 / 6 = 16.666.. -> 16.67, last takes the shortfall
        let parts = split_installments(Money::from_cents(10000), 6);
        assert_eq!(parts[0].cents(), 1667);
        assert_eq!(parts[5].cents(), 1665);
        assert_eq!(parts.iter().sum::<Money>().cents(), 10000);
    }

    #[test]
    fn test_split_sum_invariant() {
        for cents in [1_i64, 7, 99, 100, 1001, 33333, 123457, 999999] {
            for n in 1..=12u32 {
                if (n as i64) > cents {
                    continue;
                }
                let parts = split_installments(Money::from_cents(cents), n);
                assert_eq!(parts.len(), n as usize);
                assert_eq!(parts.iter().sum::<Money>().cents(), cents);
            }
        }
    }

    #[test]
    fn test_single_installment() {
        let parts = split_installments(Money::from_cents(4990), 1);
        assert_eq!(parts, vec![Money::from_cents(4990)]);
    }

    #[test]
    fn test_schedule_spans_consecutive_cycles() {
        let card = CreditCard::new("Test", "visa", Money::from_cents(500000), 5, 12);
        let mut purchase =
            CreditCardPurchase::new(card.id, "Notebook", Money::from_cents(10000), date(2025, 11, 20), 3);

        let cycles = purchase.schedule_on(&card);
        let refs: Vec<(i32, u32)> = cycles
            .iter()
            .map(|c| (c.reference_year, c.reference_month))
            .collect();
        assert_eq!(refs, vec![(2025, 12), (2026, 1), (2026, 2)]);

        assert_eq!(purchase.schedule.len(), 3);
        assert_eq!(purchase.schedule[0].due_date, date(2025, 12, 12));
        assert_eq!(purchase.schedule[2].installment_number, 3);
        assert_eq!(purchase.scheduled_total(), purchase.amount);
        assert_eq!(purchase.installment_amount.cents(), 3333);
        assert!(purchase.is_installment);

        purchase.schedule[0].is_paid = true;
        assert_eq!(purchase.outstanding().cents(), 6667);
    }

    #[test]
    fn test_validation() {
        let card_id = CreditCardId::new();
        let mut purchase =
            CreditCardPurchase::new(card_id, "Coffee", Money::from_cents(500), date(2025, 1, 1), 1);
        assert!(purchase.validate().is_ok());

        purchase.installments = 0;
        assert_eq!(
            purchase.validate(),
            Err(PurchaseValidationError::InvalidInstallments(0))
        );

        purchase.installments = 1;
        purchase.amount = Money::zero();
        assert!(matches!(
            purchase.validate(),
            Err(PurchaseValidationError::NonPositiveAmount(_))
        ));

        let tiny = CreditCardPurchase::new(card_id, "Gum", Money::from_cents(2), date(2025, 1, 1), 3);
        assert_eq!(
            tiny.validate(),
            Err(PurchaseValidationError::InstallmentBelowOneCent)
        );
    }
}
