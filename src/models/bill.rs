//! Credit card bill (statement) model
//!
//! One bill exists per `(card_id, reference_month, reference_year)`. Its
//! lifecycle only moves forward:
//!
//! ```text
//! open ──(closing date)──> closed ──(paid >= total)──> paid
//!                                 └─(past due date)──> overdue
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cycle::BillingCycle;
use super::ids::{BillId, CreditCardId};
use super::money::Money;
use super::purchase::CreditCardInstallment;

/// Status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Open,
    Closed,
    Paid,
    Overdue,
}

impl BillStatus {
    /// Whether the lifecycle admits moving from `self` to `to`
    pub fn can_transition(self, to: BillStatus) -> bool {
        matches!(
            (self, to),
            (Self::Open, Self::Closed) | (Self::Closed, Self::Paid) | (Self::Closed, Self::Overdue)
        ) || self == to
    }

    /// The status a bill should have on `today`, ignoring its history
    ///
    /// The paid check precedes the overdue check, so a fully paid bill past
    /// its due date is `Paid`.
    pub fn evaluate(bill: &CreditCardBill, today: NaiveDate) -> BillStatus {
        if today < bill.closing_date {
            Self::Open
        } else if bill.paid_amount >= bill.total_amount {
            Self::Paid
        } else if today > bill.due_date {
            Self::Overdue
        } else {
            Self::Closed
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
            Self::Paid => write!(f, "Paid"),
            Self::Overdue => write!(f, "Overdue"),
        }
    }
}

/// Charges applied when a bill becomes overdue, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverdueCharges {
    pub late_fee_percent: f64,
    pub interest_percent: f64,
}

/// A monthly statement of a credit card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardBill {
    pub id: BillId,

    #[serde(alias = "cardId")]
    pub card_id: CreditCardId,

    #[serde(alias = "referenceMonth")]
    pub reference_month: u32,

    #[serde(alias = "referenceYear")]
    pub reference_year: i32,

    #[serde(alias = "openingDate")]
    pub opening_date: NaiveDate,

    #[serde(alias = "closingDate")]
    pub closing_date: NaiveDate,

    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate,

    #[serde(default, alias = "totalAmount")]
    pub total_amount: Money,

    #[serde(default, alias = "paidAmount")]
    pub paid_amount: Money,

    #[serde(default, alias = "minimumPayment")]
    pub minimum_payment: Money,

    #[serde(default, alias = "interestAmount")]
    pub interest_amount: Money,

    #[serde(default, alias = "lateFee")]
    pub late_fee: Money,

    #[serde(default)]
    pub status: BillStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl CreditCardBill {
    /// Create an empty open bill for a cycle
    pub fn for_cycle(card_id: CreditCardId, cycle: &BillingCycle) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            card_id,
            reference_month: cycle.reference_month,
            reference_year: cycle.reference_year,
            opening_date: cycle.opening_date,
            closing_date: cycle.closing_date,
            due_date: cycle.due_date,
            total_amount: Money::zero(),
            paid_amount: Money::zero(),
            minimum_payment: Money::zero(),
            interest_amount: Money::zero(),
            late_fee: Money::zero(),
            status: BillStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this bill is the statement for `(month, year)`
    pub fn is_reference(&self, month: u32, year: i32) -> bool {
        self.reference_month == month && self.reference_year == year
    }

    /// `total_amount - paid_amount`; negative when overpaid
    pub fn remaining_amount(&self) -> Money {
        self.total_amount - self.paid_amount
    }

    /// Recompute totals from the installments posted against this bill
    pub fn recompute(&mut self, installments: &[CreditCardInstallment], minimum_percent: f64) {
        let posted: Money = installments
            .iter()
            .filter(|i| i.bill_id == Some(self.id))
            .map(|i| i.amount)
            .sum();

        self.total_amount = posted + self.interest_amount + self.late_fee;
        let remaining = self.remaining_amount().max(Money::zero());
        self.minimum_payment = self.total_amount.percent(minimum_percent).min(remaining);
        self.updated_at = Utc::now();
    }

    /// Part of a new payment of `amount` that goes to installments
    ///
    /// Payments settle late fee and interest first. Those charges never
    /// took card limit, so only the remainder frees any.
    pub fn principal_share(&self, amount: Money) -> Money {
        let charges = self.late_fee + self.interest_amount;
        let charges_due = (charges - self.paid_amount).max(Money::zero());
        amount - amount.min(charges_due)
    }

    /// Record a payment amount against this bill
    pub fn apply_payment(&mut self, amount: Money) {
        self.paid_amount += amount;
        let remaining = self.remaining_amount().max(Money::zero());
        self.minimum_payment = self.minimum_payment.min(remaining);
        self.updated_at = Utc::now();
    }

    /// Move the status forward as far as `today` allows
    ///
    /// Returns every status entered, in order. Statuses are never revisited:
    /// a paid or overdue bill stays where it is.
    pub fn advance(&mut self, today: NaiveDate, charges: OverdueCharges) -> Vec<BillStatus> {
        let mut entered = Vec::new();

        loop {
            let target = BillStatus::evaluate(self, today);
            let next = match (self.status, target) {
                (BillStatus::Open, BillStatus::Open) => None,
                (BillStatus::Open, _) => Some(BillStatus::Closed),
                (BillStatus::Closed, BillStatus::Paid) => Some(BillStatus::Paid),
                (BillStatus::Closed, BillStatus::Overdue) => Some(BillStatus::Overdue),
                _ => None,
            };

            let Some(next) = next else { break };
            debug_assert!(self.status.can_transition(next));

            if next == BillStatus::Overdue {
                self.accrue_overdue_charges(charges);
            }
            self.status = next;
            self.updated_at = Utc::now();
            entered.push(next);
        }

        entered
    }

    fn accrue_overdue_charges(&mut self, charges: OverdueCharges) {
        let remaining = self.remaining_amount().max(Money::zero());
        let late_fee = remaining.percent(charges.late_fee_percent);
        let interest = remaining.percent(charges.interest_percent);

        self.late_fee += late_fee;
        self.interest_amount += interest;
        self.total_amount += late_fee + interest;
    }
}

impl fmt::Display for CreditCardBill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:04} {} {}",
            self.reference_month, self.reference_year, self.status, self.total_amount
        )
    }
}
