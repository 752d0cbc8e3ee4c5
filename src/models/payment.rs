//! Credit card bill payment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BillId, PaymentId, TransactionId};
use super::money::Money;

/// How a bill was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Pix,
    BankSlip,
    DirectDebit,
    Transfer,
    Cash,
    Other,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pix" => Some(Self::Pix),
            "bank_slip" | "boleto" => Some(Self::BankSlip),
            "direct_debit" | "debit" => Some(Self::DirectDebit),
            "transfer" | "ted" => Some(Self::Transfer),
            "cash" => Some(Self::Cash),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix => write!(f, "PIX"),
            Self::BankSlip => write!(f, "Bank slip"),
            Self::DirectDebit => write!(f, "Direct debit"),
            Self::Transfer => write!(f, "Transfer"),
            Self::Cash => write!(f, "Cash"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A payment made against a bill, linked to the ledger transaction that paid it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardPayment {
    pub id: PaymentId,

    #[serde(alias = "billId")]
    pub bill_id: BillId,

    pub amount: Money,

    #[serde(alias = "paymentDate")]
    pub payment_date: NaiveDate,

    #[serde(default, alias = "paymentMethod")]
    pub payment_method: PaymentMethod,

    #[serde(default, alias = "transactionId")]
    pub transaction_id: Option<TransactionId>,

    pub created_at: DateTime<Utc>,
}

impl CreditCardPayment {
    pub fn new(
        bill_id: BillId,
        amount: Money,
        payment_date: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            bill_id,
            amount,
            payment_date,
            payment_method,
            transaction_id: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(PaymentMethod::parse("boleto"), Some(PaymentMethod::BankSlip));
        assert_eq!(PaymentMethod::parse("PIX"), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn test_new_payment_unlinked() {
        let payment = CreditCardPayment::new(
            BillId::new(),
            Money::from_cents(5000),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            PaymentMethod::Pix,
        );
        assert!(payment.transaction_id.is_none());
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["payment_method"], "pix");
    }
}
