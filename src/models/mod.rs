//! Core data models for cardledger
//!
//! Accounts, credit cards, billing cycles, bills, purchases with their
//! installments, payments and ledger transactions.

pub mod account;
pub mod bill;
pub mod card;
pub mod cycle;
pub mod ids;
pub mod money;
pub mod payment;
pub mod purchase;
pub mod transaction;

pub use account::{Account, AccountType};
pub use bill::{BillStatus, CreditCardBill, OverdueCharges};
pub use card::{CardLimitError, CreditCard};
pub use cycle::BillingCycle;
pub use ids::{AccountId, BillId, CreditCardId, InstallmentId, PaymentId, PurchaseId, TransactionId};
pub use money::Money;
pub use payment::{CreditCardPayment, PaymentMethod};
pub use purchase::{split_installments, CreditCardInstallment, CreditCardPurchase};
pub use transaction::{Transaction, TransactionKind, TransactionType};
