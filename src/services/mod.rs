//! Service layer for cardledger
//!
//! Business logic on top of the storage layer: validation, cross-entity
//! updates and audit logging.

pub mod account;
pub mod bill;
pub mod card;
pub mod purchase;
pub mod selector;
pub mod summary;
pub mod transaction;

pub use account::AccountService;
pub use bill::{BillService, BillStatement, BillTransition, StatementLine};
pub use card::{CardService, CreateCardInput};
pub use purchase::{PurchaseService, RecordPurchaseInput};
pub use selector::{select_credit_card, CardSelection, FormChange, TransactionForm};
pub use summary::{
    aggregate_balances, aggregate_balances_default, BalanceBucket, BalanceEntry,
    MAX_BALANCE_ENTRIES,
};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
