//! CSV export
//!
//! Each export writes a header row followed by one row per record. Amounts
//! are plain decimals without a currency symbol.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::CreditCardId;
use crate::storage::Storage;

#[derive(Serialize)]
struct BillRow {
    id: String,
    card: String,
    period: String,
    opening_date: String,
    closing_date: String,
    due_date: String,
    total_amount: String,
    paid_amount: String,
    minimum_payment: String,
    interest_amount: String,
    late_fee: String,
    status: String,
}

#[derive(Serialize)]
struct InstallmentRow {
    purchase_id: String,
    card: String,
    description: String,
    purchase_date: String,
    installment: String,
    amount: String,
    due_date: String,
    bill_period: String,
    paid: bool,
}

#[derive(Serialize)]
struct TransactionRow {
    id: String,
    date: String,
    #[serde(rename = "type")]
    transaction_type: String,
    description: String,
    account: String,
    card: String,
    kind: String,
    amount: String,
}

fn card_names(storage: &Storage) -> LedgerResult<HashMap<CreditCardId, String>> {
    Ok(storage
        .cards
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

/// Export bills, optionally for one card, oldest period first
pub fn export_bills_csv<W: Write>(
    storage: &Storage,
    writer: W,
    card_id: Option<CreditCardId>,
) -> LedgerResult<usize> {
    let cards = card_names(storage)?;
    let bills = match card_id {
        Some(card_id) => storage.bills.get_by_card(card_id)?,
        None => storage.bills.get_all()?,
    };

    let mut csv = ::csv::Writer::from_writer(writer);
    for bill in &bills {
        csv.serialize(BillRow {
            id: bill.id.as_uuid().to_string(),
            card: cards.get(&bill.card_id).cloned().unwrap_or_default(),
            period: format!("{:02}/{}", bill.reference_month, bill.reference_year),
            opening_date: bill.opening_date.to_string(),
            closing_date: bill.closing_date.to_string(),
            due_date: bill.due_date.to_string(),
            total_amount: bill.total_amount.to_decimal_string(),
            paid_amount: bill.paid_amount.to_decimal_string(),
            minimum_payment: bill.minimum_payment.to_decimal_string(),
            interest_amount: bill.interest_amount.to_decimal_string(),
            late_fee: bill.late_fee.to_decimal_string(),
            status: bill.status.to_string().to_lowercase(),
        })?;
    }
    csv.flush()?;

    tracing::debug!(rows = bills.len(), "bills exported");
    Ok(bills.len())
}

/// Export every installment of every purchase, optionally for one card
pub fn export_installments_csv<W: Write>(
    storage: &Storage,
    writer: W,
    card_id: Option<CreditCardId>,
) -> LedgerResult<usize> {
    let cards = card_names(storage)?;
    let bills: HashMap<_, _> = storage
        .bills
        .get_all()?
        .into_iter()
        .map(|b| (b.id, format!("{:02}/{}", b.reference_month, b.reference_year)))
        .collect();
    let purchases = match card_id {
        Some(card_id) => storage.purchases.get_by_card(card_id)?,
        None => storage.purchases.get_all()?,
    };

    let mut csv = ::csv::Writer::from_writer(writer);
    let mut rows = 0;
    for purchase in &purchases {
        for installment in &purchase.schedule {
            csv.serialize(InstallmentRow {
                purchase_id: purchase.id.as_uuid().to_string(),
                card: cards.get(&purchase.card_id).cloned().unwrap_or_default(),
                description: purchase.description.clone(),
                purchase_date: purchase.purchase_date.to_string(),
                installment: format!("{}/{}", installment.installment_number, purchase.installments),
                amount: installment.amount.to_decimal_string(),
                due_date: installment.due_date.to_string(),
                bill_period: installment
                    .bill_id
                    .and_then(|id| bills.get(&id).cloned())
                    .unwrap_or_default(),
                paid: installment.is_paid,
            })?;
            rows += 1;
        }
    }
    csv.flush()?;

    tracing::debug!(rows, "installments exported");
    Ok(rows)
}

/// Export ledger transactions, newest first, with signed amounts
pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: W) -> LedgerResult<usize> {
    let cards = card_names(storage)?;
    let transactions = storage.transactions.get_all()?;

    let mut csv = ::csv::Writer::from_writer(writer);
    for txn in &transactions {
        csv.serialize(TransactionRow {
            id: txn.id.as_uuid().to_string(),
            date: txn.date.to_string(),
            transaction_type: txn.transaction_type.to_string().to_lowercase(),
            description: txn.description.clone(),
            account: txn.account_name.clone().unwrap_or_default(),
            card: txn
                .credit_card_id
                .and_then(|id| cards.get(&id).cloned())
                .unwrap_or_default(),
            kind: txn.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
            amount: txn.signed_amount().to_decimal_string(),
        })?;
    }
    csv.flush()?;

    Ok(transactions.len())
}
