//! Transaction register formatting

use crate::config::Settings;
use crate::models::{Transaction, TransactionKind};

use super::truncate;

/// Format transactions as a register, one row each
pub fn format_transaction_register(transactions: &[Transaction], settings: &Settings) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<28}  {:<16}  {:<5}  {:>14}\n",
        "Date", "Description", "Account", "Kind", "Amount"
    ));
    output.push_str(&"-".repeat(83));
    output.push('\n');

    for txn in transactions {
        let kind = match txn.kind {
            Some(TransactionKind::CardSpend) => "spend",
            Some(TransactionKind::CardPayment) => "pay",
            _ => "",
        };
        output.push_str(&format!(
            "{:<10}  {:<28}  {:<16}  {:<5}  {:>14}\n",
            txn.date.format(&settings.date_format).to_string(),
            truncate(&txn.description, 28),
            truncate(txn.account_name.as_deref().unwrap_or("-"), 16),
            kind,
            settings.format_money(txn.signed_amount()),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_register_rows() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut payment = Transaction::expense(Money::from_cents(10_000), "Pagamento fatura Nubank 03/2025", date)
            .with_kind(TransactionKind::CardPayment);
        payment.account_name = Some("Cartões".into());
        let salary = Transaction::income(Money::from_cents(500_000), "Salário", date);

        let output = format_transaction_register(&[payment, salary], &Settings::default());
        assert!(output.contains("10/03/2025"));
        assert!(output.contains("Pagamento fatura Nubank 0..."));
        assert!(output.contains("-R$100.00"));
        assert!(output.contains("R$5000.00"));
        assert!(output.contains("pay"));
    }

    #[test]
    fn test_empty_register() {
        assert!(format_transaction_register(&[], &Settings::default()).contains("No transactions"));
    }
}
