//! Bill display formatting
//!
//! Bill tables, statements and the status changes reported by a refresh.

use crate::config::Settings;
use crate::models::{CreditCard, CreditCardBill};
use crate::services::{BillStatement, BillTransition};

use super::{truncate, width};

fn period(bill: &CreditCardBill) -> String {
    format!("{:02}/{}", bill.reference_month, bill.reference_year)
}

/// Format bills as a table; card names are looked up in `cards`
pub fn format_bill_list(bills: &[CreditCardBill], cards: &[CreditCard], settings: &Settings) -> String {
    if bills.is_empty() {
        return "No bills found.".to_string();
    }

    let card_name = |bill: &CreditCardBill| {
        cards
            .iter()
            .find(|c| c.id == bill.card_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| bill.card_id.to_string())
    };

    let name_width = bills
        .iter()
        .map(|b| width(&card_name(b)))
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<7}  {:<10}  {:>12}  {:>12}  {:>12}  {}\n",
        "Card",
        "Period",
        "Due",
        "Total",
        "Paid",
        "Minimum",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<7}  {:-<10}  {:->12}  {:->12}  {:->12}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for bill in bills {
        output.push_str(&format!(
            "{:<name_width$}  {:<7}  {:<10}  {:>12}  {:>12}  {:>12}  {}\n",
            card_name(bill),
            period(bill),
            bill.due_date.format(&settings.date_format).to_string(),
            settings.format_money(bill.total_amount),
            settings.format_money(bill.paid_amount),
            settings.format_money(bill.minimum_payment),
            bill.status,
            name_width = name_width,
        ));
    }

    output
}

/// Format a statement: header, installment lines and payments
pub fn format_statement(statement: &BillStatement, settings: &Settings) -> String {
    let bill = &statement.bill;
    let date = |d: chrono::NaiveDate| d.format(&settings.date_format).to_string();
    let mut output = String::new();

    output.push_str(&format!(
        "Bill {} - {} ({})\n",
        period(bill),
        statement.card.name,
        bill.status
    ));
    output.push_str(&format!(
        "  Cycle:   {} to {}\n",
        date(bill.opening_date),
        date(bill.closing_date)
    ));
    output.push_str(&format!("  Due:     {}\n", date(bill.due_date)));
    output.push('\n');

    if statement.lines.is_empty() {
        output.push_str("  No installments on this bill.\n");
    } else {
        for line in &statement.lines {
            let label = if line.of > 1 {
                format!(
                    "{} ({}/{})",
                    line.description, line.installment.installment_number, line.of
                )
            } else {
                line.description.clone()
            };
            output.push_str(&format!(
                "  {:<36}  {:>12}{}\n",
                truncate(&label, 36),
                settings.format_money(line.installment.amount),
                if line.installment.is_paid { "  paid" } else { "" }
            ));
        }
    }

    output.push('\n');
    if !bill.interest_amount.is_zero() {
        output.push_str(&format!(
            "  Interest:  {:>12}\n",
            settings.format_money(bill.interest_amount)
        ));
    }
    if !bill.late_fee.is_zero() {
        output.push_str(&format!("  Late fee:  {:>12}\n", settings.format_money(bill.late_fee)));
    }
    output.push_str(&format!("  Total:     {:>12}\n", settings.format_money(bill.total_amount)));
    output.push_str(&format!("  Paid:      {:>12}\n", settings.format_money(bill.paid_amount)));
    output.push_str(&format!(
        "  Remaining: {:>12}\n",
        settings.format_money(bill.remaining_amount().max(crate::models::Money::zero()))
    ));
    output.push_str(&format!(
        "  Minimum:   {:>12}\n",
        settings.format_money(bill.minimum_payment)
    ));

    if !statement.payments.is_empty() {
        output.push_str("\nPayments:\n");
        for payment in &statement.payments {
            output.push_str(&format!(
                "  {}  {:<12}  {:>12}\n",
                date(payment.payment_date),
                payment.payment_method.to_string(),
                settings.format_money(payment.amount)
            ));
        }
    }

    output
}

/// Format the status changes reported by a refresh
pub fn format_transitions(transitions: &[BillTransition]) -> String {
    if transitions.is_empty() {
        return "All bills are up to date.".to_string();
    }

    transitions
        .iter()
        .map(|t| {
            let path: Vec<String> = std::iter::once(t.from)
                .chain(t.entered.iter().copied())
                .map(|s| s.to_string())
                .collect();
            format!("{} {}: {}", t.card_name, period(&t.bill), path.join(" -> "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillStatus, BillingCycle, CreditCardInstallment, InstallmentId, Money, PurchaseId};
    use crate::services::StatementLine;

    fn card() -> CreditCard {
        CreditCard::new("Nubank", "Mastercard", Money::from_cents(500_000), 5, 12)
    }

    fn bill(card: &CreditCard) -> CreditCardBill {
        let mut bill = CreditCardBill::for_cycle(card.id, &BillingCycle::for_reference(5, 12, 2025, 3));
        bill.total_amount = Money::from_cents(20_000);
        bill.minimum_payment = Money::from_cents(3_000);
        bill
    }

    #[test]
    fn test_format_bill_list() {
        let card = card();
        let output = format_bill_list(&[bill(&card)], &[card], &Settings::default());

        assert!(output.contains("Nubank"));
        assert!(output.contains("03/2025"));
        assert!(output.contains("12/03/2025"));
        assert!(output.contains("R$200.00"));
        assert!(output.contains("Open"));
    }

    #[test]
    fn test_format_statement_lines() {
        let card = card();
        let bill = bill(&card);
        let statement = BillStatement {
            lines: vec![StatementLine {
                description: "Notebook".into(),
                installment: CreditCardInstallment {
                    id: InstallmentId::new(),
                    purchase_id: PurchaseId::new(),
                    installment_number: 2,
                    amount: Money::from_cents(3_333),
                    due_date: bill.due_date,
                    bill_id: Some(bill.id),
                    is_paid: false,
                },
                of: 3,
            }],
            payments: Vec::new(),
            card,
            bill,
        };

        let output = format_statement(&statement, &Settings::default());
        assert!(output.contains("Bill 03/2025 - Nubank"));
        assert!(output.contains("Notebook (2/3)"));
        assert!(output.contains("R$33.33"));
        assert!(output.contains("Remaining:"));
    }

    #[test]
    fn test_format_transitions() {
        let card = card();
        let transitions = vec![BillTransition {
            card_name: card.name.clone(),
            bill: bill(&card),
            from: BillStatus::Open,
            entered: vec![BillStatus::Closed, BillStatus::Overdue],
        }];

        assert_eq!(
            format_transitions(&transitions),
            "Nubank 03/2025: Open -> Closed -> Overdue"
        );
        assert!(format_transitions(&[]).contains("up to date"));
    }
}
