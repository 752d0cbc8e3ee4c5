//! Bill service
//!
//! Advances bill statuses over time, records payments and builds
//! statements.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    BillId, BillStatus, CreditCard, CreditCardBill, CreditCardId, CreditCardInstallment,
    CreditCardPayment, CreditCardPurchase, Money, OverdueCharges, PaymentMethod, Transaction, TransactionKind,
};
use crate::storage::Storage;

use super::transaction::TransactionService;

/// Service for bill lifecycle and payments
pub struct BillService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// A bill whose status moved during a refresh
#[derive(Debug, Clone)]
pub struct BillTransition {
    pub card_name: String,
    pub bill: CreditCardBill,
    pub from: BillStatus,
    /// Statuses entered, in order
    pub entered: Vec<BillStatus>,
}

/// One installment line on a statement
#[derive(Debug, Clone)]
pub struct StatementLine {
    pub description: String,
    pub installment: CreditCardInstallment,
    /// Installment count of the owning purchase
    pub of: u32,
}

/// A bill with its installments and payments
#[derive(Debug, Clone)]
pub struct BillStatement {
    pub card: CreditCard,
    pub bill: CreditCardBill,
    pub lines: Vec<StatementLine>,
    pub payments: Vec<CreditCardPayment>,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Charges applied when a bill of `card` becomes overdue
    pub fn overdue_charges(&self, card: &CreditCard) -> OverdueCharges {
        OverdueCharges {
            late_fee_percent: self.settings.late_fee_percent,
            interest_percent: card.interest_rate.unwrap_or(0.0),
        }
    }

    pub fn get(&self, id: BillId) -> LedgerResult<Option<CreditCardBill>> {
        self.storage.bills.get(id)
    }

    /// Find a bill by ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<CreditCardBill>> {
        if let Ok(id) = identifier.parse::<BillId>() {
            return self.storage.bills.get(id);
        }
        Ok(None)
    }

    /// Bills of one card, or of every card, oldest period first
    pub fn list(&self, card_id: Option<CreditCardId>) -> LedgerResult<Vec<CreditCardBill>> {
        match card_id {
            Some(card_id) => self.storage.bills.get_by_card(card_id),
            None => self.storage.bills.get_all(),
        }
    }

    /// Advance every bill to the status `today` allows
    pub fn refresh(&self, today: NaiveDate) -> LedgerResult<Vec<BillTransition>> {
        let mut transitions = Vec::new();

        for before in self.storage.bills.get_all()? {
            let Some(card) = self.storage.cards.get(before.card_id)? else {
                tracing::warn!(bill = %before.id, "bill references a missing card; skipped");
                continue;
            };

            let mut bill = before.clone();
            let entered = bill.advance(today, self.overdue_charges(&card));
            if entered.is_empty() {
                continue;
            }

            if bill.status == BillStatus::Overdue {
                let installments = self.storage.purchases.installments_for_card(card.id)?;
                bill.recompute(&installments, self.settings.minimum_payment_percent);
            }

            self.storage.bills.upsert(bill.clone())?;
            self.storage.log_update(
                EntityType::Bill,
                bill.id.to_string(),
                Some(bill_label(&card, &bill)),
                &before,
                &bill,
            )?;

            tracing::info!(
                card = %card.name,
                period = %format!("{:02}/{}", bill.reference_month, bill.reference_year),
                from = %before.status,
                to = %bill.status,
                "bill status changed"
            );

            transitions.push(BillTransition {
                card_name: card.name,
                from: before.status,
                bill,
                entered,
            });
        }

        if !transitions.is_empty() {
            self.storage.bills.save()?;
        }
        Ok(transitions)
    }

    /// Pay part or all of a bill
    ///
    /// The amount may not exceed what remains. A full payment settles every
    /// installment of the bill.
    pub fn pay(
        &self,
        bill_id: BillId,
        amount: Money,
        payment_date: NaiveDate,
        method: PaymentMethod,
    ) -> LedgerResult<CreditCardPayment> {
        let bill_before = self.storage.bills.require(bill_id)?;
        let card_before = self.storage.cards.require(bill_before.card_id)?;

        if !amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Payment amount must be positive, got {}",
                amount
            )));
        }
        let remaining = bill_before.remaining_amount();
        if amount > remaining {
            return Err(LedgerError::Validation(format!(
                "Payment of {} exceeds the {} remaining on bill {}",
                amount,
                remaining.max(Money::zero()),
                bill_label(&card_before, &bill_before)
            )));
        }

        let transactions = TransactionService::new(self.storage);
        let mut payment = CreditCardPayment::new(bill_id, amount, payment_date, method);
        let txn = transactions.prepare(self.payment_entry(&card_before, &bill_before, &payment)?)?;
        payment.transaction_id = Some(txn.id);

        let mut bill = bill_before.clone();
        bill.apply_payment(amount);

        // Late fee and interest never took limit, so paying them frees none
        let mut card = card_before.clone();
        card.release(bill_before.principal_share(amount));

        let settled = if bill.paid_amount >= bill.total_amount {
            self.settle_installments(bill.id)?
        } else {
            Vec::new()
        };

        let entered = bill.advance(payment_date, self.overdue_charges(&card));
        if !entered.is_empty() {
            tracing::info!(card = %card.name, to = %bill.status, "bill status changed on payment");
        }

        self.storage.payments.upsert(payment.clone())?;
        self.storage.bills.upsert(bill.clone())?;
        self.storage.cards.upsert(card.clone())?;
        for (_, purchase) in &settled {
            self.storage.purchases.upsert(purchase.clone())?;
        }
        self.storage.transactions.upsert(txn.clone())?;

        // The ledger entry is saved last so a failed write cannot orphan it
        self.storage.payments.save()?;
        self.storage.bills.save()?;
        self.storage.cards.save()?;
        self.storage.purchases.save()?;
        self.storage.transactions.save()?;

        let label = bill_label(&card, &bill);
        transactions.audit_posted(&txn)?;
        self.storage.log_create(
            EntityType::Payment,
            payment.id.to_string(),
            Some(label.clone()),
            &payment,
        )?;
        self.storage
            .log_update(EntityType::Bill, bill.id.to_string(), Some(label), &bill_before, &bill)?;
        self.storage.log_update(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &card_before,
            &card,
        )?;
        for (before, purchase) in &settled {
            self.storage.log_update(
                EntityType::Purchase,
                purchase.id.to_string(),
                Some(purchase.description.clone()),
                before,
                purchase,
            )?;
        }

        tracing::info!(card = %card.name, amount = %amount, "bill payment recorded");
        Ok(payment)
    }

    /// The bill of `card_id` for a reference month with its lines and payments
    pub fn statement(
        &self,
        card_id: CreditCardId,
        month: u32,
        year: i32,
    ) -> LedgerResult<BillStatement> {
        let card = self.storage.cards.require(card_id)?;
        let bill = self
            .storage
            .bills
            .find_for_reference(card_id, month, year)?
            .ok_or_else(|| LedgerError::bill_not_found(format!("{} {:02}/{}", card.name, month, year)))?;

        let purchases = self.storage.purchases.get_by_card(card_id)?;
        let lines = self
            .storage
            .purchases
            .installments_for_bill(bill.id)?
            .into_iter()
            .map(|(description, installment)| {
                let of = purchases
                    .iter()
                    .find(|p| p.id == installment.purchase_id)
                    .map(|p| p.installments)
                    .unwrap_or(1);
                StatementLine {
                    description,
                    installment,
                    of,
                }
            })
            .collect();

        let payments = self.storage.payments.get_by_bill(bill.id)?;

        Ok(BillStatement {
            card,
            bill,
            lines,
            payments,
        })
    }

    /// Purchases with their installments on `bill_id` marked paid, as
    /// `(before, after)` pairs; nothing is stored
    fn settle_installments(
        &self,
        bill_id: BillId,
    ) -> LedgerResult<Vec<(CreditCardPurchase, CreditCardPurchase)>> {
        let purchases = self
            .storage
            .purchases
            .filter(|p| p.schedule.iter().any(|i| i.bill_id == Some(bill_id) && !i.is_paid))?;

        Ok(purchases
            .into_iter()
            .map(|before| {
                let mut purchase = before.clone();
                for installment in purchase
                    .schedule
                    .iter_mut()
                    .filter(|i| i.bill_id == Some(bill_id))
                {
                    installment.is_paid = true;
                }
                (before, purchase)
            })
            .collect())
    }

    /// The bill-payment ledger entry, on the shadow account when present
    fn payment_entry(
        &self,
        card: &CreditCard,
        bill: &CreditCardBill,
        payment: &CreditCardPayment,
    ) -> LedgerResult<Transaction> {
        let description = format!(
            "Pagamento fatura {} {:02}/{}",
            card.name, bill.reference_month, bill.reference_year
        );
        let mut txn = Transaction::expense(payment.amount, description, payment.payment_date)
            .with_card(card.id)
            .with_kind(TransactionKind::CardPayment);

        match self.storage.accounts.get_shadow()? {
            Some(shadow) => txn = txn.with_account(shadow.id),
            None => tracing::warn!(card = %card.name, "no credit card account; payment left unattributed"),
        }

        Ok(txn)
    }
}

fn bill_label(card: &CreditCard, bill: &CreditCardBill) -> String {
    format!(
        "{} {:02}/{}",
        card.name, bill.reference_month, bill.reference_year
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Account, AccountType};
    use crate::services::purchase::{PurchaseService, RecordPurchaseInput};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        settings: Settings,
        card: CreditCard,
    }

    /// Card closing on the 5th, due on the 12th, 10% monthly interest, with
    /// one 200.00 purchase on the March 2025 bill
    fn fixture() -> (Fixture, BillId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let settings = Settings::default();

        let mut card = CreditCard::new("Nubank", "Mastercard", Money::from_cents(100_000), 5, 12);
        card.interest_rate = Some(10.0);
        storage.cards.upsert(card.clone()).unwrap();

        let purchase = PurchaseService::new(&storage, &settings)
            .record(RecordPurchaseInput {
                card_id: card.id,
                description: "Mercado".to_string(),
                amount: Money::from_cents(20_000),
                purchase_date: date(2025, 2, 20),
                installments: 1,
                merchant: None,
            })
            .unwrap();
        let bill_id = purchase.bill_id.unwrap();

        let fixture = Fixture {
            _temp_dir: temp_dir,
            storage,
            settings,
            card,
        };
        (fixture, bill_id)
    }

    #[test]
    fn test_refresh_closes_then_marks_overdue() {
        let (f, bill_id) = fixture();
        let service = BillService::new(&f.storage, &f.settings);

        assert!(service.refresh(date(2025, 3, 1)).unwrap().is_empty());

        let closed = service.refresh(date(2025, 3, 5)).unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].entered, vec![BillStatus::Closed]);

        let overdue = service.refresh(date(2025, 3, 13)).unwrap();
        assert_eq!(overdue[0].from, BillStatus::Closed);

        let bill = service.get(bill_id).unwrap().unwrap();
        assert_eq!(bill.status, BillStatus::Overdue);
        assert_eq!(bill.late_fee.cents(), 400);
        assert_eq!(bill.interest_amount.cents(), 2_000);
        assert_eq!(bill.total_amount.cents(), 22_400);

        // Charges accrue once
        assert!(service.refresh(date(2025, 4, 30)).unwrap().is_empty());
        assert_eq!(service.get(bill_id).unwrap().unwrap().total_amount.cents(), 22_400);
    }

    #[test]
    fn test_full_payment_settles_bill() {
        let (f, bill_id) = fixture();
        let service = BillService::new(&f.storage, &f.settings);
        service.refresh(date(2025, 3, 6)).unwrap();

        service
            .pay(bill_id, Money::from_cents(20_000), date(2025, 3, 10), PaymentMethod::Pix)
            .unwrap();

        let bill = service.get(bill_id).unwrap().unwrap();
        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(bill.minimum_payment, Money::zero());

        let card = f.storage.cards.require(f.card.id).unwrap();
        assert_eq!(card.used_limit, Money::zero());
        assert!(card.limits_balanced());

        let installments = f.storage.purchases.installments_for_bill(bill_id).unwrap();
        assert!(installments.iter().all(|(_, i)| i.is_paid));
    }

    #[test]
    fn test_paying_charges_keeps_limit_owed_elsewhere() {
        let (f, bill_id) = fixture();
        // Lands on the April bill
        PurchaseService::new(&f.storage, &f.settings)
            .record(RecordPurchaseInput {
                card_id: f.card.id,
                description: "Farmácia".to_string(),
                amount: Money::from_cents(20_000),
                purchase_date: date(2025, 3, 10),
                installments: 1,
                merchant: None,
            })
            .unwrap();

        let service = BillService::new(&f.storage, &f.settings);
        service.refresh(date(2025, 3, 13)).unwrap();
        assert_eq!(service.get(bill_id).unwrap().unwrap().total_amount.cents(), 22_400);

        service
            .pay(bill_id, Money::from_cents(22_400), date(2025, 3, 14), PaymentMethod::Pix)
            .unwrap();

        let card = f.storage.cards.require(f.card.id).unwrap();
        assert_eq!(card.used_limit.cents(), 20_000);
        assert!(card.limits_balanced());

        let owed: i64 = f
            .storage
            .bills
            .get_by_card(f.card.id)
            .unwrap()
            .iter()
            .map(|b| b.remaining_amount().max(Money::zero()).cents())
            .sum();
        assert_eq!(card.used_limit.cents(), owed);
    }

    #[test]
    fn test_failed_save_leaves_no_payment_entry() {
        let (f, bill_id) = fixture();
        // A directory in place of payments.json makes the payment save fail
        std::fs::create_dir_all(f.storage.paths().payments_file()).unwrap();

        let result = BillService::new(&f.storage, &f.settings).pay(
            bill_id,
            Money::from_cents(5_000),
            date(2025, 3, 7),
            PaymentMethod::Pix,
        );
        assert!(result.is_err());

        let on_disk: Vec<Transaction> =
            crate::storage::read_json(f.storage.paths().transactions_file()).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].kind, Some(TransactionKind::CardSpend));

        let entries = f.storage.audit().read_all().unwrap();
        assert!(entries.iter().all(|e| e.entity_type != EntityType::Payment));
    }

    #[test]
    fn test_paid_after_due_date_is_paid_not_overdue() {
        let (f, bill_id) = fixture();
        let service = BillService::new(&f.storage, &f.settings);

        // Paid in full before anyone refreshed, observed long after due
        service
            .pay(bill_id, Money::from_cents(20_000), date(2025, 3, 1), PaymentMethod::Pix)
            .unwrap();
        service.refresh(date(2025, 5, 1)).unwrap();

        assert_eq!(service.get(bill_id).unwrap().unwrap().status, BillStatus::Paid);
    }

    #[test]
    fn test_partial_payment_and_overpayment() {
        let (f, bill_id) = fixture();
        let service = BillService::new(&f.storage, &f.settings);
        service.refresh(date(2025, 3, 6)).unwrap();

        service
            .pay(bill_id, Money::from_cents(5_000), date(2025, 3, 7), PaymentMethod::BankSlip)
            .unwrap();
        let bill = service.get(bill_id).unwrap().unwrap();
        assert_eq!(bill.status, BillStatus::Closed);
        assert_eq!(bill.remaining_amount().cents(), 15_000);

        let err = service
            .pay(bill_id, Money::from_cents(15_001), date(2025, 3, 8), PaymentMethod::Pix)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service
            .pay(bill_id, Money::zero(), date(2025, 3, 8), PaymentMethod::Pix)
            .is_err());
    }

    #[test]
    fn test_payment_posts_tagged_transaction() {
        let (f, bill_id) = fixture();
        let shadow = Account::new("Cartões", AccountType::CreditCard);
        f.storage.accounts.upsert(shadow.clone()).unwrap();
        let service = BillService::new(&f.storage, &f.settings);

        let payment = service
            .pay(bill_id, Money::from_cents(1_000), date(2025, 3, 7), PaymentMethod::Pix)
            .unwrap();

        let txn = f
            .storage
            .transactions
            .require(payment.transaction_id.unwrap())
            .unwrap();
        assert_eq!(txn.kind, Some(TransactionKind::CardPayment));
        assert_eq!(txn.account_id, Some(shadow.id));
        assert_eq!(txn.description, "Pagamento fatura Nubank 03/2025");
    }

    #[test]
    fn test_statement() {
        let (f, bill_id) = fixture();
        let service = BillService::new(&f.storage, &f.settings);
        service
            .pay(bill_id, Money::from_cents(1_000), date(2025, 3, 7), PaymentMethod::Pix)
            .unwrap();

        let statement = service.statement(f.card.id, 3, 2025).unwrap();
        assert_eq!(statement.bill.id, bill_id);
        assert_eq!(statement.lines.len(), 1);
        assert_eq!(statement.lines[0].description, "Mercado");
        assert_eq!(statement.lines[0].of, 1);
        assert_eq!(statement.payments.len(), 1);

        assert!(service.statement(f.card.id, 4, 2025).unwrap_err().is_not_found());
    }
}
