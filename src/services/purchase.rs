//! Purchase service
//!
//! Records card purchases: charges the card limit, lays the installments out
//! over billing cycles, opens bills on demand and posts the ledger entry.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    BillStatus, CardLimitError, CreditCard, CreditCardBill, CreditCardId,
    CreditCardPurchase, Money, PurchaseId, Transaction, TransactionKind,
};
use crate::storage::Storage;

use super::transaction::TransactionService;

/// Input for recording a purchase
#[derive(Debug, Clone)]
pub struct RecordPurchaseInput {
    pub card_id: CreditCardId,
    pub description: String,
    pub amount: Money,
    pub purchase_date: NaiveDate,
    pub installments: u32,
    pub merchant: Option<String>,
}

/// Service for card purchases
pub struct PurchaseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> PurchaseService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Record a purchase and everything that hangs off it
    ///
    /// Nothing is persisted when the purchase is invalid, the card cannot
    /// take the charge, or an installment would land on a bill that is
    /// already paid or overdue. The ledger entry is the last file written.
    pub fn record(&self, input: RecordPurchaseInput) -> LedgerResult<CreditCardPurchase> {
        let card_before = self.storage.cards.require(input.card_id)?;

        let mut purchase = CreditCardPurchase::new(
            card_before.id,
            input.description.trim(),
            input.amount,
            input.purchase_date,
            input.installments,
        );
        purchase.merchant = input
            .merchant
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        purchase
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut card = card_before.clone();
        card.charge(purchase.amount)
            .map_err(|e| limit_error(&card_before, e))?;

        let cycles = purchase.schedule_on(&card);

        // Resolve every target bill before touching storage
        let mut bills: Vec<(CreditCardBill, bool)> = Vec::with_capacity(cycles.len());
        for cycle in &cycles {
            match self.storage.bills.find_for_reference(
                card.id,
                cycle.reference_month,
                cycle.reference_year,
            )? {
                Some(bill) if matches!(bill.status, BillStatus::Paid | BillStatus::Overdue) => {
                    return Err(LedgerError::Validation(format!(
                        "Bill {} of {} is already {}",
                        cycle,
                        card.name,
                        bill.status.to_string().to_lowercase()
                    )));
                }
                Some(bill) => bills.push((bill, false)),
                None => bills.push((CreditCardBill::for_cycle(card.id, cycle), true)),
            }
        }

        for (installment, (bill, _)) in purchase.schedule.iter_mut().zip(&bills) {
            installment.bill_id = Some(bill.id);
        }
        purchase.bill_id = purchase.schedule.first().and_then(|i| i.bill_id);

        let transactions = TransactionService::new(self.storage);
        let txn = transactions.prepare(self.spend_entry(&card, &purchase)?)?;
        purchase.transaction_id = Some(txn.id);

        // Bill totals are settled in memory before anything is stored
        let mut installments = self.storage.purchases.installments_for_card(card.id)?;
        installments.extend(purchase.schedule.iter().cloned());
        let bills: Vec<(CreditCardBill, CreditCardBill, bool)> = bills
            .into_iter()
            .map(|(before, created)| {
                let mut bill = before.clone();
                bill.recompute(&installments, self.settings.minimum_payment_percent);
                (before, bill, created)
            })
            .collect();

        self.storage.purchases.upsert(purchase.clone())?;
        self.storage.cards.upsert(card.clone())?;
        for (_, bill, _) in &bills {
            self.storage.bills.upsert(bill.clone())?;
        }
        self.storage.transactions.upsert(txn.clone())?;

        // The ledger entry is saved last so a failed write cannot orphan it
        self.storage.purchases.save()?;
        self.storage.cards.save()?;
        self.storage.bills.save()?;
        self.storage.transactions.save()?;

        transactions.audit_posted(&txn)?;
        for (before, bill, created) in &bills {
            let label = Some(format!(
                "{} {:02}/{}",
                card.name, bill.reference_month, bill.reference_year
            ));
            if *created {
                self.storage
                    .log_create(EntityType::Bill, bill.id.to_string(), label, bill)?;
                tracing::debug!(card = %card.name, month = bill.reference_month, year = bill.reference_year, "bill opened");
            } else {
                self.storage
                    .log_update(EntityType::Bill, bill.id.to_string(), label, before, bill)?;
            }
        }
        self.storage.log_create(
            EntityType::Purchase,
            purchase.id.to_string(),
            Some(purchase.description.clone()),
            &purchase,
        )?;
        self.storage.log_update(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &card_before,
            &card,
        )?;

        tracing::info!(
            card = %card.name,
            amount = %purchase.amount,
            installments = purchase.installments,
            "purchase recorded"
        );
        Ok(purchase)
    }

    pub fn get(&self, id: PurchaseId) -> LedgerResult<Option<CreditCardPurchase>> {
        self.storage.purchases.get(id)
    }

    /// Find a purchase by ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<CreditCardPurchase>> {
        if let Ok(id) = identifier.parse::<PurchaseId>() {
            return self.storage.purchases.get(id);
        }
        Ok(None)
    }

    /// Purchases on a card, newest first
    pub fn list_for_card(&self, card_id: CreditCardId) -> LedgerResult<Vec<CreditCardPurchase>> {
        self.storage.purchases.get_by_card(card_id)
    }

    /// The card-spend ledger entry, on the shadow account when present
    fn spend_entry(&self, card: &CreditCard, purchase: &CreditCardPurchase) -> LedgerResult<Transaction> {
        let mut txn = Transaction::expense(purchase.amount, purchase.description.clone(), purchase.purchase_date)
            .with_card(card.id)
            .with_kind(TransactionKind::CardSpend);

        match self.storage.accounts.get_shadow()? {
            Some(shadow) => txn = txn.with_account(shadow.id),
            None => tracing::warn!(card = %card.name, "no credit card account; spend left unattributed"),
        }

        Ok(txn)
    }
}

fn limit_error(card: &CreditCard, err: CardLimitError) -> LedgerError {
    match err {
        CardLimitError::Inactive => LedgerError::InactiveCard(card.name.clone()),
        CardLimitError::Exceeded {
            requested,
            available,
        } => LedgerError::CreditLimit {
            card: card.name.clone(),
            requested,
            available,
        },
    }
}
