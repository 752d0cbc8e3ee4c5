//! Purchase repository
//!
//! Installments are stored inside their owning purchase; lookups by bill
//! walk the schedules.

use std::cmp::Ordering;

use crate::error::LedgerError;
use crate::models::{
    BillId, CreditCardId, CreditCardInstallment, CreditCardPayment, CreditCardPurchase, PaymentId,
    PurchaseId,
};

use super::repository::{Record, Repository};

pub type PurchaseRepository = Repository<CreditCardPurchase>;
pub type PaymentRepository = Repository<CreditCardPayment>;

impl Record for CreditCardPurchase {
    type Id = PurchaseId;
    const ENTITY: &'static str = "Purchase";

    fn id(&self) -> PurchaseId {
        self.id
    }

    fn compare(&self, other: &Self) -> Ordering {
        other
            .purchase_date
            .cmp(&self.purchase_date)
            .then(other.created_at.cmp(&self.created_at))
    }
}

impl Record for CreditCardPayment {
    type Id = PaymentId;
    const ENTITY: &'static str = "Payment";

    fn id(&self) -> PaymentId {
        self.id
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.payment_date
            .cmp(&other.payment_date)
            .then(self.created_at.cmp(&other.created_at))
    }
}

impl Repository<CreditCardPurchase> {
    pub fn get_by_card(&self, card_id: CreditCardId) -> Result<Vec<CreditCardPurchase>, LedgerError> {
        self.filter(|p| p.card_id == card_id)
    }

    /// Installments posted against `bill_id`, paired with their purchase description
    pub fn installments_for_bill(
        &self,
        bill_id: BillId,
    ) -> Result<Vec<(String, CreditCardInstallment)>, LedgerError> {
        let purchases = self.filter(|p| p.schedule.iter().any(|i| i.bill_id == Some(bill_id)))?;

        let mut lines: Vec<(String, CreditCardInstallment)> = purchases
            .into_iter()
            .flat_map(|p| {
                let description = p.description;
                p.schedule
                    .into_iter()
                    .filter(|i| i.bill_id == Some(bill_id))
                    .map(move |i| (description.clone(), i))
            })
            .collect();

        lines.sort_by(|a, b| a.1.due_date.cmp(&b.1.due_date).then(a.0.cmp(&b.0)));
        Ok(lines)
    }

    /// Every installment of every purchase on `card_id`
    pub fn installments_for_card(
        &self,
        card_id: CreditCardId,
    ) -> Result<Vec<CreditCardInstallment>, LedgerError> {
        Ok(self
            .get_by_card(card_id)?
            .into_iter()
            .flat_map(|p| p.schedule)
            .collect())
    }
}

impl Repository<CreditCardPayment> {
    pub fn get_by_bill(&self, bill_id: BillId) -> Result<Vec<CreditCardPayment>, LedgerError> {
        self.filter(|p| p.bill_id == bill_id)
    }
}
