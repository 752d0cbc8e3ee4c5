//! Bill repository, ordered by reference period

use std::cmp::Ordering;

use crate::error::LedgerError;
use crate::models::{BillId, CreditCardBill, CreditCardId};

use super::repository::{Record, Repository};

pub type BillRepository = Repository<CreditCardBill>;

impl Record for CreditCardBill {
    type Id = BillId;
    const ENTITY: &'static str = "Bill";

    fn id(&self) -> BillId {
        self.id
    }

    fn compare(&self, other: &Self) -> Ordering {
        (self.reference_year, self.reference_month)
            .cmp(&(other.reference_year, other.reference_month))
            .then(self.card_id.cmp(&other.card_id))
    }
}

impl Repository<CreditCardBill> {
    /// The bill of `card_id` for a reference month, if it was created
    pub fn find_for_reference(
        &self,
        card_id: CreditCardId,
        month: u32,
        year: i32,
    ) -> Result<Option<CreditCardBill>, LedgerError> {
        self.find(|b| b.card_id == card_id && b.is_reference(month, year))
    }

    pub fn get_by_card(&self, card_id: CreditCardId) -> Result<Vec<CreditCardBill>, LedgerError> {
        self.filter(|b| b.card_id == card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCycle;
    use tempfile::TempDir;

    #[test]
    fn test_find_for_reference() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BillRepository::new(temp_dir.path().join("bills.json"));
        let card_id = CreditCardId::new();

        let march = CreditCardBill::for_cycle(card_id, &BillingCycle::for_reference(5, 12, 2025, 3));
        let april = CreditCardBill::for_cycle(card_id, &BillingCycle::for_reference(5, 12, 2025, 4));
        let april_id = april.id;
        repo.upsert(april).unwrap();
        repo.upsert(march).unwrap();

        let found = repo.find_for_reference(card_id, 4, 2025).unwrap().unwrap();
        assert_eq!(found.id, april_id);
        assert!(repo
            .find_for_reference(CreditCardId::new(), 4, 2025)
            .unwrap()
            .is_none());

        let months: Vec<u32> = repo
            .get_by_card(card_id)
            .unwrap()
            .iter()
            .map(|b| b.reference_month)
            .collect();
        assert_eq!(months, vec![3, 4]);
    }
}
