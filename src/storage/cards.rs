//! Credit card repository, ordered by name

use std::cmp::Ordering;

use crate::error::LedgerError;
use crate::models::{CreditCard, CreditCardId};

use super::repository::{Record, Repository};

pub type CardRepository = Repository<CreditCard>;

impl Record for CreditCard {
    type Id = CreditCardId;
    const ENTITY: &'static str = "Credit card";

    fn id(&self) -> CreditCardId {
        self.id
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then(self.created_at.cmp(&other.created_at))
    }
}

impl Repository<CreditCard> {
    /// Get a card by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<CreditCard>, LedgerError> {
        let name = name.trim().to_lowercase();
        self.find(|c| c.name.to_lowercase() == name)
    }

    pub fn get_active(&self) -> Result<Vec<CreditCard>, LedgerError> {
        self.filter(|c| c.is_active)
    }
}
