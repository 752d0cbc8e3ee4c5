//! Credit card service

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CreditCard, CreditCardId, Money};
use crate::storage::Storage;

/// Service for credit card management
pub struct CardService<'a> {
    storage: &'a Storage,
}

/// Input for registering a card
#[derive(Debug, Clone)]
pub struct CreateCardInput {
    pub name: String,
    pub brand: String,
    pub total_limit: Money,
    pub closing_day: u32,
    pub due_day: u32,
    pub last_four_digits: Option<String>,
    /// Monthly interest charged on overdue balances, in percent
    pub interest_rate: Option<f64>,
    pub annual_fee: Option<Money>,
}

impl<'a> CardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new card with its full limit available
    pub fn create(&self, input: CreateCardInput) -> LedgerResult<CreditCard> {
        let name = input.name.trim();
        if self.storage.cards.get_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Credit card",
                identifier: name.to_string(),
            });
        }

        let mut card = CreditCard::new(
            name,
            input.brand.trim(),
            input.total_limit,
            input.closing_day,
            input.due_day,
        );
        card.last_four_digits = input.last_four_digits;
        card.interest_rate = input.interest_rate;
        card.annual_fee = input.annual_fee;

        card.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;

        tracing::info!(card = %card.name, closing_day = card.closing_day, due_day = card.due_day, "card created");
        Ok(card)
    }

    pub fn get(&self, id: CreditCardId) -> LedgerResult<Option<CreditCard>> {
        self.storage.cards.get(id)
    }

    /// Find a card by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<CreditCard>> {
        if let Some(card) = self.storage.cards.get_by_name(identifier)? {
            return Ok(Some(card));
        }

        if let Ok(id) = identifier.parse::<CreditCardId>() {
            return self.storage.cards.get(id);
        }

        Ok(None)
    }

    pub fn require(&self, identifier: &str) -> LedgerResult<CreditCard> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::card_not_found(identifier))
    }

    /// Cards ordered by name, optionally including inactive ones
    pub fn list(&self, include_inactive: bool) -> LedgerResult<Vec<CreditCard>> {
        if include_inactive {
            self.storage.cards.get_all()
        } else {
            self.storage.cards.get_active()
        }
    }

    /// Change a card's total limit, keeping the used part
    pub fn set_limit(&self, id: CreditCardId, total_limit: Money) -> LedgerResult<CreditCard> {
        let before = self.storage.cards.require(id)?;
        if total_limit < before.used_limit {
            return Err(LedgerError::Validation(format!(
                "New limit {} is below the {} already used",
                total_limit, before.used_limit
            )));
        }

        let mut card = before.clone();
        card.set_total_limit(total_limit);
        self.persist_update(&before, &card)?;
        Ok(card)
    }

    /// Stop accepting new purchases on a card
    pub fn deactivate(&self, id: CreditCardId) -> LedgerResult<CreditCard> {
        let before = self.storage.cards.require(id)?;
        if !before.is_active {
            return Ok(before);
        }

        let mut card = before.clone();
        card.deactivate();
        self.persist_update(&before, &card)?;

        tracing::info!(card = %card.name, "card deactivated");
        Ok(card)
    }

    fn persist_update(&self, before: &CreditCard, after: &CreditCard) -> LedgerResult<()> {
        self.storage.cards.upsert(after.clone())?;
        self.storage.cards.save()?;
        self.storage.log_update(
            EntityType::CreditCard,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            after,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn card_input(name: &str) -> CreateCardInput {
        CreateCardInput {
            name: name.to_string(),
            brand: "Mastercard".to_string(),
            total_limit: Money::from_cents(500_000),
            closing_day: 5,
            due_day: 12,
            last_four_digits: Some("1234".to_string()),
            interest_rate: Some(12.0),
            annual_fee: None,
        }
    }

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CardService::new(&storage);

        let card = service.create(card_input("Nubank")).unwrap();
        assert_eq!(card.available_limit, card.total_limit);
        assert_eq!(service.require("nubank").unwrap().id, card.id);
    }

    #[test]
    fn test_invalid_days_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CardService::new(&storage);

        let mut input = card_input("Inter");
        input.closing_day = 32;
        assert!(service.create(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CardService::new(&storage);

        service.create(card_input("Nubank")).unwrap();
        assert!(matches!(
            service.create(card_input("NUBANK")),
            Err(LedgerError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_deactivate_hides_from_active_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CardService::new(&storage);
        let card = service.create(card_input("Nubank")).unwrap();

        service.deactivate(card.id).unwrap();
        assert!(service.list(false).unwrap().is_empty());
        assert_eq!(service.list(true).unwrap().len(), 1);
    }

    #[test]
    fn test_set_limit_keeps_used() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CardService::new(&storage);
        let mut card = service.create(card_input("Nubank")).unwrap();
        card.charge(Money::from_cents(100_000)).unwrap();
        storage.cards.upsert(card.clone()).unwrap();

        let updated = service.set_limit(card.id, Money::from_cents(300_000)).unwrap();
        assert_eq!(updated.available_limit.cents(), 200_000);
        assert!(updated.limits_balanced());

        assert!(service.set_limit(card.id, Money::from_cents(50_000)).is_err());
    }
}
