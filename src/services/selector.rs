//! Credit card selection on the transaction form
//!
//! Picking a card on a transaction points the account field at the
//! credit-card shadow account, unless the user already chose an account.

use crate::models::{Account, AccountId, CreditCardId};

/// Fields of the transaction form touched by card selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub account_id: Option<AccountId>,
    /// The user picked the account explicitly
    pub account_pinned: bool,
    pub credit_card_id: Option<CreditCardId>,
    pub account_valid: bool,
}

impl TransactionForm {
    /// Form with an account chosen by the user
    pub fn with_pinned_account(account_id: AccountId) -> Self {
        Self {
            account_id: Some(account_id),
            account_pinned: true,
            credit_card_id: None,
            account_valid: true,
        }
    }

    /// Form prefilled with a default account the user may still change
    pub fn with_default_account(account_id: Option<AccountId>) -> Self {
        Self {
            account_id,
            account_pinned: false,
            credit_card_id: None,
            account_valid: account_id.is_some(),
        }
    }
}

/// What the user chose in the card field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSelection {
    None,
    Card(CreditCardId),
}

/// A field change observers are notified of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormChange {
    CreditCard(Option<CreditCardId>),
    Account(AccountId),
    AccountValid(bool),
}

/// Apply a card selection to the form, returning the fields that changed
///
/// Selecting the same card twice yields no changes the second time. When
/// no shadow account exists the account field is left alone.
pub fn select_credit_card(
    form: &mut TransactionForm,
    selection: CardSelection,
    accounts: &[Account],
) -> Vec<FormChange> {
    let mut changes = Vec::new();

    let card_id = match selection {
        CardSelection::None => {
            if form.credit_card_id.take().is_some() {
                changes.push(FormChange::CreditCard(None));
            }
            return changes;
        }
        CardSelection::Card(card_id) => card_id,
    };

    if form.credit_card_id != Some(card_id) {
        form.credit_card_id = Some(card_id);
        changes.push(FormChange::CreditCard(Some(card_id)));
    }

    if form.account_pinned {
        return changes;
    }

    let Some(shadow) = accounts.iter().find(|a| a.is_shadow()) else {
        tracing::debug!(card = %card_id, "no credit card account to redirect to");
        return changes;
    };

    if form.account_id != Some(shadow.id) {
        form.account_id = Some(shadow.id);
        changes.push(FormChange::Account(shadow.id));
    }
    if !form.account_valid {
        form.account_valid = true;
        changes.push(FormChange::AccountValid(true));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;

    fn accounts() -> Vec<Account> {
        vec![
            Account::new("Inter", AccountType::Checking),
            Account::new("Cartões", AccountType::CreditCard),
        ]
    }

    #[test]
    fn test_card_redirects_unpinned_account() {
        let accounts = accounts();
        let card = CreditCardId::new();
        let mut form = TransactionForm::default();

        let changes = select_credit_card(&mut form, CardSelection::Card(card), &accounts);
        assert_eq!(
            changes,
            vec![
                FormChange::CreditCard(Some(card)),
                FormChange::Account(accounts[1].id),
                FormChange::AccountValid(true),
            ]
        );
        assert_eq!(form.account_id, Some(accounts[1].id));
        assert!(form.account_valid);
    }

    #[test]
    fn test_repeated_selection_is_silent() {
        let accounts = accounts();
        let card = CreditCardId::new();
        let mut form = TransactionForm::with_default_account(Some(accounts[0].id));

        select_credit_card(&mut form, CardSelection::Card(card), &accounts);
        let snapshot = form.clone();

        let changes = select_credit_card(&mut form, CardSelection::Card(card), &accounts);
        assert!(changes.is_empty());
        assert_eq!(form, snapshot);
    }

    #[test]
    fn test_pinned_account_untouched() {
        let accounts = accounts();
        let card = CreditCardId::new();
        let mut form = TransactionForm::with_pinned_account(accounts[0].id);

        let changes = select_credit_card(&mut form, CardSelection::Card(card), &accounts);
        assert_eq!(changes, vec![FormChange::CreditCard(Some(card))]);
        assert_eq!(form.account_id, Some(accounts[0].id));
    }

    #[test]
    fn test_missing_shadow_is_noop() {
        let accounts = vec![Account::new("Inter", AccountType::Checking)];
        let card = CreditCardId::new();
        let mut form = TransactionForm::default();

        let changes = select_credit_card(&mut form, CardSelection::Card(card), &accounts);
        assert_eq!(changes, vec![FormChange::CreditCard(Some(card))]);
        assert_eq!(form.account_id, None);
        assert!(!form.account_valid);
    }

    #[test]
    fn test_clearing_card_keeps_account() {
        let accounts = accounts();
        let card = CreditCardId::new();
        let mut form = TransactionForm::default();
        select_credit_card(&mut form, CardSelection::Card(card), &accounts);

        let changes = select_credit_card(&mut form, CardSelection::None, &accounts);
        assert_eq!(changes, vec![FormChange::CreditCard(None)]);
        assert_eq!(form.account_id, Some(accounts[1].id));

        assert!(select_credit_card(&mut form, CardSelection::None, &accounts).is_empty());
    }
}
