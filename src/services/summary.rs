//! Account balance aggregation
//!
//! Folds ledger transactions into at most [`MAX_BALANCE_ENTRIES`] balance
//! lines. Card activity is attributed to two synthetic buckets, "Card
//! Spend" and "Payment Card", so the card's own shadow account does not show
//! up as one large negative balance.
//!
//! Each transaction resolves to a bucket in this order:
//!
//! 1. an explicit [`TransactionKind`] tag set when the transaction was made;
//! 2. the account it names, by id or by name, even one missing from storage;
//! 3. a keyword heuristic over the description.
//!
//! A transaction that resolved to the shadow account is then moved to one of
//! the card buckets when it is an expense.

use std::collections::HashMap;

use crate::config::ClassifierKeywords;
use crate::models::{Account, AccountId, Money, Transaction, TransactionKind};

/// Most balance lines returned by [`aggregate_balances`]
pub const MAX_BALANCE_ENTRIES: usize = 6;

pub const MAIN_ACCOUNT_LABEL: &str = "Main Account";
pub const CARD_SPEND_LABEL: &str = "Card Spend";
pub const PAYMENT_CARD_LABEL: &str = "Payment Card";

/// Where a transaction's amount is accumulated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BalanceBucket {
    /// A stored account
    Account(AccountId),
    /// An account name carried by the transaction but not found in storage
    Named(String),
    /// Transactions with no account and no card signal
    MainAccount,
    CardSpend,
    PaymentCard,
}

impl BalanceBucket {
    /// Accounts merge by id, everything else by display name
    fn key(&self, name: &str) -> String {
        match self {
            Self::Account(id) => id.as_uuid().to_string(),
            _ => name.to_string(),
        }
    }
}

/// One line of the balance summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub bucket: BalanceBucket,
    pub name: String,
    /// Sum of signed amounts
    pub amount: Money,
}

/// Aggregate balances using the built-in keywords
pub fn aggregate_balances_default(
    transactions: &[Transaction],
    accounts: &[Account],
) -> Vec<BalanceEntry> {
    aggregate_balances(transactions, accounts, &ClassifierKeywords::default())
}

/// Aggregate signed transaction amounts into balance lines
///
/// Lines are ordered by absolute amount, largest first, with first-seen
/// order breaking ties, and capped at [`MAX_BALANCE_ENTRIES`]. The result
/// depends only on the inputs.
pub fn aggregate_balances(
    transactions: &[Transaction],
    accounts: &[Account],
    keywords: &ClassifierKeywords,
) -> Vec<BalanceEntry> {
    let classifier = Classifier::new(accounts, keywords);

    let mut entries: Vec<BalanceEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for txn in transactions {
        let (bucket, name) = classifier.classify(txn);
        let key = bucket.key(&name);

        match index.get(&key) {
            Some(&i) => entries[i].amount += txn.signed_amount(),
            None => {
                index.insert(key, entries.len());
                entries.push(BalanceEntry {
                    bucket,
                    name,
                    amount: txn.signed_amount(),
                });
            }
        }
    }

    // sort_by is stable, so ties keep first-seen order
    entries.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
    entries.truncate(MAX_BALANCE_ENTRIES);
    entries
}

struct Classifier<'a> {
    names: HashMap<AccountId, &'a str>,
    accounts: &'a [Account],
    shadow: Option<&'a Account>,
    payment_keyword: String,
    card_keyword: String,
}

impl<'a> Classifier<'a> {
    fn new(accounts: &'a [Account], keywords: &ClassifierKeywords) -> Self {
        Self {
            names: accounts.iter().map(|a| (a.id, a.name.as_str())).collect(),
            accounts,
            shadow: accounts.iter().find(|a| a.is_shadow()),
            payment_keyword: keywords.payment.to_lowercase(),
            card_keyword: keywords.card.to_lowercase(),
        }
    }

    fn classify(&self, txn: &Transaction) -> (BalanceBucket, String) {
        let description = txn.description.to_lowercase();

        let resolved = match txn.kind {
            Some(TransactionKind::CardPayment) => return payment_card(),
            Some(TransactionKind::CardSpend) => return card_spend(),
            _ => self
                .explicit_account(txn)
                .unwrap_or_else(|| self.by_description(txn, &description)),
        };

        let Some(shadow) = self.shadow else {
            return resolved;
        };
        if resolved.1 != shadow.name || !txn.is_expense() {
            return resolved;
        }

        if description.contains(&self.payment_keyword) {
            tracing::debug!(txn = %txn.id, "shadow account expense redirected to payment bucket");
            payment_card()
        } else {
            tracing::debug!(txn = %txn.id, "shadow account expense redirected to spend bucket");
            card_spend()
        }
    }

    /// The account a transaction names, if any
    ///
    /// An id missing from storage still counts: it resolves through the
    /// carried name when there is one, otherwise it gets a line of its own.
    fn explicit_account(&self, txn: &Transaction) -> Option<(BalanceBucket, String)> {
        let wanted = txn
            .account_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        if let Some(id) = txn.account_id {
            if let Some(name) = self.names.get(&id) {
                return Some((BalanceBucket::Account(id), name.to_string()));
            }
            if wanted.is_none() {
                tracing::debug!(txn = %txn.id, account = %id, "transaction names an unknown account");
                return Some((BalanceBucket::Account(id), id.to_string()));
            }
        }

        let wanted = wanted?;
        let lowered = wanted.to_lowercase();
        match self.accounts.iter().find(|a| a.name.to_lowercase() == lowered) {
            Some(account) => Some((BalanceBucket::Account(account.id), account.name.clone())),
            None => Some((BalanceBucket::Named(wanted.to_string()), wanted.to_string())),
        }
    }

    fn by_description(&self, txn: &Transaction, description: &str) -> (BalanceBucket, String) {
        let mentions_card = description.contains(&self.card_keyword);

        if mentions_card && description.contains(&self.payment_keyword) {
            payment_card()
        } else if mentions_card || txn.credit_card_id.is_some() {
            card_spend()
        } else {
            (BalanceBucket::MainAccount, MAIN_ACCOUNT_LABEL.to_string())
        }
    }
}

fn card_spend() -> (BalanceBucket, String) {
    (BalanceBucket::CardSpend, CARD_SPEND_LABEL.to_string())
}

fn payment_card() -> (BalanceBucket, String) {
    (BalanceBucket::PaymentCard, PAYMENT_CARD_LABEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, CreditCardId};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn expense(cents: i64, description: &str) -> Transaction {
        Transaction::expense(Money::from_cents(cents), description, date())
    }

    fn income(cents: i64, description: &str) -> Transaction {
        Transaction::income(Money::from_cents(cents), description, date())
    }

    fn accounts() -> Vec<Account> {
        vec![
            Account::new("Inter", AccountType::Checking),
            Account::new("Cartões", AccountType::CreditCard),
        ]
    }

    #[test]
    fn test_payment_keyword_pair_goes_to_payment_card() {
        let entries = aggregate_balances_default(&[expense(10_000, "Fatura cartão")], &accounts());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Payment Card");
        assert_eq!(entries[0].amount.cents(), -10_000);
    }

    #[test]
    fn test_card_id_without_account_goes_to_card_spend() {
        let txn = expense(5_000, "Uber").with_card(CreditCardId::new());
        let entries = aggregate_balances_default(&[txn], &[]);

        assert_eq!(entries[0].bucket, BalanceBucket::CardSpend);
        assert_eq!(entries[0].amount.cents(), -5_000);
    }

    #[test]
    fn test_explicit_tag_wins_over_text() {
        let accounts = accounts();
        let txn = expense(2_000, "Fatura cartão")
            .with_account(accounts[0].id)
            .with_kind(TransactionKind::CardSpend);

        let entries = aggregate_balances_default(&[txn], &accounts);
        assert_eq!(entries[0].bucket, BalanceBucket::CardSpend);
    }

    #[test]
    fn test_explicit_account_beats_heuristic() {
        let accounts = accounts();
        let txn = expense(700, "Cartão presente").with_account(accounts[0].id);

        let entries = aggregate_balances_default(&[txn], &accounts);
        assert_eq!(entries[0].bucket, BalanceBucket::Account(accounts[0].id));
        assert_eq!(entries[0].name, "Inter");
    }

    #[test]
    fn test_account_name_only() {
        let accounts = accounts();
        let mut known = expense(100, "x");
        known.account_name = Some("inter".to_string());
        let mut unknown = expense(200, "y");
        unknown.account_name = Some("Carteira".to_string());

        let entries = aggregate_balances_default(&[known, unknown], &accounts);
        assert_eq!(entries[0].bucket, BalanceBucket::Named("Carteira".to_string()));
        assert_eq!(entries[1].bucket, BalanceBucket::Account(accounts[0].id));
    }

    #[test]
    fn test_unknown_account_id_keeps_its_own_line() {
        let accounts = accounts();
        let gone = AccountId::new();
        let transactions = vec![
            expense(900, "Fatura cartão").with_account(gone),
            expense(100, "Mercado").with_account(gone),
        ];

        let entries = aggregate_balances_default(&transactions, &accounts);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bucket, BalanceBucket::Account(gone));
        assert_eq!(entries[0].name, gone.to_string());
        assert_eq!(entries[0].amount.cents(), -1_000);
    }

    #[test]
    fn test_unknown_account_id_resolves_by_carried_name() {
        let accounts = accounts();
        let mut txn = expense(400, "Uber").with_account(AccountId::new());
        txn.account_name = Some("Inter".to_string());

        let entries = aggregate_balances_default(&[txn], &accounts);
        assert_eq!(entries[0].bucket, BalanceBucket::Account(accounts[0].id));
        assert_eq!(entries[0].name, "Inter");
    }

    #[test]
    fn test_shadow_account_redirect() {
        let accounts = accounts();
        let shadow = accounts[1].id;
        let transactions = vec![
            expense(3_000, "Pagamento fatura").with_account(shadow),
            expense(1_000, "Restaurante").with_account(shadow),
            income(500, "Estorno").with_account(shadow),
        ];

        let entries = aggregate_balances_default(&transactions, &accounts);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Payment Card", "Card Spend", "Cartões"]);
        assert_eq!(entries[2].amount.cents(), 500);
    }

    #[test]
    fn test_unclassified_goes_to_main_account() {
        let entries = aggregate_balances_default(
            &[income(100_000, "Salário"), expense(20_000, "Aluguel")],
            &[],
        );

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bucket, BalanceBucket::MainAccount);
        assert_eq!(entries[0].amount.cents(), 80_000);
    }

    #[test]
    fn test_sorted_by_magnitude_with_stable_ties() {
        let mut accounts = Vec::new();
        let mut transactions = Vec::new();
        for (name, cents) in [("A", -100), ("B", 300), ("C", 100), ("D", -300)] {
            let account = Account::new(name, AccountType::Checking);
            let txn = if cents < 0 {
                expense(-cents, name)
            } else {
                income(cents, name)
            };
            transactions.push(txn.with_account(account.id));
            accounts.push(account);
        }

        let names: Vec<String> = aggregate_balances_default(&transactions, &accounts)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_capped_at_six_entries() {
        let accounts: Vec<Account> = (0..20)
            .map(|i| Account::new(format!("Conta {}", i), AccountType::Checking))
            .collect();
        let transactions: Vec<Transaction> = accounts
            .iter()
            .enumerate()
            .map(|(i, a)| income(100 * (i as i64 + 1), "x").with_account(a.id))
            .collect();

        let entries = aggregate_balances_default(&transactions, &accounts);
        assert_eq!(entries.len(), MAX_BALANCE_ENTRIES);
        assert_eq!(entries[0].name, "Conta 19");
    }

    #[test]
    fn test_deterministic() {
        let accounts = accounts();
        let transactions = vec![
            expense(100, "Fatura cartão"),
            income(300, "Pix").with_account(accounts[0].id),
            expense(50, "Uber").with_card(CreditCardId::new()),
        ];

        let first = aggregate_balances_default(&transactions, &accounts);
        let second = aggregate_balances_default(&transactions, &accounts);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_keywords() {
        let keywords = ClassifierKeywords {
            payment: "bill".to_string(),
            card: "card".to_string(),
        };
        let entries = aggregate_balances(&[expense(100, "Card bill March")], &[], &keywords);
        assert_eq!(entries[0].bucket, BalanceBucket::PaymentCard);
    }
}
