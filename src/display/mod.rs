//! Display formatting for terminal output
//!
//! Plain-text tables and detail views. Amounts are rendered with the
//! currency symbol from [`Settings`](crate::config::Settings).

pub mod account;
pub mod bill;
pub mod card;
pub mod summary;
pub mod transaction;

pub use account::format_account_list;
pub use bill::{format_bill_list, format_statement, format_transitions};
pub use card::{format_card_details, format_card_list};
pub use summary::format_balance_summary;
pub use transaction::format_transaction_register;

/// Display width of a string in characters
pub(crate) fn width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate to `max` characters, ending in `...` when cut
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if width(s) <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Cartões", 10), "Cartões");
        assert_eq!(truncate("Pagamento fatura", 10), "Pagamen...");
    }
}
