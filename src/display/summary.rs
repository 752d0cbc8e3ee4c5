//! Balance summary display

use crate::config::Settings;
use crate::models::Money;
use crate::services::BalanceEntry;

use super::width;

/// Format aggregated balances with a total line
pub fn format_balance_summary(entries: &[BalanceEntry], settings: &Settings) -> String {
    if entries.is_empty() {
        return "No transactions to summarize.".to_string();
    }

    let name_width = entries
        .iter()
        .map(|e| width(&e.name))
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}\n",
            entry.name,
            settings.format_money(entry.amount),
            name_width = name_width,
        ));
    }

    let total: Money = entries.iter().map(|e| e.amount).sum();
    output.push_str(&format!("{:-<name_width$}  {:->14}\n", "", "", name_width = name_width));
    output.push_str(&format!(
        "{:<name_width$}  {:>14}\n",
        "Total",
        settings.format_money(total),
        name_width = name_width,
    ));

    output
}
