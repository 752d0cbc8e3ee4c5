//! Account display formatting

use crate::models::Account;

use super::width;

/// Format accounts as a table, marking the default one
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| width(&a.name))
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:<8}  {}\n",
        "Name",
        "Type",
        "Default",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:-<8}  {:-<13}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:<8}  {}\n",
            account.name,
            account.account_type.to_string(),
            if account.is_default { "*" } else { "" },
            account.id,
            name_width = name_width,
        ));
    }

    output
}
