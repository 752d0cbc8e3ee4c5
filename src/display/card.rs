//! Credit card display formatting

use crate::config::Settings;
use crate::models::CreditCard;

use super::width;

/// Format cards as a table with limits and cycle days
pub fn format_card_list(cards: &[CreditCard], settings: &Settings) -> String {
    if cards.is_empty() {
        return "No credit cards found.".to_string();
    }

    let name_width = cards
        .iter()
        .map(|c| width(&c.name))
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:>14}  {:>14}  {:>7}  {:>5}  {}\n",
        "Name",
        "Brand",
        "Limit",
        "Available",
        "Closes",
        "Due",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:->14}  {:->14}  {:->7}  {:->5}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for card in cards {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:>14}  {:>14}  {:>7}  {:>5}  {}\n",
            card.name,
            card.brand,
            settings.format_money(card.total_limit),
            settings.format_money(card.available_limit),
            card.closing_day,
            card.due_day,
            if card.is_active { "Active" } else { "Inactive" },
            name_width = name_width,
        ));
    }

    output
}

/// Format a single card's details
pub fn format_card_details(card: &CreditCard, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", card));
    output.push_str(&format!("  ID:          {}\n", card.id));
    output.push_str(&format!("  Closing day: {}\n", card.closing_day));
    output.push_str(&format!("  Due day:     {}\n", card.due_day));
    output.push('\n');
    output.push_str(&format!("  Limit:       {}\n", settings.format_money(card.total_limit)));
    output.push_str(&format!("  Used:        {}\n", settings.format_money(card.used_limit)));
    output.push_str(&format!(
        "  Available:   {}\n",
        settings.format_money(card.available_limit)
    ));

    if let Some(rate) = card.interest_rate {
        output.push_str(&format!("  Interest:    {}% a month\n", rate));
    }
    if let Some(fee) = card.annual_fee {
        output.push_str(&format!("  Annual fee:  {}\n", settings.format_money(fee)));
    }
    if !card.is_active {
        output.push_str("  Status:      Inactive\n");
    }

    output
}
