//! User settings for cardledger
//!
//! Currency display, the default account name, bill charge percentages and
//! the keywords the balance classifier looks for in descriptions.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// Keywords used to recognise card activity in free-text descriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierKeywords {
    /// Marks a bill payment ("fatura")
    #[serde(default = "default_payment_keyword")]
    pub payment: String,

    /// Marks card activity ("cartão")
    #[serde(default = "default_card_keyword")]
    pub card: String,
}

fn default_payment_keyword() -> String {
    "fatura".to_string()
}

fn default_card_keyword() -> String {
    "cartão".to_string()
}

impl Default for ClassifierKeywords {
    fn default() -> Self {
        Self {
            payment: default_payment_keyword(),
            card: default_card_keyword(),
        }
    }
}

/// User settings for cardledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Name of the account created when none exists
    #[serde(default = "default_account_name")]
    pub default_account_name: String,

    /// Share of a bill's total due as minimum payment
    #[serde(default = "default_minimum_payment_percent")]
    pub minimum_payment_percent: f64,

    /// Fee charged on the remaining balance when a bill becomes overdue
    #[serde(default = "default_late_fee_percent")]
    pub late_fee_percent: f64,

    #[serde(default)]
    pub keywords: ClassifierKeywords,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_account_name() -> String {
    "Main Account".to_string()
}

fn default_minimum_payment_percent() -> f64 {
    15.0
}

fn default_late_fee_percent() -> f64 {
    2.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_account_name: default_account_name(),
            minimum_payment_percent: default_minimum_payment_percent(),
            late_fee_percent: default_late_fee_percent(),
            keywords: ClassifierKeywords::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject percentages outside 0..=100 and blank keywords
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (name, value) in [
            ("minimum_payment_percent", self.minimum_payment_percent),
            ("late_fee_percent", self.late_fee_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(LedgerError::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        if self.keywords.payment.trim().is_empty() || self.keywords.card.trim().is_empty() {
            return Err(LedgerError::Config("Classifier keywords cannot be empty".into()));
        }
        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: crate::models::Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
