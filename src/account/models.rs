//! Account data model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, CurrencyCode};
use crate::currency::CurrencyRegistry;
use crate::money::format_amount;

/// Ledger account snapshot
///
/// Wire keys are PascalCase (`AccountId`, `AccountNumber`, ...). `Balance`
/// is accepted as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    #[serde(rename = "AccountId")]
    pub id: AccountId,
    pub account_number: String,
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(default)]
    pub currency_symbol: String,
}

impl Account {
    pub fn new(id: AccountId, account_number: &str, currency: CurrencyCode, balance: Decimal) -> Self {
        Self {
            id,
            account_number: account_number.to_string(),
            currency,
            balance,
            currency_symbol: String::new(),
        }
    }

    /// Symbol sent by the service, else the registry's symbol for the code.
    pub fn symbol(&self, registry: &CurrencyRegistry) -> String {
        if self.currency_symbol.trim().is_empty() {
            registry.symbol(self.currency)
        } else {
            self.currency_symbol.clone()
        }
    }

    /// Balance at the currency's minor-unit precision, e.g. `"500.00"`.
    pub fn formatted_balance(&self, registry: &CurrencyRegistry) -> String {
        format_amount(self.balance, registry.minor_units(self.currency))
    }

    /// Picker-style label: `"TR-0001 - 500.00 ₺"`.
    pub fn label(&self, registry: &CurrencyRegistry) -> String {
        format!(
            "{} - {} {}",
            self.account_number,
            self.formatted_balance(registry),
            self.symbol(registry)
        )
    }
}

/// Find an account by id in a fetched snapshot.
pub fn find_account(accounts: &[Account], id: AccountId) -> Option<&Account> {
    accounts.iter().find(|a| a.id == id)
}
