//! Currency models and validation

use serde::{Deserialize, Serialize};

use crate::core_types::CurrencyCode;

/// Minor-unit precision used when a currency has no registry entry.
pub const DEFAULT_MINOR_UNITS: u32 = 2;

/// Upper bound accepted for `minor_units` (Decimal keeps 28 digits of scale).
pub const MAX_MINOR_UNITS: u32 = 8;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CurrencyError {
    #[error("ISO code must be 3 uppercase letters: got '{0}'")]
    InvalidIso(String),

    #[error("Currency symbol cannot be empty (code {0})")]
    EmptySymbol(CurrencyCode),

    #[error("Minor units {provided} exceed maximum {max}")]
    MinorUnitsTooLarge { provided: u32, max: u32 },

    #[error("Currency code {0} registered twice")]
    DuplicateCode(CurrencyCode),
}

/// Currency definition (TRY, USD, EUR, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    pub iso: String,
    pub symbol: String,
    pub name: String,
    #[serde(default = "default_minor_units")]
    pub minor_units: u32,
}

fn default_minor_units() -> u32 {
    DEFAULT_MINOR_UNITS
}

impl CurrencyInfo {
    pub fn new(code: CurrencyCode, iso: &str, symbol: &str, name: &str, minor_units: u32) -> Self {
        Self {
            code,
            iso: iso.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            minor_units,
        }
    }

    /// Check field formats before the entry is admitted to a registry.
    ///
    /// # Validation Rules
    /// - `iso`: exactly 3 ASCII uppercase letters
    /// - `symbol`: non-empty after trimming
    /// - `minor_units`: at most [`MAX_MINOR_UNITS`]
    pub fn validate(&self) -> Result<(), CurrencyError> {
        if self.iso.len() != 3 || !self.iso.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CurrencyError::InvalidIso(self.iso.clone()));
        }
        if self.symbol.trim().is_empty() {
            return Err(CurrencyError::EmptySymbol(self.code));
        }
        if self.minor_units > MAX_MINOR_UNITS {
            return Err(CurrencyError::MinorUnitsTooLarge {
                provided: self.minor_units,
                max: MAX_MINOR_UNITS,
            });
        }
        Ok(())
    }
}
