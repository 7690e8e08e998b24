//! Currency registry: code → metadata lookup

use rustc_hash::FxHashMap;

use super::models::{CurrencyError, CurrencyInfo, DEFAULT_MINOR_UNITS};
use crate::core_types::CurrencyCode;

/// Open mapping from wire currency code to [`CurrencyInfo`].
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    currencies: FxHashMap<CurrencyCode, CurrencyInfo>,
}

impl CurrencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three currencies the ledger currently serves.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for info in builtin_currencies() {
            registry.currencies.insert(info.code, info);
        }
        registry
    }

    /// Build a registry from configured entries.
    ///
    /// Every entry is validated; a code listed twice is an error rather than
    /// a silent overwrite.
    pub fn from_entries<I>(entries: I) -> Result<Self, CurrencyError>
    where
        I: IntoIterator<Item = CurrencyInfo>,
    {
        let mut registry = Self::new();
        for info in entries {
            registry.insert(info)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, info: CurrencyInfo) -> Result<(), CurrencyError> {
        info.validate()?;
        if self.currencies.contains_key(&info.code) {
            return Err(CurrencyError::DuplicateCode(info.code));
        }
        self.currencies.insert(info.code, info);
        Ok(())
    }

    pub fn get(&self, code: CurrencyCode) -> Option<&CurrencyInfo> {
        self.currencies.get(&code)
    }

    pub fn by_iso(&self, iso: &str) -> Option<&CurrencyInfo> {
        self.currencies.values().find(|c| c.iso.eq_ignore_ascii_case(iso))
    }

    /// Minor-unit precision, falling back to [`DEFAULT_MINOR_UNITS`].
    pub fn minor_units(&self, code: CurrencyCode) -> u32 {
        self.get(code)
            .map(|c| c.minor_units)
            .unwrap_or(DEFAULT_MINOR_UNITS)
    }

    /// Display symbol; unknown codes render as `#<code>`.
    pub fn symbol(&self, code: CurrencyCode) -> String {
        match self.get(code) {
            Some(info) => info.symbol.clone(),
            None => format!("#{}", code),
        }
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Entries ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyInfo> {
        let mut entries: Vec<&CurrencyInfo> = self.currencies.values().collect();
        entries.sort_by_key(|c| c.code);
        entries.into_iter()
    }
}

pub(crate) fn builtin_currencies() -> Vec<CurrencyInfo> {
    vec![
        CurrencyInfo::new(CurrencyCode::TRY, "TRY", "₺", "Türk Lirası", 2),
        CurrencyInfo::new(CurrencyCode::USD, "USD", "$", "Amerikan Doları", 2),
        CurrencyInfo::new(CurrencyCode::EUR, "EUR", "€", "Euro", 2),
    ]
}
