//! Exchange rate snapshot
//!
//! A [`RateSnapshot`] is the immutable rate table a transfer is priced
//! against. It is keyed directly by the ordered `(from, to)` pair: a rate for
//! TRY→USD says nothing about USD→TRY, and no inversion or triangulation is
//! attempted.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core_types::CurrencyCode;
use crate::currency::CurrencyRegistry;
use crate::money::format_amount;

/// Decimal places shown in a rate label.
pub const RATE_DISPLAY_DECIMALS: u32 = 4;

#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("Rate for {from}->{to} must be positive, got {rate}")]
    NonPositiveRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },

    #[error("Duplicate rate entry for {from}->{to}")]
    DuplicatePair { from: CurrencyCode, to: CurrencyCode },
}

/// One quoted rate: `1 from = rate to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeRate {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    /// Raw timestamp as sent by the rate service.
    #[serde(default)]
    pub last_updated: String,
}

impl ExchangeRate {
    pub fn new(from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        Self {
            from_currency: from,
            to_currency: to,
            rate,
            last_updated: String::new(),
        }
    }

    pub fn with_last_updated(mut self, ts: &str) -> Self {
        self.last_updated = ts.to_string();
        self
    }

    #[inline]
    pub fn pair(&self) -> (CurrencyCode, CurrencyCode) {
        (self.from_currency, self.to_currency)
    }

    /// Parse `last_updated` (RFC 3339, or naive ISO-8601 taken as UTC).
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Result of asking the snapshot how `from` converts to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateQuote<'a> {
    SameCurrency,
    Available(&'a ExchangeRate),
    Unavailable,
}

impl RateQuote<'_> {
    /// Rate to apply, `1` for same currency, `None` when unavailable.
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            RateQuote::SameCurrency => Some(Decimal::ONE),
            RateQuote::Available(r) => Some(r.rate),
            RateQuote::Unavailable => None,
        }
    }

    /// Human-readable label, e.g. `"1 ₺ = 0.0310 $"`.
    pub fn describe(&self, registry: &CurrencyRegistry, from: CurrencyCode, to: CurrencyCode) -> String {
        match self {
            RateQuote::SameCurrency => "Same currency - no conversion needed".to_string(),
            RateQuote::Available(r) => format!(
                "1 {} = {} {}",
                registry.symbol(from),
                format_amount(r.rate, RATE_DISPLAY_DECIMALS),
                registry.symbol(to)
            ),
            RateQuote::Unavailable => "Exchange rate not found".to_string(),
        }
    }
}

/// Immutable rate table for one resolution.
#[derive(Debug, Clone, Default)]
pub struct RateSnapshot {
    rates: FxHashMap<(CurrencyCode, CurrencyCode), ExchangeRate>,
}

impl RateSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot, enforcing one strictly positive rate per pair.
    pub fn from_rates<I>(rates: I) -> Result<Self, RateError>
    where
        I: IntoIterator<Item = ExchangeRate>,
    {
        let mut map = FxHashMap::default();
        for rate in rates {
            if rate.rate <= Decimal::ZERO {
                return Err(RateError::NonPositiveRate {
                    from: rate.from_currency,
                    to: rate.to_currency,
                    rate: rate.rate,
                });
            }
            let (from, to) = rate.pair();
            if map.contains_key(&(from, to)) {
                return Err(RateError::DuplicatePair { from, to });
            }
            map.insert((from, to), rate);
        }
        Ok(Self { rates: map })
    }

    #[inline]
    pub fn lookup(&self, from: CurrencyCode, to: CurrencyCode) -> Option<&ExchangeRate> {
        self.rates.get(&(from, to))
    }

    pub fn quote(&self, from: CurrencyCode, to: CurrencyCode) -> RateQuote<'_> {
        if from == to {
            return RateQuote::SameCurrency;
        }
        match self.lookup(from, to) {
            Some(rate) => RateQuote::Available(rate),
            None => RateQuote::Unavailable,
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeRate> {
        self.rates.values()
    }
}
