//! Money Module
//!
//! Decimal parsing, minor-unit rounding and display formatting. Every amount
//! that crosses the crate boundary goes through this module so rounding and
//! format rules live in one place.
//!
//! ## Representation
//! - Amounts and rates are `rust_decimal::Decimal`; binary floats are only
//!   touched at the JSON boundary.
//! - Settlement precision is the currency's minor units (2 for TRY/USD/EUR).
//! - Rounding is half-away-from-zero: `3215.455 → 3215.46`, `-0.005 → -0.01`.
//!
//! ## Usage
//! ```rust
//! use banking_core::money::{format_with_symbol, parse_amount, round_to_minor};
//! use rust_decimal::Decimal;
//!
//! let amount = parse_amount("100.00").unwrap();
//! let converted = round_to_minor(amount * Decimal::new(321546, 4), 2);
//! assert_eq!(converted.to_string(), "3215.46");
//! assert_eq!(format_with_symbol(converted, "₺", 2), "₺3215.46");
//! ```

use std::str::FromStr;

use rust_decimal::prelude::*;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

// ============================================================================
// Rounding
// ============================================================================

/// Round to `minor_units` decimal places, half away from zero.
#[inline]
pub fn round_to_minor(value: Decimal, minor_units: u32) -> Decimal {
    value.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// Parse: Client text → Decimal
// ============================================================================

/// Parse a client-entered amount.
///
/// Strict format: digits with at most one interior dot. Rejects `.5`, `5.`,
/// sign prefixes, thousands separators and scientific notation. Zero is
/// rejected because every caller wants a positive amount.
pub fn parse_amount(amount_str: &str) -> Result<Decimal, MoneyError> {
    let s = amount_str.trim();
    if s.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    if s.starts_with('-') {
        return Err(MoneyError::InvalidAmount);
    }
    if s.starts_with('+') {
        return Err(MoneyError::InvalidFormat("+ prefix not allowed".into()));
    }

    let parts: Vec<&str> = s.split('.').collect();
    match parts.as_slice() {
        [whole] => check_digits(whole, "whole part")?,
        [whole, frac] => {
            if whole.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if frac.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            check_digits(whole, "whole part")?;
            check_digits(frac, "fractional part")?;
        }
        _ => return Err(MoneyError::InvalidFormat("multiple decimal points".into())),
    }

    let amount = Decimal::from_str(s).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;
    if amount.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }
    Ok(amount)
}

/// Parse an amount and reject more fractional digits than `max_decimals`.
///
/// No silent truncation: `"1.005"` against 2 decimals is an error, not `1.00`.
pub fn parse_amount_with_precision(amount_str: &str, max_decimals: u32) -> Result<Decimal, MoneyError> {
    let amount = parse_amount(amount_str)?;
    let provided = amount.normalize().scale();
    if provided > max_decimals {
        return Err(MoneyError::PrecisionOverflow {
            provided,
            max: max_decimals,
        });
    }
    Ok(amount)
}

fn check_digits(part: &str, what: &str) -> Result<(), MoneyError> {
    if part.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(MoneyError::InvalidFormat(format!(
            "invalid character in {}: {}",
            what, part
        )))
    }
}

// ============================================================================
// Format: Decimal → display text
// ============================================================================

/// Fixed-point display with exactly `decimals` places.
pub fn format_amount(value: Decimal, decimals: u32) -> String {
    let rounded = round_to_minor(value, decimals);
    format!("{:.prec$}", rounded, prec = decimals as usize)
}

/// Display with a leading currency symbol, sign before the symbol.
pub fn format_with_symbol(value: Decimal, symbol: &str, decimals: u32) -> String {
    let formatted = format_amount(value.abs(), decimals);
    if value.is_sign_negative() && !round_to_minor(value, decimals).is_zero() {
        format!("-{}{}", symbol, formatted)
    } else {
        format!("{}{}", symbol, formatted)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
