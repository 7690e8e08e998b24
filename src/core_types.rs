//! Core types used throughout the crate
//!
//! Identifier aliases and the currency code newtype shared by every module.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account ID - unique per ledger, assigned by the account service.
pub type AccountId = u64;

/// User ID - owner of a set of accounts.
pub type UserId = u64;

/// Transaction ID - assigned by the ledger after a transfer is booked.
pub type TransactionId = u64;

/// Numeric currency code as carried on the wire (TRY=1, USD=2, EUR=3).
///
/// Deliberately not a closed enum: unknown codes are representable and
/// resolved through [`crate::currency::CurrencyRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(pub u16);

impl CurrencyCode {
    pub const TRY: CurrencyCode = CurrencyCode(1);
    pub const USD: CurrencyCode = CurrencyCode(2);
    pub const EUR: CurrencyCode = CurrencyCode(3);

    #[inline]
    pub fn id(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for CurrencyCode {
    fn from(id: u16) -> Self {
        CurrencyCode(id)
    }
}
