//! Transfer Error Types
//!
//! [`RejectReason`] is the closed set of outcomes the resolver can refuse a
//! transfer with. It is returned as a value, never raised. The remaining
//! enums cover failures around the resolver: request construction, account
//! lookup and collaborator calls.

use thiserror::Error;

use crate::core_types::AccountId;

/// Why the resolver refused a transfer.
///
/// Variants are listed in evaluation order; the first failing rule wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source and destination account cannot be the same")]
    SameAccount,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("No exchange rate for currency pair")]
    RateUnavailable,
}

impl RejectReason {
    /// Stable machine code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::InvalidAmount => "INVALID_AMOUNT",
            RejectReason::SameAccount => "SAME_ACCOUNT",
            RejectReason::InsufficientFunds => "INSUFFICIENT_FUNDS",
            RejectReason::RateUnavailable => "RATE_UNAVAILABLE",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            RejectReason::InvalidAmount | RejectReason::SameAccount => 400,
            RejectReason::InsufficientFunds => 422,
            RejectReason::RateUnavailable => 503,
        }
    }

    /// Whether re-fetching inputs could change the answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RejectReason::RateUnavailable)
    }
}

/// Invalid [`TransferRequest`](super::types::TransferRequest) construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Description too long: {actual} characters, max {max}")]
    DescriptionTooLong { max: usize, actual: usize },
}

/// Failure to resolve a request against an account snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
}

/// Failure reported by an account, rate or ledger collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("No data received")]
    NoData,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Failed to decode response: {0}")]
    Decoding(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Decoding(e.to_string())
    }
}

/// Why [`TransferService`](super::service::TransferService) did not book a transfer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Transfer rejected: {0}")]
    Rejected(RejectReason),

    #[error("Invalid rate snapshot: {0}")]
    InvalidRates(String),
}

impl From<ResolveError> for TransferFailure {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::AccountNotFound(id) => TransferFailure::AccountNotFound(id),
        }
    }
}

impl From<crate::rates::RateError> for TransferFailure {
    fn from(e: crate::rates::RateError) -> Self {
        TransferFailure::InvalidRates(e.to_string())
    }
}

impl TransferFailure {
    pub fn code(&self) -> &'static str {
        match self {
            TransferFailure::Service(ServiceError::NoData) => "NO_DATA",
            TransferFailure::Service(ServiceError::Server(_)) => "SERVER_ERROR",
            TransferFailure::Service(ServiceError::Decoding(_)) => "DECODING_ERROR",
            TransferFailure::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferFailure::Rejected(reason) => reason.code(),
            TransferFailure::InvalidRates(_) => "INVALID_RATES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_codes() {
        assert_eq!(RejectReason::InvalidAmount.code(), "INVALID_AMOUNT");
        assert_eq!(RejectReason::SameAccount.code(), "SAME_ACCOUNT");
        assert_eq!(RejectReason::InsufficientFunds.code(), "INSUFFICIENT_FUNDS");
        assert_eq!(RejectReason::RateUnavailable.code(), "RATE_UNAVAILABLE");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(RejectReason::InvalidAmount.http_status(), 400);
        assert_eq!(RejectReason::SameAccount.http_status(), 400);
        assert_eq!(RejectReason::InsufficientFunds.http_status(), 422);
        assert_eq!(RejectReason::RateUnavailable.http_status(), 503);
    }

    #[test]
    fn test_only_missing_rate_is_retryable() {
        assert!(RejectReason::RateUnavailable.is_retryable());
        assert!(!RejectReason::InsufficientFunds.is_retryable());
    }

    #[test]
    fn test_failure_codes() {
        assert_eq!(
            TransferFailure::Rejected(RejectReason::SameAccount).code(),
            "SAME_ACCOUNT"
        );
        assert_eq!(
            TransferFailure::from(ResolveError::AccountNotFound(9)).code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            TransferFailure::from(ServiceError::NoData).to_string(),
            "No data received"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RejectReason::InsufficientFunds.to_string(), "Insufficient funds");
    }
}
