//! Transfer request/outcome types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{RejectReason, RequestError};
use crate::core_types::{AccountId, CurrencyCode, TransactionId};

/// Default bound on the free-text description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A caller's transfer intent. `amount` is in the source account's currency.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl TransferRequest {
    pub fn new(
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Self, RequestError> {
        Self::with_description_limit(
            source_account_id,
            destination_account_id,
            amount,
            description,
            MAX_DESCRIPTION_LEN,
        )
    }

    /// Like [`TransferRequest::new`] with an explicit description bound.
    ///
    /// Blank descriptions are stored as `None`. The amount is not checked
    /// here; that is the resolver's first rule.
    pub fn with_description_limit(
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
        description: Option<&str>,
        max_len: usize,
    ) -> Result<Self, RequestError> {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        if let Some(text) = &description {
            let actual = text.chars().count();
            if actual > max_len {
                return Err(RequestError::DescriptionTooLong { max: max_len, actual });
            }
        }

        Ok(Self {
            source_account_id,
            destination_account_id,
            amount,
            description,
        })
    }
}

/// A priced, validated transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    /// Debit amount, source currency
    pub source_amount: Decimal,
    /// Credit amount, destination currency, rounded to its minor units
    pub converted_amount: Decimal,
    /// Rate applied (`1` for same currency)
    pub rate: Decimal,
    pub source_currency: CurrencyCode,
    pub destination_currency: CurrencyCode,
}

impl Approval {
    #[inline]
    pub fn is_cross_currency(&self) -> bool {
        self.source_currency != self.destination_currency
    }
}

/// Resolver verdict
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Approved(Approval),
    Rejected(RejectReason),
}

impl TransferOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, TransferOutcome::Approved(_))
    }

    pub fn approval(&self) -> Option<&Approval> {
        match self {
            TransferOutcome::Approved(a) => Some(a),
            TransferOutcome::Rejected(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            TransferOutcome::Approved(_) => None,
            TransferOutcome::Rejected(r) => Some(*r),
        }
    }

    pub fn into_result(self) -> Result<Approval, RejectReason> {
        match self {
            TransferOutcome::Approved(a) => Ok(a),
            TransferOutcome::Rejected(r) => Err(r),
        }
    }
}

/// Outbound transfer submission, as the ledger service expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferInstruction {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransferInstruction {
    pub fn from_request(request: &TransferRequest) -> Self {
        Self {
            from_account_id: request.source_account_id,
            to_account_id: request.destination_account_id,
            amount: request.amount,
            description: request.description.clone(),
        }
    }
}

/// Ledger acknowledgement of a booked transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferReceipt {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub converted_amount: Option<Decimal>,
}
