//! JSON wire envelope
//!
//! Every backend endpoint wraps its payload as
//! `{"success": bool, "data": T?, "message": string?}`. Payload types carry
//! their own PascalCase keys (see [`crate::account::Account`],
//! [`crate::rates::ExchangeRate`], [`crate::transfer::TransferReceipt`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::transfer::ServiceError;

/// Fallback message when an account query fails without one.
pub const ACCOUNTS_FAILED: &str = "Unknown error";
/// Fallback message when a transfer submission fails without one.
pub const TRANSFER_FAILED: &str = "Transfer failed";
/// Fallback message when a rate query fails without one.
pub const RATES_FAILED: &str = "Exchange rates unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(msg: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(msg.to_string()),
        }
    }

    /// Unwrap the payload; a failed or empty envelope becomes
    /// `ServiceError::Server` with the server's message or `default_message`.
    pub fn into_result(self, default_message: &str) -> Result<T, ServiceError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ServiceError::Server(
                self.message
                    .unwrap_or_else(|| default_message.to_string()),
            )),
        }
    }
}

/// Decode a response body into its payload.
pub fn decode_envelope<T: DeserializeOwned>(
    body: &[u8],
    default_message: &str,
) -> Result<T, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::NoData);
    }
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    envelope.into_result(default_message)
}
