//! Transfer Service
//!
//! Caller-side orchestration around the resolver:
//!
//! ```text
//! fetch accounts ─┐
//!                 ├─▶ resolve ─▶ Approved ─▶ submit ─▶ receipt
//! fetch rates ────┘      │
//!                        └─▶ Rejected(RateUnavailable) ─▶ re-fetch rates once
//! ```
//!
//! A rejected transfer never reaches the ledger.

use std::sync::Arc;

use tracing::{info, warn};

use super::adapters::{AccountSource, RateSource, TransferSubmitter};
use super::error::{RejectReason, RequestError, TransferFailure};
use super::resolver::TransferResolver;
use super::types::{TransferInstruction, TransferOutcome, TransferReceipt, TransferRequest};
use crate::account::Account;
use crate::config::TransferSettings;
use crate::core_types::{AccountId, UserId};
use crate::rates::RateSnapshot;

pub struct TransferService {
    accounts: Arc<dyn AccountSource>,
    rates: Arc<dyn RateSource>,
    submitter: Arc<dyn TransferSubmitter>,
    resolver: TransferResolver,
    settings: TransferSettings,
}

impl TransferService {
    pub fn new(
        accounts: Arc<dyn AccountSource>,
        rates: Arc<dyn RateSource>,
        submitter: Arc<dyn TransferSubmitter>,
        resolver: TransferResolver,
        settings: TransferSettings,
    ) -> Self {
        Self {
            accounts,
            rates,
            submitter,
            resolver,
            settings,
        }
    }

    pub fn resolver(&self) -> &TransferResolver {
        &self.resolver
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    /// Build a request using the configured description bound.
    pub fn request(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: rust_decimal::Decimal,
        description: Option<&str>,
    ) -> Result<TransferRequest, RequestError> {
        TransferRequest::with_description_limit(
            source,
            destination,
            amount,
            description,
            self.settings.max_description_len,
        )
    }

    /// Fresh rate snapshot from the rate collaborator.
    pub async fn rate_snapshot(&self) -> Result<RateSnapshot, TransferFailure> {
        let rates = self.rates.fetch_rates().await?;
        Ok(RateSnapshot::from_rates(rates)?)
    }

    /// Resolve without submitting.
    pub async fn preview(
        &self,
        user_id: UserId,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferFailure> {
        let accounts = self.accounts.fetch_accounts(user_id).await?;
        self.resolve_with_refresh(&accounts, request).await
    }

    /// Resolve and, if approved, submit to the ledger.
    pub async fn execute(
        &self,
        user_id: UserId,
        request: TransferRequest,
    ) -> Result<TransferReceipt, TransferFailure> {
        let approval = match self.preview(user_id, &request).await? {
            TransferOutcome::Approved(approval) => approval,
            TransferOutcome::Rejected(reason) => {
                warn!(
                    user_id = user_id,
                    source = request.source_account_id,
                    destination = request.destination_account_id,
                    reason = reason.code(),
                    "Transfer rejected"
                );
                return Err(TransferFailure::Rejected(reason));
            }
        };

        let instruction = TransferInstruction::from_request(&request);
        let receipt = self.submitter.submit(&instruction).await?;

        info!(
            user_id = user_id,
            submitter = self.submitter.name(),
            transaction_id = ?receipt.transaction_id,
            amount = %approval.source_amount,
            converted = %approval.converted_amount,
            rate = %approval.rate,
            "Transfer submitted"
        );

        Ok(receipt)
    }

    async fn resolve_with_refresh(
        &self,
        accounts: &[Account],
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferFailure> {
        let snapshot = self.rate_snapshot().await?;
        let outcome = self.resolver.resolve_request(request, accounts, &snapshot)?;

        if outcome.reject_reason() == Some(RejectReason::RateUnavailable)
            && self.settings.retry_on_missing_rate
        {
            warn!(
                rate_source = self.rates.name(),
                source = request.source_account_id,
                destination = request.destination_account_id,
                "Rate unavailable, refreshing rates once"
            );
            let snapshot = self.rate_snapshot().await?;
            return Ok(self.resolver.resolve_request(request, accounts, &snapshot)?);
        }

        Ok(outcome)
    }
}
