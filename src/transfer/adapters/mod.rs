//! Service Adapters
//!
//! Seams to the external account, rate and ledger services. Implementations
//! are passed to [`TransferService`](super::service::TransferService)
//! explicitly; there is no process-wide client.

pub mod memory;

pub use memory::{FixtureError, InMemoryLedger};

use async_trait::async_trait;

use super::error::ServiceError;
use super::types::{TransferInstruction, TransferReceipt};
use crate::account::Account;
use crate::core_types::UserId;
use crate::rates::ExchangeRate;

/// Account query collaborator
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Adapter name for logging
    fn name(&self) -> &'static str;

    /// Current snapshot of the user's accounts
    async fn fetch_accounts(&self, user_id: UserId) -> Result<Vec<Account>, ServiceError>;
}

/// Rate query collaborator
#[async_trait]
pub trait RateSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Current rate table. Validation into a snapshot is the caller's job.
    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, ServiceError>;
}

/// Transfer submission collaborator (the ledger)
///
/// Only ever called with an instruction the resolver approved. The ledger
/// performs the debit/credit and assigns the transaction id.
#[async_trait]
pub trait TransferSubmitter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit(&self, instruction: &TransferInstruction)
    -> Result<TransferReceipt, ServiceError>;
}
