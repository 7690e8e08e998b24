//! Inter-account transfers
//!
//! # Architecture
//!
//! - [`resolver`]: pure validation and pricing of one transfer
//! - [`service`]: fetch → resolve → submit orchestration over collaborators
//! - [`adapters`]: collaborator traits and the in-memory ledger
//!
//! # Invariants
//!
//! 1. **Pure Resolution**: the resolver never performs I/O or keeps state
//! 2. **Closed Rejections**: refusals are [`RejectReason`] values, never panics
//! 3. **Approve-Before-Submit**: the ledger only sees resolver-approved transfers
//! 4. **Source-Currency Amounts**: request amount and balance check use the
//!    source account's currency; only the credit is converted

pub mod adapters;
pub mod error;
pub mod resolver;
pub mod service;
pub mod types;

pub use adapters::{AccountSource, InMemoryLedger, RateSource, TransferSubmitter};
pub use error::{RejectReason, RequestError, ResolveError, ServiceError, TransferFailure};
pub use resolver::{TransferResolver, resolve};
pub use service::TransferService;
pub use types::{
    Approval, MAX_DESCRIPTION_LEN, TransferInstruction, TransferOutcome, TransferReceipt,
    TransferRequest,
};
