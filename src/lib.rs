//! banking_core - Transfer validation and currency conversion
//!
//! Decides whether a money transfer between two accounts may proceed and,
//! across currencies, what the destination is credited.
//!
//! # Modules
//!
//! - [`core_types`] - Identifier aliases and `CurrencyCode`
//! - [`currency`] - Currency registry (symbol, name, minor units)
//! - [`money`] - Decimal parsing, rounding and formatting
//! - [`account`] - Account snapshots
//! - [`rates`] - Exchange rates and the per-resolution rate snapshot
//! - [`transfer`] - Resolver, collaborator traits and transfer service
//! - [`wire`] - JSON response envelope
//! - [`config`] - YAML configuration
//! - [`logging`] - `tracing` subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod config;
pub mod currency;
pub mod logging;
pub mod money;
pub mod rates;
pub mod transfer;
pub mod wire;

// Convenient re-exports at crate root
pub use account::Account;
pub use core_types::{AccountId, CurrencyCode, TransactionId, UserId};
pub use currency::{CurrencyInfo, CurrencyRegistry};
pub use rates::{ExchangeRate, RateQuote, RateSnapshot};
pub use transfer::{
    Approval, RejectReason, TransferFailure, TransferOutcome, TransferRequest, TransferResolver,
    TransferService, resolve,
};
