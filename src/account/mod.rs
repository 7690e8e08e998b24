//! Account snapshots
//!
//! Read-only views of ledger accounts as delivered by the account service.
//! Snapshots are replaced wholesale on each refresh and never mutated here.

pub mod models;

pub use models::{Account, find_account};
