//! Currency module
//!
//! Currency metadata (symbol, display name, minor-unit precision) keyed by
//! the numeric wire code. The table is open: configuration may add entries
//! without touching code.

pub mod models;
pub mod registry;

pub use models::{CurrencyError, CurrencyInfo, DEFAULT_MINOR_UNITS};
pub use registry::CurrencyRegistry;
