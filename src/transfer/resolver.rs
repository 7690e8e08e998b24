//! Transfer Resolver
//!
//! Pure decision function: validates a transfer between two account
//! snapshots and prices it against a rate snapshot. No I/O, no shared state;
//! identical inputs always give identical outcomes.
//!
//! # Rules (first failure wins)
//!
//! ```text
//! 1. amount > 0                     else InvalidAmount
//! 2. source.id != destination.id    else SameAccount
//! 3. source.balance >= amount       else InsufficientFunds
//! 4. same currency                  → rate 1, converted = amount
//! 5. rates[(src, dst)] present      → converted = round(amount * rate)
//!                                   else RateUnavailable
//! ```
//!
//! Rounding is half-away-from-zero at the destination currency's minor
//! units.

use rust_decimal::Decimal;
use tracing::debug;

use super::error::{RejectReason, ResolveError};
use super::types::{Approval, TransferOutcome, TransferRequest};
use crate::account::{Account, find_account};
use crate::currency::CurrencyRegistry;
use crate::money::round_to_minor;
use crate::rates::RateSnapshot;

/// Validates and prices transfers using a currency registry for precision.
#[derive(Debug, Clone)]
pub struct TransferResolver {
    registry: CurrencyRegistry,
}

impl Default for TransferResolver {
    fn default() -> Self {
        Self::new(CurrencyRegistry::builtin())
    }
}

impl TransferResolver {
    pub fn new(registry: CurrencyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Decide a transfer of `amount` (source currency) from `source` to
    /// `destination`.
    pub fn resolve(
        &self,
        source: &Account,
        destination: &Account,
        amount: Decimal,
        rates: &RateSnapshot,
    ) -> TransferOutcome {
        let outcome = match self.check(source, destination, amount, rates) {
            Ok(approval) => TransferOutcome::Approved(approval),
            Err(reason) => TransferOutcome::Rejected(reason),
        };

        debug!(
            source = source.id,
            destination = destination.id,
            amount = %amount,
            outcome = ?outcome,
            "Transfer resolved"
        );

        outcome
    }

    /// Look both accounts up by id, then [`resolve`](Self::resolve).
    pub fn resolve_request(
        &self,
        request: &TransferRequest,
        accounts: &[Account],
        rates: &RateSnapshot,
    ) -> Result<TransferOutcome, ResolveError> {
        let source = find_account(accounts, request.source_account_id)
            .ok_or(ResolveError::AccountNotFound(request.source_account_id))?;
        let destination = find_account(accounts, request.destination_account_id)
            .ok_or(ResolveError::AccountNotFound(request.destination_account_id))?;

        Ok(self.resolve(source, destination, request.amount, rates))
    }

    fn check(
        &self,
        source: &Account,
        destination: &Account,
        amount: Decimal,
        rates: &RateSnapshot,
    ) -> Result<Approval, RejectReason> {
        if amount <= Decimal::ZERO {
            return Err(RejectReason::InvalidAmount);
        }
        if source.id == destination.id {
            return Err(RejectReason::SameAccount);
        }
        // Balance and amount are both in source currency
        if source.balance < amount {
            return Err(RejectReason::InsufficientFunds);
        }

        let (converted_amount, rate) = if source.currency == destination.currency {
            (amount, Decimal::ONE)
        } else {
            let quoted = rates
                .lookup(source.currency, destination.currency)
                .ok_or(RejectReason::RateUnavailable)?;
            let minor_units = self.registry.minor_units(destination.currency);
            // A product outside Decimal's range cannot be credited
            let product = amount
                .checked_mul(quoted.rate)
                .ok_or(RejectReason::InvalidAmount)?;
            (round_to_minor(product, minor_units), quoted.rate)
        };

        Ok(Approval {
            source_amount: amount,
            converted_amount,
            rate,
            source_currency: source.currency,
            destination_currency: destination.currency,
        })
    }
}

/// Resolve with the built-in TRY/USD/EUR precision table.
pub fn resolve(
    source: &Account,
    destination: &Account,
    amount: Decimal,
    rates: &RateSnapshot,
) -> TransferOutcome {
    TransferResolver::default().resolve(source, destination, amount, rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CurrencyCode;
    use crate::currency::CurrencyInfo;
    use crate::rates::ExchangeRate;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn account(id: u64, currency: CurrencyCode, balance: &str) -> Account {
        Account::new(id, &format!("TR-{:04}", id), currency, d(balance))
    }

    fn rates() -> RateSnapshot {
        RateSnapshot::from_rates(vec![
            ExchangeRate::new(CurrencyCode::TRY, CurrencyCode::USD, d("0.031")),
            ExchangeRate::new(CurrencyCode::USD, CurrencyCode::TRY, d("32.1546")),
        ])
        .unwrap()
    }

    #[test]
    fn test_conversion_overflow_rejected() {
        let mut src = account(1, CurrencyCode::USD, "0");
        src.balance = Decimal::MAX;
        let dst = account(2, CurrencyCode::TRY, "0");
        let amount = d("10000000000000000000000000000");
        let outcome = resolve(&src, &dst, amount, &rates());
        assert_eq!(outcome, TransferOutcome::Rejected(RejectReason::InvalidAmount));
    }

    #[test]
    fn test_non_positive_amount_rejected_first() {
        // Same account and empty balance would also fail; amount wins
        let src = account(1, CurrencyCode::TRY, "0");
        for amount in ["0", "-0.01", "-100"] {
            let outcome = resolve(&src, &src, d(amount), &RateSnapshot::empty());
            assert_eq!(outcome, TransferOutcome::Rejected(RejectReason::InvalidAmount));
        }
    }

    #[test]
    fn test_same_account_before_balance() {
        let src = account(1, CurrencyCode::TRY, "10");
        let mut same_id_other_currency = account(1, CurrencyCode::USD, "10");
        same_id_other_currency.account_number = "US-0001".into();
        let outcome = resolve(&src, &same_id_other_currency, d("500"), &rates());
        assert_eq!(outcome, TransferOutcome::Rejected(RejectReason::SameAccount));
    }

    #[test]
    fn test_insufficient_funds() {
        let src = account(1, CurrencyCode::TRY, "50.00");
        let dst = account(2, CurrencyCode::TRY, "0");
        let outcome = resolve(&src, &dst, d("100.00"), &rates());
        assert_eq!(outcome, TransferOutcome::Rejected(RejectReason::InsufficientFunds));
    }

    #[test]
    fn test_balance_checked_before_rate() {
        let src = account(1, CurrencyCode::EUR, "5");
        let dst = account(2, CurrencyCode::TRY, "0");
        let outcome = resolve(&src, &dst, d("10"), &RateSnapshot::empty());
        assert_eq!(outcome, TransferOutcome::Rejected(RejectReason::InsufficientFunds));
    }

    #[test]
    fn test_exact_balance_accepted() {
        let src = account(1, CurrencyCode::USD, "250.40");
        let dst = account(2, CurrencyCode::USD, "0");
        let outcome = resolve(&src, &dst, d("250.40"), &RateSnapshot::empty());
        assert!(outcome.is_approved());
    }

    #[test]
    fn test_same_currency_ignores_rates() {
        let src = account(1, CurrencyCode::EUR, "1000");
        let dst = account(2, CurrencyCode::EUR, "0");
        let approval = resolve(&src, &dst, d("123.456"), &rates()).into_result().unwrap();
        assert_eq!(approval.converted_amount, d("123.456"));
        assert_eq!(approval.rate, Decimal::ONE);
        assert!(!approval.is_cross_currency());
    }

    #[test]
    fn test_cross_currency_rounds_half_away_from_zero() {
        let src = account(1, CurrencyCode::USD, "1000");
        let dst = account(2, CurrencyCode::TRY, "0");
        let approval = resolve(&src, &dst, d("100"), &rates()).into_result().unwrap();
        assert_eq!(approval.converted_amount, d("3215.46"));
        assert_eq!(approval.rate, d("32.1546"));

        // 0.15 * 32.1546 = 4.82319 -> 4.82 ; 1.5 * 0.031 = 0.0465 -> 0.05
        let small = resolve(&src, &dst, d("0.15"), &rates()).into_result().unwrap();
        assert_eq!(small.converted_amount, d("4.82"));
        let src_try = account(3, CurrencyCode::TRY, "10");
        let dst_usd = account(4, CurrencyCode::USD, "0");
        let half = resolve(&src_try, &dst_usd, d("1.5"), &rates()).into_result().unwrap();
        assert_eq!(half.converted_amount, d("0.05"));
    }

    #[test]
    fn test_try_to_usd_scenario() {
        let src = account(1, CurrencyCode::TRY, "500.00");
        let dst = account(2, CurrencyCode::USD, "0");
        let approval = resolve(&src, &dst, d("100.00"), &rates()).into_result().unwrap();
        assert_eq!(approval.converted_amount, d("3.10"));
        assert_eq!(approval.source_amount, d("100.00"));
        assert_eq!(approval.source_currency, CurrencyCode::TRY);
        assert_eq!(approval.destination_currency, CurrencyCode::USD);
    }

    #[test]
    fn test_missing_pair_is_rate_unavailable() {
        let src = account(1, CurrencyCode::TRY, "500");
        let dst = account(2, CurrencyCode::EUR, "0");
        let outcome = resolve(&src, &dst, d("10"), &rates());
        assert_eq!(outcome, TransferOutcome::Rejected(RejectReason::RateUnavailable));
    }

    #[test]
    fn test_destination_precision_from_registry() {
        let mut registry = CurrencyRegistry::builtin();
        registry
            .insert(CurrencyInfo::new(CurrencyCode(4), "JPY", "¥", "Japon Yeni", 0))
            .unwrap();
        let resolver = TransferResolver::new(registry);
        let snapshot = RateSnapshot::from_rates(vec![ExchangeRate::new(
            CurrencyCode::USD,
            CurrencyCode(4),
            d("151.235"),
        )])
        .unwrap();

        let src = account(1, CurrencyCode::USD, "100");
        let dst = account(2, CurrencyCode(4), "0");
        let approval = resolver.resolve(&src, &dst, d("10"), &snapshot).into_result().unwrap();
        // 1512.35 at 0 minor units
        assert_eq!(approval.converted_amount, d("1512"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let src = account(1, CurrencyCode::USD, "1000");
        let dst = account(2, CurrencyCode::TRY, "0");
        let snapshot = rates();
        let first = resolve(&src, &dst, d("77.77"), &snapshot);
        let second = resolve(&src, &dst, d("77.77"), &snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_request_by_id() {
        let accounts = vec![
            account(1, CurrencyCode::TRY, "500"),
            account(2, CurrencyCode::USD, "0"),
        ];
        let resolver = TransferResolver::default();

        let req = TransferRequest::new(1, 2, d("100"), None).unwrap();
        let outcome = resolver.resolve_request(&req, &accounts, &rates()).unwrap();
        assert_eq!(outcome.approval().map(|a| a.converted_amount), Some(d("3.10")));

        let missing = TransferRequest::new(1, 9, d("100"), None).unwrap();
        assert_eq!(
            resolver.resolve_request(&missing, &accounts, &rates()),
            Err(ResolveError::AccountNotFound(9))
        );
    }
}
