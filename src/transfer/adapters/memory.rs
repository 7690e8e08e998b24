//! In-memory ledger
//!
//! Implements all three collaborator traits over in-process state. Used by
//! tests and by the binary when running against fixture files.
//!
//! `submit` books the transfer the way the real ledger would: it re-checks
//! the instruction with [`TransferResolver`], debits the source, credits the
//! destination with the converted amount and assigns sequential transaction
//! ids starting at 1.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

use super::{AccountSource, RateSource, TransferSubmitter};
use crate::account::{Account, find_account};
use crate::core_types::{AccountId, TransactionId, UserId};
use crate::rates::{ExchangeRate, RateSnapshot};
use crate::transfer::error::ServiceError;
use crate::transfer::resolver::TransferResolver;
use crate::transfer::types::{TransferInstruction, TransferOutcome, TransferReceipt};
use crate::wire::{ACCOUNTS_FAILED, RATES_FAILED, decode_envelope};

/// Fixture file names inside a fixture directory.
pub const ACCOUNTS_FIXTURE: &str = "accounts.json";
pub const RATES_FIXTURE: &str = "rates.json";

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: ServiceError,
    },
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: FxHashMap<UserId, Vec<Account>>,
    rates: Vec<ExchangeRate>,
    /// Rate tables that replace `rates` one by one after each fetch
    scheduled_rates: VecDeque<Vec<ExchangeRate>>,
    submissions: Vec<TransferInstruction>,
    next_transaction_id: TransactionId,
}

pub struct InMemoryLedger {
    resolver: TransferResolver,
    state: Mutex<LedgerState>,
    account_fetches: AtomicUsize,
    rate_fetches: AtomicUsize,
    fail_accounts: Mutex<Option<ServiceError>>,
    fail_rates: Mutex<Option<ServiceError>>,
    fail_submit: Mutex<Option<ServiceError>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(TransferResolver::default())
    }
}

impl InMemoryLedger {
    pub fn new(resolver: TransferResolver) -> Self {
        Self {
            resolver,
            state: Mutex::new(LedgerState {
                next_transaction_id: 1,
                ..LedgerState::default()
            }),
            account_fetches: AtomicUsize::new(0),
            rate_fetches: AtomicUsize::new(0),
            fail_accounts: Mutex::new(None),
            fail_rates: Mutex::new(None),
            fail_submit: Mutex::new(None),
        }
    }

    /// Load `accounts.json` and `rates.json` envelopes from `dir`; all
    /// accounts are assigned to `user_id`.
    pub fn from_fixture_dir(
        dir: impl AsRef<Path>,
        user_id: UserId,
        resolver: TransferResolver,
    ) -> Result<Self, FixtureError> {
        let dir = dir.as_ref();
        let accounts: Vec<Account> = read_fixture(&dir.join(ACCOUNTS_FIXTURE), ACCOUNTS_FAILED)?;
        let rates: Vec<ExchangeRate> = read_fixture(&dir.join(RATES_FIXTURE), RATES_FAILED)?;

        let ledger = Self::new(resolver);
        for account in accounts {
            ledger.add_account(user_id, account);
        }
        ledger.set_rates(rates);
        Ok(ledger)
    }

    pub fn add_account(&self, user_id: UserId, account: Account) {
        let mut state = lock(&self.state);
        state.accounts.entry(user_id).or_default().push(account);
    }

    pub fn set_rates(&self, rates: Vec<ExchangeRate>) {
        lock(&self.state).rates = rates;
    }

    /// After the next rate fetch, the table is replaced by `rates`.
    pub fn schedule_rates(&self, rates: Vec<ExchangeRate>) {
        lock(&self.state).scheduled_rates.push_back(rates);
    }

    pub fn set_fail_accounts(&self, error: Option<ServiceError>) {
        *lock(&self.fail_accounts) = error;
    }

    pub fn set_fail_rates(&self, error: Option<ServiceError>) {
        *lock(&self.fail_rates) = error;
    }

    pub fn set_fail_submit(&self, error: Option<ServiceError>) {
        *lock(&self.fail_submit) = error;
    }

    pub fn account(&self, id: AccountId) -> Option<Account> {
        let state = lock(&self.state);
        state
            .accounts
            .values()
            .flat_map(|accounts| accounts.iter())
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn submissions(&self) -> Vec<TransferInstruction> {
        lock(&self.state).submissions.clone()
    }

    pub fn account_fetch_count(&self) -> usize {
        self.account_fetches.load(Ordering::SeqCst)
    }

    pub fn rate_fetch_count(&self) -> usize {
        self.rate_fetches.load(Ordering::SeqCst)
    }

    fn book(&self, instruction: &TransferInstruction) -> Result<TransferReceipt, ServiceError> {
        let mut state = lock(&self.state);

        let all: Vec<Account> = state.accounts.values().flatten().cloned().collect();
        let source = find_account(&all, instruction.from_account_id)
            .ok_or_else(|| ServiceError::Server("Source account not found".into()))?;
        let destination = find_account(&all, instruction.to_account_id)
            .ok_or_else(|| ServiceError::Server("Destination account not found".into()))?;
        let snapshot = RateSnapshot::from_rates(state.rates.clone())
            .map_err(|e| ServiceError::Server(e.to_string()))?;

        let approval = match self
            .resolver
            .resolve(source, destination, instruction.amount, &snapshot)
        {
            TransferOutcome::Approved(approval) => approval,
            TransferOutcome::Rejected(reason) => return Err(ServiceError::Server(reason.to_string())),
        };

        let debited = source
            .balance
            .checked_sub(approval.source_amount)
            .ok_or_else(|| ServiceError::Server("Balance overflow".into()))?;
        let credited = destination
            .balance
            .checked_add(approval.converted_amount)
            .ok_or_else(|| ServiceError::Server("Balance overflow".into()))?;

        for account in state.accounts.values_mut().flat_map(|a| a.iter_mut()) {
            if account.id == instruction.from_account_id {
                account.balance = debited;
            } else if account.id == instruction.to_account_id {
                account.balance = credited;
            }
        }

        let transaction_id = state.next_transaction_id;
        state.next_transaction_id += 1;
        state.submissions.push(instruction.clone());

        info!(
            transaction_id = transaction_id,
            from = instruction.from_account_id,
            to = instruction.to_account_id,
            amount = %approval.source_amount,
            converted = %approval.converted_amount,
            "Transfer booked"
        );

        Ok(TransferReceipt {
            success: true,
            message: "Transfer completed".to_string(),
            transaction_id: Some(transaction_id),
            converted_amount: Some(approval.converted_amount),
        })
    }
}

#[async_trait]
impl AccountSource for InMemoryLedger {
    fn name(&self) -> &'static str {
        "InMemoryLedger"
    }

    async fn fetch_accounts(&self, user_id: UserId) -> Result<Vec<Account>, ServiceError> {
        self.account_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = lock(&self.fail_accounts).clone() {
            return Err(err);
        }
        let state = lock(&self.state);
        let accounts = state.accounts.get(&user_id).cloned().unwrap_or_default();
        debug!(user_id = user_id, count = accounts.len(), "Accounts fetched");
        Ok(accounts)
    }
}

#[async_trait]
impl RateSource for InMemoryLedger {
    fn name(&self) -> &'static str {
        "InMemoryLedger"
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, ServiceError> {
        self.rate_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = lock(&self.fail_rates).clone() {
            return Err(err);
        }
        let mut state = lock(&self.state);
        let rates = state.rates.clone();
        if let Some(next) = state.scheduled_rates.pop_front() {
            state.rates = next;
        }
        debug!(count = rates.len(), "Rates fetched");
        Ok(rates)
    }
}

#[async_trait]
impl TransferSubmitter for InMemoryLedger {
    fn name(&self) -> &'static str {
        "InMemoryLedger"
    }

    async fn submit(
        &self,
        instruction: &TransferInstruction,
    ) -> Result<TransferReceipt, ServiceError> {
        if let Some(err) = lock(&self.fail_submit).clone() {
            return Err(err);
        }
        self.book(instruction)
    }
}

fn read_fixture<T: serde::de::DeserializeOwned>(
    path: &Path,
    default_message: &str,
) -> Result<T, FixtureError> {
    let body = std::fs::read(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode_envelope(&body, default_message).map_err(|source| FixtureError::Decode {
        path: path.display().to_string(),
        source,
    })
}

/// Lock ignoring poison; state stays usable after a panicking test thread.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CurrencyCode;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ledger() -> InMemoryLedger {
        let ledger = InMemoryLedger::default();
        ledger.add_account(1, Account::new(10, "TR-0010", CurrencyCode::TRY, d("500")));
        ledger.add_account(1, Account::new(11, "US-0011", CurrencyCode::USD, d("20")));
        ledger.set_rates(vec![ExchangeRate::new(
            CurrencyCode::TRY,
            CurrencyCode::USD,
            d("0.031"),
        )]);
        ledger
    }

    fn instruction(from: AccountId, to: AccountId, amount: &str) -> TransferInstruction {
        TransferInstruction {
            from_account_id: from,
            to_account_id: to,
            amount: d(amount),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_accounts_per_user() {
        let ledger = ledger();
        assert_eq!(ledger.fetch_accounts(1).await.unwrap().len(), 2);
        assert!(ledger.fetch_accounts(2).await.unwrap().is_empty());
        assert_eq!(ledger.account_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_submit_moves_balances() {
        let ledger = ledger();
        let receipt = ledger.submit(&instruction(10, 11, "100")).await.unwrap();
        assert_eq!(receipt.transaction_id, Some(1));
        assert_eq!(receipt.converted_amount, Some(d("3.10")));

        assert_eq!(ledger.account(10).unwrap().balance, d("400"));
        assert_eq!(ledger.account(11).unwrap().balance, d("23.10"));

        let second = ledger.submit(&instruction(10, 11, "1")).await.unwrap();
        assert_eq!(second.transaction_id, Some(2));
        assert_eq!(ledger.submissions().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_rejects_overdraft() {
        let ledger = ledger();
        let err = ledger.submit(&instruction(10, 11, "500.01")).await.unwrap_err();
        assert_eq!(err, ServiceError::Server("Insufficient funds".into()));
        assert!(ledger.submissions().is_empty());
        assert_eq!(ledger.account(10).unwrap().balance, d("500"));
    }

    #[tokio::test]
    async fn test_submit_rejects_credit_overflow() {
        let ledger = ledger();
        let mut full = Account::new(12, "TR-0012", CurrencyCode::TRY, d("0"));
        full.balance = Decimal::MAX;
        ledger.add_account(1, full);

        let err = ledger.submit(&instruction(10, 12, "1")).await.unwrap_err();
        assert_eq!(err, ServiceError::Server("Balance overflow".into()));
        assert_eq!(ledger.account(10).unwrap().balance, d("500"));
        assert_eq!(ledger.account(12).unwrap().balance, Decimal::MAX);
        assert!(ledger.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_scheduled_rates_apply_after_fetch() {
        let ledger = ledger();
        ledger.schedule_rates(vec![]);
        assert_eq!(ledger.fetch_rates().await.unwrap().len(), 1);
        assert!(ledger.fetch_rates().await.unwrap().is_empty());
        assert_eq!(ledger.rate_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let ledger = ledger();
        ledger.set_fail_rates(Some(ServiceError::NoData));
        assert_eq!(ledger.fetch_rates().await, Err(ServiceError::NoData));
        ledger.set_fail_rates(None);
        assert!(ledger.fetch_rates().await.is_ok());
    }

    #[test]
    fn test_from_fixture_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(ACCOUNTS_FIXTURE),
            r#"{"success":true,"data":[{"AccountId":1,"AccountNumber":"TR-0001","Currency":1,"Balance":500.0,"CurrencySymbol":"₺"}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(RATES_FIXTURE),
            r#"{"success":true,"data":[{"FromCurrency":1,"ToCurrency":2,"Rate":0.031,"LastUpdated":"2024-03-01T09:30:00"}]}"#,
        )
        .unwrap();

        let ledger = InMemoryLedger::from_fixture_dir(dir.path(), 5, TransferResolver::default()).unwrap();
        assert_eq!(ledger.account(1).map(|a| a.balance), Some(d("500")));
    }

    #[test]
    fn test_missing_fixture_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemoryLedger::from_fixture_dir(dir.path(), 1, TransferResolver::default())
            .err()
            .unwrap();
        assert!(matches!(err, FixtureError::Io { .. }));
        assert!(err.to_string().contains(ACCOUNTS_FIXTURE));
    }
}
