//! banking_core - resolve a transfer against fixture data
//!
//! ```text
//! banking_core --env dev --fixtures fixtures --user 1 \
//!              --from 1 --to 2 --amount 100.00 [--description TEXT] [--submit]
//! ```
//!
//! Loads `config/<env>.yaml`, builds an in-memory ledger from
//! `<fixtures>/accounts.json` and `<fixtures>/rates.json`, prints the rate
//! label and the resolver's verdict. With `--submit` the transfer is booked
//! against the in-memory ledger and the receipt printed.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use banking_core::config::AppConfig;
use banking_core::money::{format_with_symbol, parse_amount};
use banking_core::transfer::{InMemoryLedger, TransferOutcome, TransferResolver, TransferService};
use banking_core::{AccountId, UserId};

// ============================================================
// ARGUMENTS
// ============================================================

fn get_arg(args: &[String], names: &[&str]) -> Option<String> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn get_env(args: &[String]) -> String {
    get_arg(args, &["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

fn parse_id(name: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .with_context(|| format!("{} must be a number, got '{}'", name, raw))
}

fn get_id(args: &[String], name: &str) -> Result<u64> {
    let raw = get_arg(args, &[name]).with_context(|| format!("missing {}", name))?;
    parse_id(name, &raw)
}

/// Optional id flag: absent falls back to `default`, malformed is an error.
fn get_id_or(args: &[String], name: &str, default: u64) -> Result<u64> {
    get_arg(args, &[name])
        .map(|raw| parse_id(name, &raw))
        .transpose()
        .map(|id| id.unwrap_or(default))
}

fn use_submit_mode(args: &[String]) -> bool {
    args.iter().any(|a| a == "--submit")
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let env = get_env(&args);
    let app_config = AppConfig::load(&env)?;
    let _log_guard = banking_core::logging::init_logging(&app_config);

    tracing::info!("Starting banking_core in {} mode", env);

    let fixtures = get_arg(&args, &["--fixtures"]).unwrap_or_else(|| "fixtures".to_string());
    let user_id: UserId = get_id_or(&args, "--user", 1)?;
    let from: AccountId = get_id(&args, "--from")?;
    let to: AccountId = get_id(&args, "--to")?;
    let amount_raw = get_arg(&args, &["--amount"]).context("missing --amount")?;
    let amount =
        parse_amount(&amount_raw).with_context(|| format!("invalid --amount '{}'", amount_raw))?;
    let description = get_arg(&args, &["--description"]);

    let registry = app_config.currency_registry()?;
    let resolver = TransferResolver::new(registry.clone());
    let ledger = Arc::new(
        InMemoryLedger::from_fixture_dir(&fixtures, user_id, resolver.clone())
            .with_context(|| format!("loading fixtures from {}", fixtures))?,
    );

    let service = TransferService::new(
        ledger.clone(),
        ledger.clone(),
        ledger.clone(),
        resolver,
        app_config.transfer.clone(),
    );

    let request = service.request(from, to, amount, description.as_deref())?;

    // Rate label for the selected pair
    let (Some(source), Some(destination)) = (ledger.account(from), ledger.account(to)) else {
        bail!("unknown account: --from {} / --to {}", from, to);
    };
    let snapshot = service.rate_snapshot().await?;
    println!("From: {}", source.label(&registry));
    println!("To:   {}", destination.label(&registry));
    println!(
        "Rate: {}",
        snapshot
            .quote(source.currency, destination.currency)
            .describe(&registry, source.currency, destination.currency)
    );

    if !use_submit_mode(&args) {
        match service.preview(user_id, &request).await? {
            TransferOutcome::Approved(approval) => println!(
                "APPROVED: {} -> {} (rate {})",
                format_with_symbol(
                    approval.source_amount,
                    &source.symbol(&registry),
                    registry.minor_units(source.currency)
                ),
                format_with_symbol(
                    approval.converted_amount,
                    &destination.symbol(&registry),
                    registry.minor_units(destination.currency)
                ),
                approval.rate
            ),
            TransferOutcome::Rejected(reason) => println!("REJECTED: {} ({})", reason, reason.code()),
        }
        return Ok(());
    }

    match service.execute(user_id, request).await {
        Ok(receipt) => {
            println!(
                "BOOKED: transaction {} - {}",
                receipt
                    .transaction_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                receipt.message
            );
            if let Some(updated) = ledger.account(from) {
                println!("From: {}", updated.label(&registry));
            }
            if let Some(updated) = ledger.account(to) {
                println!("To:   {}", updated.label(&registry));
            }
        }
        Err(e) => println!("FAILED: {} ({})", e, e.code()),
    }

    Ok(())
}
