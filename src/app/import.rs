use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::ingest::{self, DuplicateRow};
use crate::ledger::calculate_running_balance;
use crate::models::{Id, UNKNOWN_VENDOR};
use crate::storage::TransactionStore;
use crate::vendors::VendorExtractor;

/// How one statement export should be imported.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Bank connection the rows are imported under.
    pub connection_id: Option<Id>,
    /// Account balance before the first counted transaction.
    pub initial_balance: Decimal,
    /// Date the initial balance was asserted by the bank. Bookkeeping
    /// context only; stamping applies every row regardless.
    pub balance_date: Option<NaiveDate>,
    /// Drop rows that already exist in the store instead of importing them.
    pub skip_duplicates: bool,
}

/// What happened during one import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    /// Per-row parse warnings, 1-based row numbers.
    pub warnings: Vec<String>,
    /// Repeated rows inside the uploaded file. Advisory only.
    pub file_duplicates: Vec<DuplicateRow>,
    /// Rows that matched already-imported transactions.
    pub existing_duplicates: usize,
    /// Of those, how many were dropped (`skip_duplicates`).
    pub skipped: usize,
}

/// Import a CSV statement export end to end.
///
/// Parse, flag duplicates, extract vendor names, stamp running balances,
/// tag the connection, insert. Duplicate flags are advisory: rows are only
/// dropped when the caller opts into `skip_duplicates`, and then only rows
/// matching transactions already in the store.
pub async fn import_csv(
    txns: &dyn TransactionStore,
    config: &ResolvedConfig,
    input: &str,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    let outcome = ingest::parse(input)?;
    report.warnings = outcome.warnings;
    let mut candidates = outcome.transactions;

    report.file_duplicates = ingest::within_file(&candidates);

    let existing = txns.list_transactions().await?;
    let duplicate_ids: Vec<Id> = ingest::against_existing(
        &existing,
        &candidates,
        config.duplicates.amount_epsilon,
    )
    .into_iter()
    .map(|tx| tx.id.clone())
    .collect();
    report.existing_duplicates = duplicate_ids.len();

    if options.skip_duplicates {
        candidates.retain(|tx| !duplicate_ids.contains(&tx.id));
        report.skipped = report.existing_duplicates;
    }

    let extractor = VendorExtractor::new();
    for tx in &mut candidates {
        let extracted = extractor.extract(&tx.description);
        if extracted != UNKNOWN_VENDOR {
            tx.vendor = Some(extracted);
        }
    }

    let mut candidates = calculate_running_balance(candidates, options.initial_balance);

    if let Some(connection_id) = &options.connection_id {
        for tx in &mut candidates {
            tx.bank_connection_id = Some(connection_id.clone());
        }
    }

    report.imported = candidates.len();
    txns.insert_transactions(&candidates).await?;

    info!(
        imported = report.imported,
        skipped = report.skipped,
        warnings = report.warnings.len(),
        "imported statement export"
    );
    Ok(report)
}

/// Recompute running balances for one connection's transactions.
///
/// Used after the initial balance changes or rows are deleted. Every
/// transaction under the connection is restamped in date order.
pub async fn restamp_balances(
    txns: &dyn TransactionStore,
    connection_id: &Id,
    initial_balance: Decimal,
) -> Result<usize> {
    let existing = txns.transactions_for_connection(connection_id).await?;
    let restamped = calculate_running_balance(existing, initial_balance);

    for tx in &restamped {
        txns.update_transaction(tx).await?;
    }
    Ok(restamped.len())
}
