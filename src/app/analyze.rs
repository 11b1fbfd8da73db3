use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use tracing::info;

use crate::categorize::{apply_suggestion, CategorizationRequest, Categorizer};
use crate::config::ResolvedConfig;
use crate::storage::{TransactionStore, VendorStore};

use super::batch::run_batch;

/// Outcome of a bulk categorization pass.
#[derive(Debug, Default)]
pub struct AnalyzeReport {
    /// Unverified transactions sent to the categorizer.
    pub processed: usize,
    /// Transactions whose classification actually changed.
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Run the categorizer over every unverified transaction.
///
/// Suggestions are advisory; verified transactions are never sent. Requests
/// run with the configured batch concurrency and per-transaction failures
/// are isolated.
pub async fn analyze_transactions(
    txns: &dyn TransactionStore,
    vendors: &dyn VendorStore,
    categorizer: &dyn Categorizer,
    config: &ResolvedConfig,
) -> Result<AnalyzeReport> {
    let all = txns.list_transactions().await?;

    // The existing chart of accounts, so suggestions converge on names
    // already in use.
    let mut categories: BTreeSet<String> = all
        .iter()
        .filter_map(|tx| tx.verification.category().map(str::to_string))
        .collect();
    for vendor in vendors.list_vendors().await? {
        categories.insert(vendor.category.clone());
    }
    let categories: Vec<String> = categories.into_iter().collect();

    let pending: Vec<_> = all.into_iter().filter(|tx| !tx.is_verified()).collect();
    let processed = pending.len();
    let updated = AtomicUsize::new(0);

    let batch = run_batch(pending, config.batch.concurrency, |mut tx| {
        let categories = categories.clone();
        let updated = &updated;
        async move {
            let request = CategorizationRequest {
                description: tx.description.clone(),
                amount: tx.amount,
                existing_categories: categories,
                business_context: config.business_context.clone(),
            };
            let suggestion = categorizer.suggest(&request).await?;
            if apply_suggestion(&mut tx, &suggestion, config.categorizer.overwrite_confidence) {
                txns.update_transaction(&tx).await?;
                updated.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        }
    })
    .await;

    let report = AnalyzeReport {
        processed,
        updated: updated.into_inner(),
        failed: batch.failed,
        errors: batch.errors,
    };
    info!(
        processed = report.processed,
        updated = report.updated,
        failed = report.failed,
        "analyzed transactions"
    );
    Ok(report)
}
