use anyhow::{Context, Result};
use tracing::info;

use crate::config::ResolvedConfig;
use crate::models::{Transaction, Verification};
use crate::storage::{TransactionStore, VendorStore};
use crate::vendors::similarity;

/// Result of a similarity sweep: the transactions that were reassigned,
/// plus one message per transaction that matched but failed to persist.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub updated: Vec<Transaction>,
    pub errors: Vec<String>,
}

/// Sweep unassigned transactions onto a vendor by name similarity.
///
/// Candidates are unverified transactions with no known vendor. Each raw
/// description is scored against the target vendor's name, so a vendor
/// buried anywhere in a noisy description still matches by containment. A
/// score strictly above the reassign threshold assigns the vendor and moves
/// the transaction into `Suggested` carrying the vendor's classification,
/// with the score as confidence. Per-transaction update failures are
/// isolated.
pub async fn find_similar_vendor_transactions(
    txns: &dyn TransactionStore,
    vendors: &dyn VendorStore,
    config: &ResolvedConfig,
    vendor_name: &str,
) -> Result<MatchOutcome> {
    let vendor = vendors
        .get_vendor(vendor_name)
        .await?
        .with_context(|| format!("Vendor not found: {vendor_name}"))?;

    let candidates: Vec<_> = txns
        .list_transactions()
        .await?
        .into_iter()
        .filter(|tx| !tx.is_verified() && tx.known_vendor().is_none())
        .collect();

    let mut outcome = MatchOutcome::default();
    for mut tx in candidates {
        let score = similarity(&tx.description, &vendor.name, config.matching.containment_score);
        if score <= config.matching.reassign_threshold {
            continue;
        }

        tx.vendor = Some(vendor.name.clone());
        tx.verification = Verification::Suggested {
            category: Some(vendor.category.clone()),
            kind: Some(vendor.kind),
            statement_type: Some(vendor.statement_type),
            confidence: score,
        };
        match txns.update_transaction(&tx).await {
            Ok(()) => outcome.updated.push(tx),
            Err(e) => outcome.errors.push(format!("{}: {e:#}", tx.id)),
        }
    }

    info!(
        vendor = vendor_name,
        matched = outcome.updated.len(),
        failed = outcome.errors.len(),
        "matched similar transactions"
    );
    Ok(outcome)
}
