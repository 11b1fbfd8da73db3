use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::ResolvedConfig;
use crate::models::{Id, StatementType, TransactionType, Vendor, Verification};
use crate::storage::{TransactionStore, VendorStore};

use super::batch::BatchReport;

/// Verify one transaction with a human-confirmed classification.
///
/// This is the only path into the `Verified` state. The transaction's vendor
/// (if known) gets its occurrence count bumped, creating the vendor record
/// from this classification on first use.
#[allow(clippy::too_many_arguments)]
pub async fn verify_transaction(
    txns: &dyn TransactionStore,
    vendors: &dyn VendorStore,
    clock: &dyn Clock,
    config: &ResolvedConfig,
    id: &Id,
    category: &str,
    kind: TransactionType,
    statement_type: Option<StatementType>,
) -> Result<()> {
    let mut tx = txns
        .get_transaction(id)
        .await?
        .with_context(|| format!("Transaction not found: {id}"))?;

    let statement_type = statement_type.unwrap_or_else(|| kind.default_statement_type());
    tx.verification = Verification::verified(category, kind, statement_type);
    txns.update_transaction(&tx).await?;

    if let Some(vendor_name) = tx.known_vendor() {
        record_vendor_uses(
            vendors,
            clock,
            config,
            vendor_name,
            category,
            kind,
            statement_type,
            1,
        )
        .await?;
    }

    debug!(id = %id, category, "verified transaction");
    Ok(())
}

/// Verify every unverified transaction assigned to a vendor.
///
/// The classification defaults to the vendor's own record; callers can
/// override any part of it. Per-transaction failures are isolated and
/// reported; the vendor's occurrence count is bumped once by the number of
/// successful updates, so the auto-verify threshold is evaluated against
/// the whole batch.
#[allow(clippy::too_many_arguments)]
pub async fn batch_verify_vendor_transactions(
    txns: &dyn TransactionStore,
    vendors: &dyn VendorStore,
    clock: &dyn Clock,
    config: &ResolvedConfig,
    vendor_name: &str,
    category: Option<&str>,
    kind: Option<TransactionType>,
    statement_type: Option<StatementType>,
) -> Result<BatchReport> {
    let vendor = vendors
        .get_vendor(vendor_name)
        .await?
        .with_context(|| format!("Vendor not found: {vendor_name}"))?;

    let category = category.unwrap_or(&vendor.category).to_string();
    let kind = kind.unwrap_or(vendor.kind);
    let statement_type = statement_type.unwrap_or(vendor.statement_type);

    let pending: Vec<_> = txns
        .list_transactions()
        .await?
        .into_iter()
        .filter(|tx| !tx.is_verified() && tx.known_vendor() == Some(vendor_name))
        .collect();

    let mut report = BatchReport::default();
    for mut tx in pending {
        tx.verification = Verification::verified(category.clone(), kind, statement_type);
        match txns.update_transaction(&tx).await {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                report.failed += 1;
                report.errors.push(format!("{}: {e:#}", tx.id));
            }
        }
    }

    if report.succeeded > 0 {
        record_vendor_uses(
            vendors,
            clock,
            config,
            vendor_name,
            &category,
            kind,
            statement_type,
            report.succeeded as u32,
        )
        .await?;
    }

    info!(
        vendor = vendor_name,
        verified = report.succeeded,
        failed = report.failed,
        "batch-verified vendor transactions"
    );
    Ok(report)
}

/// Explicitly approve or reject a vendor's classification.
pub async fn verify_vendor(vendors: &dyn VendorStore, name: &str, approved: bool) -> Result<()> {
    let mut vendor = vendors
        .get_vendor(name)
        .await?
        .with_context(|| format!("Vendor not found: {name}"))?;
    vendor.set_verified(approved);
    vendors.save_vendor(&vendor).await
}

#[allow(clippy::too_many_arguments)]
async fn record_vendor_uses(
    vendors: &dyn VendorStore,
    clock: &dyn Clock,
    config: &ResolvedConfig,
    name: &str,
    category: &str,
    kind: TransactionType,
    statement_type: StatementType,
    count: u32,
) -> Result<()> {
    let mut vendor = match vendors.get_vendor(name).await? {
        Some(vendor) => vendor,
        None => Vendor::new(name, category, kind, statement_type),
    };
    vendor.record_uses(count, config.vendors.auto_verify_occurrences, clock.now());
    vendors.save_vendor(&vendor).await
}
