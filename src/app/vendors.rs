use anyhow::{bail, Context, Result};
use tracing::info;

use crate::models::{StatementType, TransactionType, Vendor, UNKNOWN_VENDOR};
use crate::storage::{TransactionStore, VendorStore};
use crate::vendors::VendorExtractor;

/// Create a vendor by hand, ahead of any transaction naming it.
pub async fn add_vendor(
    vendors: &dyn VendorStore,
    name: &str,
    category: &str,
    kind: TransactionType,
    statement_type: Option<StatementType>,
) -> Result<Vendor> {
    let name = name.trim();
    if name.is_empty() || name == UNKNOWN_VENDOR {
        bail!("Invalid vendor name: {name:?}");
    }
    if vendors.get_vendor(name).await?.is_some() {
        bail!("Vendor already exists: {name}");
    }

    let vendor = Vendor::new(
        name,
        category,
        kind,
        statement_type.unwrap_or_else(|| kind.default_statement_type()),
    );
    vendors.save_vendor(&vendor).await?;
    Ok(vendor)
}

/// Change a vendor's classification.
///
/// Only the fields given are touched; occurrences, the verified flag and
/// already-verified transactions are left as they are.
pub async fn update_vendor(
    vendors: &dyn VendorStore,
    name: &str,
    category: Option<&str>,
    kind: Option<TransactionType>,
    statement_type: Option<StatementType>,
) -> Result<Vendor> {
    let mut vendor = vendors
        .get_vendor(name)
        .await?
        .with_context(|| format!("Vendor not found: {name}"))?;

    if let Some(category) = category {
        vendor.category = category.to_string();
    }
    if let Some(kind) = kind {
        vendor.kind = kind;
    }
    if let Some(statement_type) = statement_type {
        vendor.statement_type = statement_type;
    }

    vendors.save_vendor(&vendor).await?;
    Ok(vendor)
}

/// List vendors with how many transactions reference each, busiest first.
pub async fn list_vendors_with_counts(
    txns: &dyn TransactionStore,
    vendors: &dyn VendorStore,
) -> Result<Vec<(Vendor, usize)>> {
    let all = txns.list_transactions().await?;
    let mut listed: Vec<(Vendor, usize)> = vendors
        .list_vendors()
        .await?
        .into_iter()
        .map(|vendor| {
            let count = all
                .iter()
                .filter(|tx| tx.vendor.as_deref() == Some(vendor.name.as_str()))
                .count();
            (vendor, count)
        })
        .collect();
    listed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name.cmp(&b.0.name)));
    Ok(listed)
}

/// Delete a vendor and detach its transactions.
///
/// Every transaction assigned to the vendor falls back to the "Unknown"
/// sentinel with its vendor-verified flag cleared; verification state is
/// untouched, since the classification may still be right.
pub async fn delete_vendor(
    txns: &dyn TransactionStore,
    vendors: &dyn VendorStore,
    name: &str,
) -> Result<usize> {
    vendors
        .get_vendor(name)
        .await?
        .with_context(|| format!("Vendor not found: {name}"))?;

    let assigned: Vec<_> = txns
        .list_transactions()
        .await?
        .into_iter()
        .filter(|tx| tx.vendor.as_deref() == Some(name))
        .collect();

    let detached = assigned.len();
    for mut tx in assigned {
        tx.vendor = Some(UNKNOWN_VENDOR.to_string());
        tx.vendor_verified = false;
        txns.update_transaction(&tx).await?;
    }

    vendors.delete_vendor(name).await?;
    info!(vendor = name, detached, "deleted vendor");
    Ok(detached)
}

/// Fill in vendor names for transactions that have none.
///
/// Runs the heuristic extractor over each transaction whose vendor is unset
/// or the "Unknown" sentinel. Returns the number of transactions that gained
/// a real vendor name.
pub async fn extract_missing_vendors(txns: &dyn TransactionStore) -> Result<usize> {
    let extractor = VendorExtractor::new();
    let mut updated = 0;

    for mut tx in txns.list_transactions().await? {
        if tx.known_vendor().is_some() {
            continue;
        }
        let extracted = extractor.extract(&tx.description);
        if extracted == UNKNOWN_VENDOR {
            continue;
        }
        tx.vendor = Some(extracted);
        txns.update_transaction(&tx).await?;
        updated += 1;
    }

    info!(updated, "extracted missing vendors");
    Ok(updated)
}
