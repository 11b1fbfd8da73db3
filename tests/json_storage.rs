use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use ledgerbook::models::{
    StatementType, Transaction, TransactionType, Vendor, Verification,
};
use ledgerbook::storage::{JsonFileStore, TransactionStore, VendorStore};
use rust_decimal::Decimal;
use tempfile::TempDir;

fn tx(date: &str, description: &str) -> Transaction {
    Transaction::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description,
        Decimal::from_str("-4.50").unwrap(),
    )
}

#[tokio::test]
async fn transactions_survive_a_store_reopen() -> Result<()> {
    let dir = TempDir::new()?;

    {
        let store = JsonFileStore::new(dir.path());
        store
            .insert_transactions(&[tx("2024-01-02", "b"), tx("2024-01-01", "a")])
            .await?;
    }

    let store = JsonFileStore::new(dir.path());
    let txns = store.list_transactions().await?;
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].description, "a");
    assert_eq!(txns[1].description, "b");

    Ok(())
}

#[tokio::test]
async fn update_rewrites_only_the_matching_transaction() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());

    let first = tx("2024-01-01", "first");
    let second = tx("2024-01-02", "second");
    store
        .insert_transactions(&[first.clone(), second.clone()])
        .await?;

    let mut verified = first.clone();
    verified.verification = Verification::verified(
        "Meals & Entertainment",
        TransactionType::Expense,
        StatementType::ProfitLoss,
    );
    store.update_transaction(&verified).await?;

    let reread = store.get_transaction(&first.id).await?.unwrap();
    assert!(reread.is_verified());
    let untouched = store.get_transaction(&second.id).await?.unwrap();
    assert_eq!(untouched, second);

    Ok(())
}

#[tokio::test]
async fn updating_a_missing_transaction_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());
    assert!(store.update_transaction(&tx("2024-01-01", "ghost")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_row_from_disk() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());

    let doomed = tx("2024-01-01", "doomed");
    store
        .insert_transactions(&[doomed.clone(), tx("2024-01-02", "kept")])
        .await?;
    store.delete_transaction(&doomed.id).await?;

    let store = JsonFileStore::new(dir.path());
    let txns = store.list_transactions().await?;
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].description, "kept");

    Ok(())
}

#[tokio::test]
async fn vendor_upsert_and_delete_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path());

    let mut vendor = Vendor::new(
        "Starbucks",
        "Meals & Entertainment",
        TransactionType::Expense,
        StatementType::ProfitLoss,
    );
    store.save_vendor(&vendor).await?;

    vendor.occurrences = 3;
    store.save_vendor(&vendor).await?;

    let reopened = JsonFileStore::new(dir.path());
    let vendors = reopened.list_vendors().await?;
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0].occurrences, 3);

    reopened.delete_vendor("Starbucks").await?;
    assert!(reopened.get_vendor("Starbucks").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn missing_files_read_as_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("never-written"));
    assert!(store.list_transactions().await?.is_empty());
    assert!(store.list_vendors().await?.is_empty());
    Ok(())
}
