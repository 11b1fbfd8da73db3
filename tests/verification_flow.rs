use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use ledgerbook::app::{batch_verify_vendor_transactions, verify_transaction};
use ledgerbook::clock::FixedClock;
use ledgerbook::config::ResolvedConfig;
use ledgerbook::models::{
    StatementType, Transaction, TransactionType, Vendor,
};
use ledgerbook::storage::{MemoryStore, TransactionStore, VendorStore};
use rust_decimal::Decimal;

fn config() -> ResolvedConfig {
    ResolvedConfig::load_or_default(Path::new("/nonexistent/ledgerbook.toml")).unwrap()
}

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

fn coffee(n: u32) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap(),
        format!("Coffee {n}"),
        Decimal::from_str("-4.50").unwrap(),
    )
    .with_vendor("Starbucks")
}

#[tokio::test]
async fn five_verifications_auto_verify_the_vendor() -> Result<()> {
    let store = MemoryStore::new();
    let txns: Vec<Transaction> = (1..=5).map(coffee).collect();
    store.insert_transactions(&txns).await?;

    for (i, tx) in txns.iter().enumerate() {
        verify_transaction(
            &store,
            &store,
            &clock(),
            &config(),
            &tx.id,
            "Meals & Entertainment",
            TransactionType::Expense,
            None,
        )
        .await?;

        let vendor = store.get_vendor("Starbucks").await?.unwrap();
        assert_eq!(vendor.occurrences, (i + 1) as u32);
        // Verified only once the fifth verification lands.
        assert_eq!(vendor.verified, i + 1 >= 5);
    }

    let all = store.list_transactions().await?;
    assert!(all.iter().all(|tx| tx.is_verified()));

    Ok(())
}

#[tokio::test]
async fn batch_verify_counts_the_whole_batch_toward_auto_verification() -> Result<()> {
    let store = MemoryStore::new();
    store
        .save_vendor(&Vendor::new(
            "Starbucks",
            "Meals & Entertainment",
            TransactionType::Expense,
            StatementType::ProfitLoss,
        ))
        .await?;

    let txns: Vec<Transaction> = (1..=6).map(coffee).collect();
    store.insert_transactions(&txns).await?;

    let report = batch_verify_vendor_transactions(
        &store,
        &store,
        &clock(),
        &config(),
        "Starbucks",
        None,
        None,
        None,
    )
    .await?;
    assert_eq!(report.succeeded, 6);
    assert_eq!(report.failed, 0);

    let vendor = store.get_vendor("Starbucks").await?.unwrap();
    assert_eq!(vendor.occurrences, 6);
    assert!(vendor.verified);

    let all = store.list_transactions().await?;
    assert!(all.iter().all(|tx| {
        tx.is_verified() && tx.verification.category() == Some("Meals & Entertainment")
    }));

    Ok(())
}

#[tokio::test]
async fn verification_fills_the_default_statement_type() -> Result<()> {
    let store = MemoryStore::new();
    let loan = Transaction::new(
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        "Loan Drawdown",
        Decimal::from_str("5000.00").unwrap(),
    );
    store.insert_transactions(&[loan.clone()]).await?;

    verify_transaction(
        &store,
        &store,
        &clock(),
        &config(),
        &loan.id,
        "Loans",
        TransactionType::Liability,
        None,
    )
    .await?;

    let verified = store.get_transaction(&loan.id).await?.unwrap();
    assert_eq!(
        verified.verification.statement_type(),
        Some(StatementType::BalanceSheet)
    );

    Ok(())
}
