use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use ledgerbook::app::find_similar_vendor_transactions;
use ledgerbook::config::ResolvedConfig;
use ledgerbook::models::{StatementType, Transaction, TransactionType, Vendor};
use ledgerbook::storage::{MemoryStore, TransactionStore, VendorStore};
use rust_decimal::Decimal;

fn config() -> ResolvedConfig {
    ResolvedConfig::load_or_default(Path::new("/nonexistent/ledgerbook.toml")).unwrap()
}

fn tx(description: &str) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        description,
        Decimal::from_str("-4.50").unwrap(),
    )
}

#[tokio::test]
async fn noisy_pos_descriptions_match_their_vendor() -> Result<()> {
    let store = MemoryStore::new();
    store
        .save_vendor(&Vendor::new(
            "Starbucks",
            "Meals & Entertainment",
            TransactionType::Expense,
            StatementType::ProfitLoss,
        ))
        .await?;

    store
        .insert_transactions(&[
            tx("POS PURCHASE STARBUCKS #4521 REF: 99812345"),
            tx("STARBUCKS DOWNTOWN"),
            tx("ELECTRIC UTILITY CO PAYMENT"),
        ])
        .await?;

    let outcome = find_similar_vendor_transactions(&store, &store, &config(), "Starbucks").await?;
    assert_eq!(outcome.updated.len(), 2);
    assert!(outcome.errors.is_empty());

    let all = store.list_transactions().await?;
    for description in ["POS PURCHASE STARBUCKS #4521 REF: 99812345", "STARBUCKS DOWNTOWN"] {
        let matched = all.iter().find(|t| t.description == description).unwrap();
        assert_eq!(matched.vendor.as_deref(), Some("Starbucks"), "{description}");
        assert_eq!(
            matched.verification.category(),
            Some("Meals & Entertainment")
        );
        assert!(matched.verification.confidence().unwrap() > 0.5);
        assert!(!matched.is_verified());
    }

    let utility = all
        .iter()
        .find(|t| t.description.starts_with("ELECTRIC"))
        .unwrap();
    assert!(utility.vendor.is_none());

    Ok(())
}

#[tokio::test]
async fn raising_the_threshold_suppresses_weak_matches() -> Result<()> {
    let store = MemoryStore::new();
    store
        .save_vendor(&Vendor::new(
            "Starbucks",
            "Meals & Entertainment",
            TransactionType::Expense,
            StatementType::ProfitLoss,
        ))
        .await?;
    // Containment match on the raw description, scoring 0.9.
    store
        .insert_transactions(&[tx("STARBUCKS DOWNTOWN")])
        .await?;

    let mut strict = config();
    strict.matching.reassign_threshold = 0.95;
    let outcome = find_similar_vendor_transactions(&store, &store, &strict, "Starbucks").await?;
    assert!(outcome.updated.is_empty());

    Ok(())
}
