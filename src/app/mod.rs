//! Application operations composing storage, ingestion, ledger math and the
//! categorizer boundary.

mod analyze;
mod batch;
mod import;
mod matcher;
mod reconcile;
mod report;
mod vendors;
mod verify;

pub use analyze::{analyze_transactions, AnalyzeReport};
pub use batch::{run_batch, BatchReport};
pub use import::{import_csv, restamp_balances, ImportOptions, ImportReport};
pub use matcher::{find_similar_vendor_transactions, MatchOutcome};
pub use reconcile::reconcile_account_balance;
pub use report::financial_summary;
pub use vendors::{
    add_vendor, delete_vendor, extract_missing_vendors, list_vendors_with_counts, update_vendor,
};
pub use verify::{
    batch_verify_vendor_transactions, verify_transaction, verify_vendor,
};
