//! Pure ledger math: running balances, reconciliation and summary totals.

mod balance;
mod reconcile;
mod summary;

pub use balance::calculate_running_balance;
pub use reconcile::{is_balance_reconciled, reconcile, Reconciliation};
pub use summary::calculate_financial_summary;
