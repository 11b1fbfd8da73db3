use anyhow::Result;

use crate::ledger::calculate_financial_summary;
use crate::models::FinancialSummary;
use crate::storage::TransactionStore;

/// Summarize the whole ledger.
pub async fn financial_summary(txns: &dyn TransactionStore) -> Result<FinancialSummary> {
    let all = txns.list_transactions().await?;
    Ok(calculate_financial_summary(&all))
}
