use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::ledger::{reconcile, Reconciliation};
use crate::models::Id;
use crate::storage::TransactionStore;

/// Compare a connection's calculated balance against the bank's figure.
///
/// The calculated side is the stamped balance of the connection's
/// latest-dated transaction; a connection with no stamped balances
/// reconciles against zero.
pub async fn reconcile_account_balance(
    txns: &dyn TransactionStore,
    config: &ResolvedConfig,
    connection_id: &Id,
    asserted: Decimal,
) -> Result<Reconciliation> {
    let transactions = txns.transactions_for_connection(connection_id).await?;

    let calculated = transactions
        .iter()
        .filter(|tx| tx.balance.is_some())
        .max_by_key(|tx| tx.date)
        .and_then(|tx| tx.balance)
        .unwrap_or(Decimal::ZERO);

    let result = reconcile(calculated, asserted, config.reconcile.tolerance);
    info!(
        connection = %connection_id,
        reconciled = result.reconciled,
        difference = %result.difference,
        "reconciled account balance"
    );
    Ok(result)
}
