use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived report totals over the verified transaction set.
///
/// Never persisted; recomputed in full whenever the transaction set changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    /// `total_income - total_expenses`.
    pub net_profit: Decimal,
    /// Running balance of the most-recently-dated transaction that has one.
    pub cash_balance: Decimal,
}
