use rust_decimal::Decimal;

use crate::models::{FinancialSummary, Transaction, TransactionType};

/// Aggregate verified transactions into a financial summary.
///
/// Only verified transactions count toward the type totals; provisional
/// classifications are guesses and would distort the report. The cash
/// balance is different: it is the latest stamped running balance across
/// the whole set, since the bank's money moves whether or not the rows are
/// verified yet.
pub fn calculate_financial_summary(transactions: &[Transaction]) -> FinancialSummary {
    let mut summary = FinancialSummary::default();

    for tx in transactions.iter().filter(|tx| tx.is_verified()) {
        let amount = tx.amount.abs();
        match tx.kind() {
            Some(TransactionType::Income) => summary.total_income += amount,
            Some(TransactionType::Expense) => summary.total_expenses += amount,
            Some(TransactionType::Asset) => summary.total_assets += amount,
            Some(TransactionType::Liability) => summary.total_liabilities += amount,
            Some(TransactionType::Equity) => summary.total_equity += amount,
            // Unreachable for verified rows, which always carry a type.
            None => {}
        }
    }

    summary.net_profit = summary.total_income - summary.total_expenses;
    summary.cash_balance = latest_balance(transactions).unwrap_or(Decimal::ZERO);
    summary
}

/// Stamped balance of the latest-dated transaction that has one.
fn latest_balance(transactions: &[Transaction]) -> Option<Decimal> {
    transactions
        .iter()
        .filter(|tx| tx.balance.is_some())
        .max_by_key(|tx| tx.date)
        .and_then(|tx| tx.balance)
}
