use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionType};

/// Stamp a running balance onto every transaction.
///
/// Transactions are ordered by date (stable, so same-day rows keep their
/// input order) and walked forward from `initial_balance`; every row moves
/// the balance. The stamped value is rounded to cents; the accumulator
/// itself is not, so rounding never compounds across rows.
pub fn calculate_running_balance(
    mut transactions: Vec<Transaction>,
    initial_balance: Decimal,
) -> Vec<Transaction> {
    transactions.sort_by_key(|tx| tx.date);

    let mut running = initial_balance;
    for tx in &mut transactions {
        running += balance_delta(tx);
        tx.balance = Some(running.round_dp(2));
    }

    transactions
}

/// How one transaction moves the account balance.
///
/// Income and liability rows add money to the account, expense and asset
/// rows remove it, regardless of the sign the bank exported. Equity and
/// untyped rows fall back to the signed amount.
fn balance_delta(tx: &Transaction) -> Decimal {
    match tx.kind() {
        Some(TransactionType::Income) | Some(TransactionType::Liability) => tx.amount.abs(),
        Some(TransactionType::Expense) | Some(TransactionType::Asset) => -tx.amount.abs(),
        Some(TransactionType::Equity) | None => tx.amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verification;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn tx(date: &str, description: &str, amount: &str, kind: TransactionType) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description,
            Decimal::from_str(amount).unwrap(),
        )
        .with_verification(Verification::provisional(Some(kind)))
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn walks_forward_from_the_initial_balance() {
        let txns = vec![
            tx("2024-01-01", "Coffee Shop", "-4.50", TransactionType::Expense),
            tx("2024-01-02", "Paycheck", "2000.00", TransactionType::Income),
        ];
        let stamped = calculate_running_balance(txns, dec("100.00"));
        assert_eq!(stamped[0].balance, Some(dec("95.50")));
        assert_eq!(stamped[1].balance, Some(dec("2095.50")));
    }

    #[test]
    fn orders_by_date_before_stamping() {
        let txns = vec![
            tx("2024-01-05", "Rent", "-900.00", TransactionType::Expense),
            tx("2024-01-01", "Paycheck", "2000.00", TransactionType::Income),
        ];
        let stamped = calculate_running_balance(txns, Decimal::ZERO);
        assert_eq!(stamped[0].description, "Paycheck");
        assert_eq!(stamped[0].balance, Some(dec("2000.00")));
        assert_eq!(stamped[1].balance, Some(dec("1100.00")));
    }

    #[test]
    fn income_adds_even_when_exported_negative() {
        let txns = vec![tx("2024-01-01", "Refund", "-25.00", TransactionType::Income)];
        let stamped = calculate_running_balance(txns, Decimal::ZERO);
        assert_eq!(stamped[0].balance, Some(dec("25.00")));
    }

    #[test]
    fn liability_adds_and_asset_subtracts() {
        let txns = vec![
            tx("2024-01-01", "Loan Drawdown", "5000.00", TransactionType::Liability),
            tx("2024-01-02", "Equipment", "1200.00", TransactionType::Asset),
        ];
        let stamped = calculate_running_balance(txns, Decimal::ZERO);
        assert_eq!(stamped[0].balance, Some(dec("5000.00")));
        assert_eq!(stamped[1].balance, Some(dec("3800.00")));
    }

    #[test]
    fn untyped_rows_use_the_signed_amount() {
        let untyped = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Mystery",
            dec("-30.00"),
        );
        let stamped = calculate_running_balance(vec![untyped], dec("100.00"));
        assert_eq!(stamped[0].balance, Some(dec("70.00")));
    }

    #[test]
    fn every_row_moves_the_balance_by_its_delta() {
        let txns = vec![
            tx("2023-12-30", "Old Charge", "-50.00", TransactionType::Expense),
            tx("2024-01-02", "Coffee Shop", "-4.50", TransactionType::Expense),
        ];
        let stamped = calculate_running_balance(txns, dec("100.00"));
        assert_eq!(stamped[0].balance, Some(dec("50.00")));
        assert_eq!(stamped[1].balance, Some(dec("45.50")));
    }

    #[test]
    fn recalculating_is_idempotent() {
        let txns = vec![
            tx("2024-01-01", "Coffee Shop", "-4.50", TransactionType::Expense),
            tx("2024-01-02", "Paycheck", "2000.00", TransactionType::Income),
        ];
        let once = calculate_running_balance(txns, dec("100.00"));
        let twice = calculate_running_balance(once.clone(), dec("100.00"));
        assert_eq!(once, twice);
    }

    #[test]
    fn stamped_balances_are_rounded_but_the_accumulator_is_not() {
        let txns = vec![
            tx("2024-01-01", "Split A", "-0.005", TransactionType::Expense),
            tx("2024-01-02", "Split B", "-0.005", TransactionType::Expense),
        ];
        let stamped = calculate_running_balance(txns, dec("1.00"));
        // Each stamp rounds for display, but the second row reflects the
        // exact accumulated 0.99.
        assert_eq!(stamped[0].balance, Some(dec("1.00")));
        assert_eq!(stamped[1].balance, Some(dec("0.99")));
    }
}
