use std::str::FromStr;

use tracing::debug;

use crate::models::{
    IdGenerator, Transaction, TransactionType, UuidIdGenerator, Verification,
};

use super::fields::{parse_amount, parse_date};
use super::schema::{header_fields, ColumnMap, StructuralError};

/// Result of parsing a statement export: every successfully parsed row plus
/// one warning per skipped row. Per-row problems never fail the whole parse.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
}

/// Parse comma-delimited statement text into candidate transactions.
pub fn parse(input: &str) -> Result<ParseOutcome, StructuralError> {
    parse_with_generator(&UuidIdGenerator, input)
}

/// Like [`parse`] but with caller-supplied id generation, for deterministic
/// tests.
///
/// The header row is resolved to a column map first; a missing required
/// column is a structural error and nothing is parsed. Data rows are then
/// split on the raw delimiter — quoted fields containing commas are not part
/// of the supported wire format. Each malformed row is skipped with a
/// warning naming its 1-based data-row number.
pub fn parse_with_generator(
    ids: &dyn IdGenerator,
    input: &str,
) -> Result<ParseOutcome, StructuralError> {
    let mut outcome = ParseOutcome::default();

    let headers = match header_fields(input) {
        Some(headers) => headers,
        // An empty upload yields zero transactions and zero warnings.
        None => return Ok(outcome),
    };
    let columns = ColumnMap::resolve(&headers)?;

    for (row_number, line) in input
        .trim_start_matches('\u{feff}')
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| (i + 1, line))
    {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < columns.required_width() {
            outcome
                .warnings
                .push(format!("Row {row_number}: invalid column count"));
            continue;
        }

        let Some(date) = parse_date(fields[columns.date]) else {
            outcome.warnings.push(format!(
                "Row {row_number}: invalid date {:?}",
                fields[columns.date]
            ));
            continue;
        };

        let Some(amount) = parse_amount(fields[columns.amount]) else {
            outcome.warnings.push(format!(
                "Row {row_number}: invalid amount {:?}",
                fields[columns.amount]
            ));
            continue;
        };

        // An explicit type column wins; otherwise infer from the sign.
        let kind = columns
            .kind
            .and_then(|idx| fields.get(idx))
            .and_then(|value| TransactionType::from_str(value).ok())
            .unwrap_or_else(|| TransactionType::from_amount_sign(amount));

        let mut tx = Transaction::new_with_generator(
            ids,
            date,
            fields[columns.description].to_string(),
            amount,
        )
        .with_verification(Verification::provisional(Some(kind)));

        if let Some(balance) = columns
            .balance
            .and_then(|idx| fields.get(idx))
            .and_then(|value| parse_amount(value))
        {
            tx.balance = Some(balance);
        }

        outcome.transactions.push(tx);
    }

    debug!(
        parsed = outcome.transactions.len(),
        skipped = outcome.warnings.len(),
        "parsed statement export"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixedIdGenerator;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn parse_fixed(input: &str) -> ParseOutcome {
        let ids = FixedIdGenerator::numbered("tx", 16);
        parse_with_generator(&ids, input).unwrap()
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        let outcome = parse("").unwrap();
        assert!(outcome.transactions.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn header_only_input_parses_to_nothing() {
        let outcome = parse("Date,Description,Amount\n").unwrap();
        assert!(outcome.transactions.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn missing_required_column_is_structural() {
        let err = parse("Date,Amount\n2024-01-01,5\n").unwrap_err();
        assert_eq!(err, StructuralError::MissingColumns(vec!["description"]));
    }

    #[test]
    fn parses_rows_and_infers_type_from_sign() {
        let outcome = parse_fixed(
            "Date,Description,Amount\n\
             2024-01-01,Coffee Shop,-4.50\n\
             2024-01-02,Paycheck,2000.00\n",
        );
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.transactions.len(), 2);

        let coffee = &outcome.transactions[0];
        assert_eq!(coffee.id.as_str(), "tx-1");
        assert_eq!(coffee.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(coffee.description, "Coffee Shop");
        assert_eq!(coffee.amount, Decimal::from_str("-4.50").unwrap());
        assert_eq!(coffee.kind(), Some(TransactionType::Expense));
        assert!(!coffee.is_verified());

        assert_eq!(
            outcome.transactions[1].kind(),
            Some(TransactionType::Income)
        );
    }

    #[test]
    fn explicit_type_column_overrides_sign_inference() {
        let outcome = parse_fixed(
            "Date,Description,Amount,Type\n\
             2024-01-03,Loan Repayment,-250.00,liability\n",
        );
        assert_eq!(
            outcome.transactions[0].kind(),
            Some(TransactionType::Liability)
        );
    }

    #[test]
    fn unknown_type_value_falls_back_to_sign() {
        let outcome = parse_fixed(
            "Date,Description,Amount,Type\n\
             2024-01-03,Misc,-9.00,widget\n",
        );
        assert_eq!(
            outcome.transactions[0].kind(),
            Some(TransactionType::Expense)
        );
    }

    #[test]
    fn short_rows_are_skipped_with_row_numbered_warning() {
        let outcome = parse_fixed(
            "Date,Description,Amount\n\
             2024-01-01,Coffee Shop,-4.50\n\
             2024-01-02,Paycheck\n\
             2024-01-03,Rent,-900\n",
        );
        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.warnings, vec!["Row 2: invalid column count"]);
    }

    #[test]
    fn bad_dates_and_amounts_are_soft_failures() {
        let outcome = parse_fixed(
            "Date,Description,Amount\n\
             soon,Coffee Shop,-4.50\n\
             2024-01-02,Paycheck,lots\n\
             2024-01-03,Rent,-900\n",
        );
        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[0].starts_with("Row 1: invalid date"));
        assert!(outcome.warnings[1].starts_with("Row 2: invalid amount"));
    }

    #[test]
    fn balance_column_is_carried_through() {
        let outcome = parse_fixed(
            "Date,Description,Amount,Balance\n\
             2024-01-01,Coffee Shop,-4.50,995.50\n",
        );
        assert_eq!(
            outcome.transactions[0].balance,
            Some(Decimal::from_str("995.50").unwrap())
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        let outcome = parse_fixed(
            "Date,Description,Amount\n\
             \n\
             2024-01-01,Coffee Shop,-4.50\n\
             \n",
        );
        assert_eq!(outcome.transactions.len(), 1);
        assert!(outcome.warnings.is_empty());
    }
}
