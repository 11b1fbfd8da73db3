use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::Transaction;

/// A likely duplicate inside one uploaded file.
///
/// Duplicates are advisory: they are surfaced for human review and never
/// silently dropped or imported.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateRow {
    /// 1-based position among the file's data rows.
    pub row: usize,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

/// Flag repeated rows within one upload.
///
/// Rows are keyed by (date, description, amount) in arrival order; the second
/// and later occurrence of an identical key is reported.
pub fn within_file(rows: &[Transaction]) -> Vec<DuplicateRow> {
    let mut seen: HashSet<(NaiveDate, &str, Decimal)> = HashSet::new();
    let mut duplicates = Vec::new();

    for (index, tx) in rows.iter().enumerate() {
        let key = (tx.date, tx.description.as_str(), tx.amount);
        if !seen.insert(key) {
            duplicates.push(DuplicateRow {
                row: index + 1,
                date: tx.date,
                description: tx.description.clone(),
                amount: tx.amount,
            });
        }
    }

    duplicates
}

/// Flag candidates that already appear in the accepted transaction set.
///
/// A candidate matches when some existing transaction has the same date, the
/// exact same description, and an amount within `amount_epsilon`.
/// Description comparison is deliberately exact; see DESIGN.md.
pub fn against_existing<'a>(
    existing: &[Transaction],
    candidates: &'a [Transaction],
    amount_epsilon: Decimal,
) -> Vec<&'a Transaction> {
    candidates
        .iter()
        .filter(|candidate| {
            existing.iter().any(|tx| {
                tx.date == candidate.date
                    && tx.description == candidate.description
                    && (tx.amount - candidate.amount).abs() < amount_epsilon
            })
        })
        .collect()
}
