/// Fatal problems with the shape of an uploaded CSV.
///
/// A structural error aborts the import before any row is parsed or
/// persisted; per-row problems are handled as warnings by the parser instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("CSV file is empty or has no header row")]
    Empty,
    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

/// Validated column-index mapping resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub kind: Option<usize>,
    pub balance: Option<usize>,
}

impl ColumnMap {
    /// Index of the last required column; rows shorter than this cannot be
    /// parsed.
    pub fn required_width(&self) -> usize {
        self.date.max(self.description).max(self.amount) + 1
    }

    /// Resolve header names to column indices.
    ///
    /// Matching is case-insensitive by substring, so "Transaction Date",
    /// "DESC" and "Amount (USD)" all resolve. Date, description and amount
    /// are required; type and balance columns are picked up when present.
    pub fn resolve(headers: &[String]) -> Result<Self, StructuralError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |needle: &str| lowered.iter().position(|h| h.contains(needle));

        match (find("date"), find("desc"), find("amount")) {
            (Some(date), Some(description), Some(amount)) => Ok(Self {
                date,
                description,
                amount,
                kind: find("type"),
                balance: find("balance"),
            }),
            (date, description, amount) => {
                let mut missing = Vec::new();
                if date.is_none() {
                    missing.push("date");
                }
                if description.is_none() {
                    missing.push("description");
                }
                if amount.is_none() {
                    missing.push("amount");
                }
                Err(StructuralError::MissingColumns(missing))
            }
        }
    }
}

/// Split the header line of a CSV into field names.
///
/// Returns `None` when the input has no non-empty first line.
pub fn header_fields(input: &str) -> Option<Vec<String>> {
    let first = input.trim_start_matches('\u{feff}').lines().next()?;
    if first.trim().is_empty() {
        return None;
    }
    Some(first.split(',').map(|f| f.trim().to_string()).collect())
}

/// Structural validation of an uploaded CSV: checks only the header row.
///
/// This is the hard gate before parsing; it never inspects data rows.
pub fn validate_structure(input: &str) -> Result<Vec<String>, StructuralError> {
    let headers = header_fields(input).ok_or(StructuralError::Empty)?;
    ColumnMap::resolve(&headers)?;
    Ok(headers)
}
