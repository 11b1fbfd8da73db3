use crate::models::Transaction;

const HEADER: &str = "Date,Description,Amount,Type,Category,Vendor,Balance";

/// Render transactions back to comma-delimited text.
///
/// Fields containing the delimiter, quotes or newlines are wrapped in double
/// quotes with internal quotes doubled for downstream spreadsheet tools. The
/// importer splits rows on the raw delimiter and does not honor quoting, so
/// only rows whose fields contain no delimiter re-import losslessly.
pub fn export_csv(transactions: &[Transaction]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for tx in transactions {
        let row = [
            tx.date.format("%Y-%m-%d").to_string(),
            escape(&tx.description),
            tx.amount.to_string(),
            tx.kind().map(|k| k.as_str().to_string()).unwrap_or_default(),
            escape(tx.verification.category().unwrap_or_default()),
            escape(tx.vendor.as_deref().unwrap_or_default()),
            tx.balance.map(|b| b.to_string()).unwrap_or_default(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
