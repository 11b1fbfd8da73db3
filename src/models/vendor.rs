use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{StatementType, TransactionType};

/// A named payee/payer categorization template.
///
/// Every verification of a transaction naming this vendor bumps
/// `occurrences`; once the count reaches the configured threshold the vendor
/// is auto-verified and its classification is trusted for bulk reassignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub statement_type: StatementType,
    #[serde(default)]
    pub occurrences: u32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl Vendor {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionType,
        statement_type: StatementType,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            kind,
            statement_type,
            occurrences: 0,
            verified: false,
            last_used: None,
        }
    }

    /// Record `count` further uses of this vendor in one step.
    ///
    /// Occurrences only ever increase; verification flips on once the count
    /// reaches `auto_verify_at` and is never cleared here (explicit human
    /// rejection goes through `set_verified`).
    pub fn record_uses(&mut self, count: u32, auto_verify_at: u32, now: DateTime<Utc>) {
        self.occurrences = self.occurrences.saturating_add(count);
        self.last_used = Some(now);
        if self.occurrences >= auto_verify_at {
            self.verified = true;
        }
    }

    /// Explicit human approval or rejection.
    pub fn set_verified(&mut self, approved: bool) {
        self.verified = approved;
    }
}
