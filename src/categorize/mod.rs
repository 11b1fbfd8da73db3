//! Advisory transaction categorization.
//!
//! Suggestions never verify a transaction; they move it into the
//! `Suggested` state at most, and a human decision is still required to
//! reach `Verified`.

mod http;

pub use http::HttpCategorizer;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{StatementType, Transaction, TransactionType, Verification};

/// What the classifier gets to see about one transaction.
#[derive(Debug, Clone)]
pub struct CategorizationRequest {
    pub description: String,
    pub amount: Decimal,
    /// Categories already in use, so suggestions converge on the existing
    /// chart of accounts.
    pub existing_categories: Vec<String>,
    /// Free-text description of the business, for context.
    pub business_context: Option<String>,
}

/// A classifier's advisory opinion about one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySuggestion {
    pub category: String,
    /// In [0, 1].
    pub confidence: f64,
    pub kind: Option<TransactionType>,
    pub statement_type: Option<StatementType>,
    pub vendor: Option<String>,
}

/// External classifier boundary.
#[async_trait::async_trait]
pub trait Categorizer: Send + Sync {
    async fn suggest(&self, request: &CategorizationRequest) -> Result<CategorySuggestion>;
}

/// Fold a suggestion into a transaction's verification state.
///
/// Verified transactions are left untouched: a human decision always
/// outranks the classifier. Above `overwrite_confidence` the suggestion
/// replaces any provisional classification; at or below it, it only fills
/// fields that are still empty. A suggested vendor is taken only when the
/// transaction has no known vendor. Returns whether anything changed.
pub fn apply_suggestion(
    tx: &mut Transaction,
    suggestion: &CategorySuggestion,
    overwrite_confidence: f64,
) -> bool {
    if tx.is_verified() {
        return false;
    }

    let current = tx.verification.clone();
    let overwrite = suggestion.confidence > overwrite_confidence;

    let category = if overwrite || current.category().is_none() {
        Some(suggestion.category.clone())
    } else {
        current.category().map(str::to_string)
    };
    let kind = if overwrite || current.kind().is_none() {
        suggestion.kind.or(current.kind())
    } else {
        current.kind()
    };
    let statement_type = if overwrite || current.statement_type().is_none() {
        suggestion
            .statement_type
            .or_else(|| kind.map(TransactionType::default_statement_type))
            .or(current.statement_type())
    } else {
        current.statement_type()
    };

    let next = Verification::Suggested {
        category,
        kind,
        statement_type,
        confidence: suggestion.confidence,
    };

    let mut changed = next != current;
    tx.verification = next;

    if tx.known_vendor().is_none() {
        if let Some(vendor) = &suggestion.vendor {
            if !vendor.is_empty() {
                tx.vendor = Some(vendor.clone());
                changed = true;
            }
        }
    }

    changed
}
