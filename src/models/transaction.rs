use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, IdGenerator, UuidIdGenerator};

/// Sentinel vendor label for transactions whose payee could not be determined.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Accounting type of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
    Asset,
    Liability,
    Equity,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown transaction type: {0:?}")]
pub struct UnknownTypeError(pub String);

impl TransactionType {
    /// Infer a type from the amount sign: negative is an expense,
    /// everything else income.
    pub fn from_amount_sign(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            TransactionType::Expense
        } else {
            TransactionType::Income
        }
    }

    /// The report a transaction of this type lands on when not stated
    /// explicitly.
    pub fn default_statement_type(self) -> StatementType {
        match self {
            TransactionType::Income | TransactionType::Expense => StatementType::ProfitLoss,
            TransactionType::Asset | TransactionType::Liability | TransactionType::Equity => {
                StatementType::BalanceSheet
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Asset => "asset",
            TransactionType::Liability => "liability",
            TransactionType::Equity => "equity",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "asset" => Ok(TransactionType::Asset),
            "liability" => Ok(TransactionType::Liability),
            "equity" => Ok(TransactionType::Equity),
            other => Err(UnknownTypeError(other.to_string())),
        }
    }
}

/// Which report a transaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    ProfitLoss,
    BalanceSheet,
}

impl StatementType {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementType::ProfitLoss => "profit_loss",
            StatementType::BalanceSheet => "balance_sheet",
        }
    }
}

impl std::str::FromStr for StatementType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "profit_loss" => Ok(StatementType::ProfitLoss),
            "balance_sheet" => Ok(StatementType::BalanceSheet),
            other => Err(UnknownTypeError(other.to_string())),
        }
    }
}

/// Categorization lifecycle of a transaction.
///
/// Pre-verification states may carry provisional values (a sign-inferred
/// type, an advisory category from the classifier); only `Verified`
/// guarantees all three classification fields are present, which makes
/// "verified but uncategorized" unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Verification {
    Unverified {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<TransactionType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        statement_type: Option<StatementType>,
    },
    Suggested {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<TransactionType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        statement_type: Option<StatementType>,
        confidence: f64,
    },
    Verified {
        category: String,
        #[serde(rename = "type")]
        kind: TransactionType,
        statement_type: StatementType,
    },
}

impl Verification {
    pub fn unverified() -> Self {
        Verification::Unverified {
            category: None,
            kind: None,
            statement_type: None,
        }
    }

    /// Unverified with a provisional type (e.g. inferred from the amount sign).
    pub fn provisional(kind: Option<TransactionType>) -> Self {
        Verification::Unverified {
            category: None,
            kind,
            statement_type: None,
        }
    }

    pub fn verified(
        category: impl Into<String>,
        kind: TransactionType,
        statement_type: StatementType,
    ) -> Self {
        Verification::Verified {
            category: category.into(),
            kind,
            statement_type,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Verification::Unverified { category, .. }
            | Verification::Suggested { category, .. } => category.as_deref(),
            Verification::Verified { category, .. } => Some(category),
        }
    }

    pub fn kind(&self) -> Option<TransactionType> {
        match self {
            Verification::Unverified { kind, .. } | Verification::Suggested { kind, .. } => *kind,
            Verification::Verified { kind, .. } => Some(*kind),
        }
    }

    pub fn statement_type(&self) -> Option<StatementType> {
        match self {
            Verification::Unverified { statement_type, .. }
            | Verification::Suggested { statement_type, .. } => *statement_type,
            Verification::Verified { statement_type, .. } => Some(*statement_type),
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Verification::Suggested { confidence, .. } => Some(*confidence),
            _ => None,
        }
    }
}

impl Default for Verification {
    fn default() -> Self {
        Self::unverified()
    }
}

/// One bank-ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    pub date: NaiveDate,
    /// Raw description from the statement export.
    pub description: String,
    /// Signed amount: negative for debits, positive for credits.
    pub amount: Decimal,
    #[serde(default)]
    pub verification: Verification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default)]
    pub vendor_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_connection_id: Option<Id>,
    /// Running balance stamped by the balance calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Id>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Decimal) -> Self {
        Self::new_with_generator(&UuidIdGenerator, date, description, amount)
    }

    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: ids.new_id(),
            date,
            description: description.into(),
            amount,
            verification: Verification::unverified(),
            vendor: None,
            vendor_verified: false,
            bank_connection_id: None,
            balance: None,
            account_id: None,
        }
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_connection(mut self, connection_id: Id) -> Self {
        self.bank_connection_id = Some(connection_id);
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn is_verified(&self) -> bool {
        self.verification.is_verified()
    }

    pub fn kind(&self) -> Option<TransactionType> {
        self.verification.kind()
    }

    /// The vendor name, if one is set and it is not the "Unknown" sentinel.
    pub fn known_vendor(&self) -> Option<&str> {
        self.vendor
            .as_deref()
            .filter(|name| !name.is_empty() && *name != UNKNOWN_VENDOR)
    }
}
