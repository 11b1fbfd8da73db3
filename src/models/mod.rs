mod id;
mod summary;
mod transaction;
mod vendor;

pub use id::{FixedIdGenerator, Id, IdGenerator, UuidIdGenerator};
pub use summary::FinancialSummary;
pub use transaction::{
    StatementType, Transaction, TransactionType, UnknownTypeError, Verification, UNKNOWN_VENDOR,
};
pub use vendor::Vendor;
