mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use anyhow::Result;

use crate::models::{Id, Transaction, Vendor};

/// Storage trait for the transaction ledger.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// All transactions, ordered by date ascending.
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;
    /// Transactions imported under one bank connection, ordered by date.
    async fn transactions_for_connection(&self, connection_id: &Id) -> Result<Vec<Transaction>>;
    async fn get_transaction(&self, id: &Id) -> Result<Option<Transaction>>;
    async fn insert_transactions(&self, txns: &[Transaction]) -> Result<()>;
    /// Replace the stored transaction with the same id.
    async fn update_transaction(&self, tx: &Transaction) -> Result<()>;
    async fn delete_transaction(&self, id: &Id) -> Result<()>;
}

/// Storage trait for the vendor directory, keyed by vendor name.
#[async_trait::async_trait]
pub trait VendorStore: Send + Sync {
    async fn list_vendors(&self) -> Result<Vec<Vendor>>;
    async fn get_vendor(&self, name: &str) -> Result<Option<Vendor>>;
    /// Insert or overwrite the vendor with the same name.
    async fn save_vendor(&self, vendor: &Vendor) -> Result<()>;
    async fn delete_vendor(&self, name: &str) -> Result<()>;
}
