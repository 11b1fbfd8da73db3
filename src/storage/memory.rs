use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::models::{Id, Transaction, Vendor};

use super::{TransactionStore, VendorStore};

/// In-memory store, for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    transactions: Mutex<Vec<Transaction>>,
    vendors: Mutex<HashMap<String, Vendor>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TransactionStore for MemoryStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut txns = self.transactions.lock().await.clone();
        txns.sort_by_key(|tx| tx.date);
        Ok(txns)
    }

    async fn transactions_for_connection(&self, connection_id: &Id) -> Result<Vec<Transaction>> {
        let mut txns: Vec<Transaction> = self
            .transactions
            .lock()
            .await
            .iter()
            .filter(|tx| tx.bank_connection_id.as_ref() == Some(connection_id))
            .cloned()
            .collect();
        txns.sort_by_key(|tx| tx.date);
        Ok(txns)
    }

    async fn get_transaction(&self, id: &Id) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .await
            .iter()
            .find(|tx| &tx.id == id)
            .cloned())
    }

    async fn insert_transactions(&self, txns: &[Transaction]) -> Result<()> {
        self.transactions.lock().await.extend_from_slice(txns);
        Ok(())
    }

    async fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        let mut txns = self.transactions.lock().await;
        match txns.iter_mut().find(|existing| existing.id == tx.id) {
            Some(existing) => {
                *existing = tx.clone();
                Ok(())
            }
            None => anyhow::bail!("no transaction with id {}", tx.id),
        }
    }

    async fn delete_transaction(&self, id: &Id) -> Result<()> {
        self.transactions.lock().await.retain(|tx| &tx.id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl VendorStore for MemoryStore {
    async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let mut vendors: Vec<Vendor> = self.vendors.lock().await.values().cloned().collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    async fn get_vendor(&self, name: &str) -> Result<Option<Vendor>> {
        Ok(self.vendors.lock().await.get(name).cloned())
    }

    async fn save_vendor(&self, vendor: &Vendor) -> Result<()> {
        self.vendors
            .lock()
            .await
            .insert(vendor.name.clone(), vendor.clone());
        Ok(())
    }

    async fn delete_vendor(&self, name: &str) -> Result<()> {
        self.vendors.lock().await.remove(name);
        Ok(())
    }
}
