use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::models::{Id, Transaction, Vendor};

use super::{TransactionStore, VendorStore};

/// JSONL file-based store.
///
/// Directory structure:
/// ```text
/// data/
///   transactions.jsonl
///   vendors.jsonl
/// ```
///
/// Inserts append a line per record; updates and deletes rewrite the whole
/// file. A per-file mutex serializes writers within this process.
pub struct JsonFileStore {
    base_path: PathBuf,
    transactions_lock: Mutex<()>,
    vendors_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            transactions_lock: Mutex::new(()),
            vendors_lock: Mutex::new(()),
        }
    }

    fn transactions_file(&self) -> PathBuf {
        self.base_path.join("transactions.jsonl")
    }

    fn vendors_file(&self) -> PathBuf {
        self.base_path.join("vendors.jsonl")
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create directory")?;
        }
        Ok(())
    }

    async fn read_jsonl<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Vec<T>> {
        let file = match fs::File::open(path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to open file"),
        };

        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut items = Vec::new();

        while let Some(line) = lines.next_line().await.context("Failed to read line")? {
            if line.trim().is_empty() {
                continue;
            }
            let item: T = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse JSONL line: {}", line))?;
            items.push(item);
        }

        Ok(items)
    }

    async fn append_jsonl<T: serde::Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        self.ensure_dir(path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .context("Failed to open file for append")?;

        for item in items {
            let line = serde_json::to_string(item).context("Failed to serialize item")?;
            file.write_all(line.as_bytes()).await?;
            file.write_all(b"\n").await?;
        }

        Ok(())
    }

    /// Rewrite the collection atomically: write a sibling tmp file, then
    /// rename it over the original.
    async fn rewrite_jsonl<T: serde::Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        self.ensure_dir(path).await?;

        let mut content = String::new();
        for item in items {
            content.push_str(&serde_json::to_string(item).context("Failed to serialize item")?);
            content.push('\n');
        }

        let tmp = path.with_extension("jsonl.tmp");
        fs::write(&tmp, content)
            .await
            .context("Failed to write temp file")?;
        fs::rename(&tmp, path)
            .await
            .context("Failed to replace file")?;
        Ok(())
    }

    async fn load_transactions(&self) -> Result<Vec<Transaction>> {
        self.read_jsonl(&self.transactions_file()).await
    }
}

#[async_trait::async_trait]
impl TransactionStore for JsonFileStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut txns = self.load_transactions().await?;
        txns.sort_by_key(|tx| tx.date);
        Ok(txns)
    }

    async fn transactions_for_connection(&self, connection_id: &Id) -> Result<Vec<Transaction>> {
        let mut txns: Vec<Transaction> = self
            .load_transactions()
            .await?
            .into_iter()
            .filter(|tx| tx.bank_connection_id.as_ref() == Some(connection_id))
            .collect();
        txns.sort_by_key(|tx| tx.date);
        Ok(txns)
    }

    async fn get_transaction(&self, id: &Id) -> Result<Option<Transaction>> {
        Ok(self
            .load_transactions()
            .await?
            .into_iter()
            .find(|tx| &tx.id == id))
    }

    async fn insert_transactions(&self, txns: &[Transaction]) -> Result<()> {
        let _guard = self.transactions_lock.lock().await;
        self.append_jsonl(&self.transactions_file(), txns).await
    }

    async fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        let _guard = self.transactions_lock.lock().await;
        let mut txns = self.load_transactions().await?;
        let slot = txns
            .iter_mut()
            .find(|existing| existing.id == tx.id)
            .with_context(|| format!("no transaction with id {}", tx.id))?;
        *slot = tx.clone();
        self.rewrite_jsonl(&self.transactions_file(), &txns).await
    }

    async fn delete_transaction(&self, id: &Id) -> Result<()> {
        let _guard = self.transactions_lock.lock().await;
        let mut txns = self.load_transactions().await?;
        txns.retain(|tx| &tx.id != id);
        self.rewrite_jsonl(&self.transactions_file(), &txns).await
    }
}

#[async_trait::async_trait]
impl VendorStore for JsonFileStore {
    async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let mut vendors: Vec<Vendor> = self.read_jsonl(&self.vendors_file()).await?;
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    async fn get_vendor(&self, name: &str) -> Result<Option<Vendor>> {
        let vendors: Vec<Vendor> = self.read_jsonl(&self.vendors_file()).await?;
        Ok(vendors.into_iter().find(|v| v.name == name))
    }

    async fn save_vendor(&self, vendor: &Vendor) -> Result<()> {
        let _guard = self.vendors_lock.lock().await;
        let mut vendors: Vec<Vendor> = self.read_jsonl(&self.vendors_file()).await?;
        match vendors.iter_mut().find(|v| v.name == vendor.name) {
            Some(slot) => {
                *slot = vendor.clone();
                self.rewrite_jsonl(&self.vendors_file(), &vendors).await
            }
            None => self.append_jsonl(&self.vendors_file(), &[vendor.clone()]).await,
        }
    }

    async fn delete_vendor(&self, name: &str) -> Result<()> {
        let _guard = self.vendors_lock.lock().await;
        let mut vendors: Vec<Vendor> = self.read_jsonl(&self.vendors_file()).await?;
        vendors.retain(|v| v.name != name);
        self.rewrite_jsonl(&self.vendors_file(), &vendors).await
    }
}
