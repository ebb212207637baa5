//! redb-backed document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | one per collection | document id | JSON document | Documents, tombstoned in place |
//! | `counters` | counter name | `u64` | Order numbers, product codes |
//!
//! # Transactions
//!
//! redb allows a single writer at a time. Every mutating operation opens one
//! [`WriteScope`], performs its existence checks, reference updates and the
//! parent write inside it, then commits. A scope dropped without `commit`
//! is rolled back. Scopes must never be held across an `.await`.

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::document::{COLLECTIONS, Document};

/// Table for counters: key = counter name, value = last issued value
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

pub const ORDER_NUMBER_COUNTER: &str = "order_number";
pub const PRODUCT_CODE_COUNTER: &str = "product_code";

fn collection(name: &'static str) -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Document store failure");
        AppError::database("Database error")
    }
}

/// Document store backed by redb
#[derive(Clone)]
pub struct DocumentStore {
    db: Arc<Database>,
}

impl DocumentStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and throwaway instances)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            for name in COLLECTIONS {
                let _ = write_txn.open_table(collection(name))?;
            }
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a read-only scope (snapshot isolation)
    pub fn read(&self) -> StoreResult<ReadScope> {
        Ok(ReadScope {
            txn: self.db.begin_read()?,
        })
    }

    /// Begin a write scope; blocks while another writer is active
    pub fn write(&self) -> StoreResult<WriteScope> {
        Ok(WriteScope {
            txn: self.db.begin_write()?,
        })
    }

    /// Atomically increment `key` and return the new value
    pub fn next_counter(&self, key: &str) -> StoreResult<u64> {
        let mut scope = self.write()?;
        let next = scope.next_counter(key)?;
        scope.commit()?;
        Ok(next)
    }

    /// Current value of `key` without incrementing
    pub fn counter(&self, key: &str) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(key)?.map(|g| g.value()).unwrap_or(0))
    }

    /// Number of stored documents in `name`, tombstones included
    pub fn count(&self, name: &'static str) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection(name))?;
        Ok(table.len()?)
    }
}

/// Repository view shared by read and write scopes.
///
/// Reads exclude soft-deleted documents unless the method name says
/// otherwise (`*_any`).
pub trait Scope {
    fn get_raw(&self, name: &'static str, id: &str) -> StoreResult<Option<Vec<u8>>>;
    fn scan_raw(&self, name: &'static str) -> StoreResult<Vec<Vec<u8>>>;

    /// Load a document whether or not it is tombstoned
    fn find_any<T: Document>(&self, id: &str) -> StoreResult<Option<T>> {
        self.get_raw(T::COLLECTION, id)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Load an active document
    fn find<T: Document>(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.find_any::<T>(id)?.filter(Document::is_active))
    }

    /// Load an active document or fail with NotFound naming the id
    fn require<T: Document>(&self, id: &str) -> AppResult<T> {
        self.find::<T>(id)?
            .ok_or_else(|| AppError::not_found(T::LABEL, id))
    }

    /// All documents of a collection, tombstones included
    fn list_any<T: Document>(&self) -> StoreResult<Vec<T>> {
        self.scan_raw(T::COLLECTION)?
            .iter()
            .map(|bytes| decode(bytes))
            .collect()
    }

    /// All active documents of a collection
    fn list<T: Document>(&self) -> StoreResult<Vec<T>> {
        Ok(self
            .list_any::<T>()?
            .into_iter()
            .filter(Document::is_active)
            .collect())
    }

    /// Active documents matching `pred`
    fn filter<T: Document>(&self, pred: impl Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        Ok(self.list::<T>()?.into_iter().filter(|d| pred(d)).collect())
    }

    /// First active document matching `pred`
    fn find_by<T: Document>(&self, pred: impl Fn(&T) -> bool) -> StoreResult<Option<T>> {
        Ok(self.list::<T>()?.into_iter().find(|d| pred(d)))
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

fn encode<T: Serialize>(doc: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(doc)?)
}

/// Read-only snapshot
pub struct ReadScope {
    txn: ReadTransaction,
}

impl Scope for ReadScope {
    fn get_raw(&self, name: &'static str, id: &str) -> StoreResult<Option<Vec<u8>>> {
        let table = self.txn.open_table(collection(name))?;
        Ok(table.get(id)?.map(|g| g.value().to_vec()))
    }

    fn scan_raw(&self, name: &'static str) -> StoreResult<Vec<Vec<u8>>> {
        let table = self.txn.open_table(collection(name))?;
        let mut out = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            out.push(value.value().to_vec());
        }
        Ok(out)
    }
}

/// Write transaction; uncommitted changes are discarded on drop
pub struct WriteScope {
    txn: WriteTransaction,
}

impl WriteScope {
    /// Insert or replace a document
    pub fn save<T: Document>(&mut self, doc: &T) -> StoreResult<()> {
        let value = encode(doc)?;
        let mut table = self.txn.open_table(collection(T::COLLECTION))?;
        table.insert(doc.id(), value.as_slice())?;
        Ok(())
    }

    /// Increment `key` inside this transaction
    pub fn next_counter(&mut self, key: &str) -> StoreResult<u64> {
        let mut table = self.txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(key)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    pub fn commit(self) -> StoreResult<()> {
        self.txn.commit()?;
        Ok(())
    }
}

impl Scope for WriteScope {
    fn get_raw(&self, name: &'static str, id: &str) -> StoreResult<Option<Vec<u8>>> {
        let table = self.txn.open_table(collection(name))?;
        Ok(table.get(id)?.map(|g| g.value().to_vec()))
    }

    fn scan_raw(&self, name: &'static str) -> StoreResult<Vec<Vec<u8>>> {
        let table = self.txn.open_table(collection(name))?;
        let mut out = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            out.push(value.value().to_vec());
        }
        Ok(out)
    }
}
