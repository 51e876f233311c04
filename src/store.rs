//! Storage seam for student records.
//!
//! Handlers only see `dyn StudentStore`. `MongoStore` (see `crate::mongo`) is
//! the production backend; `InMemoryStore` keeps records in process and backs
//! the router tests.

use crate::types::{NewStudent, StudentId, StudentRecord};
use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One collection of student documents.
///
/// Every method issues a single store call and never retries.
pub trait StudentStore: Send + Sync {
    /// All records in insertion order.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<StudentRecord>>>;

    /// Persists a validated student under a freshly generated id.
    fn insert(&self, student: NewStudent) -> BoxFuture<'_, StoreResult<StudentRecord>>;

    fn find(&self, id: StudentId) -> BoxFuture<'_, StoreResult<Option<StudentRecord>>>;

    /// Overwrites the whole document matched by `id` and returns it as stored.
    /// `None` when nothing matched.
    fn replace(
        &self,
        id: StudentId,
        student: NewStudent,
    ) -> BoxFuture<'_, StoreResult<Option<StudentRecord>>>;

    /// Number of documents removed, 0 or 1.
    fn delete(&self, id: StudentId) -> BoxFuture<'_, StoreResult<u64>>;

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>>;

    fn shutdown(&self) -> BoxFuture<'_, ()>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<StudentRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl StudentStore for InMemoryStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<StudentRecord>>> {
        Box::pin(async move { Ok(self.records.read().await.clone()) })
    }

    fn insert(&self, student: NewStudent) -> BoxFuture<'_, StoreResult<StudentRecord>> {
        Box::pin(async move {
            let record = student.into_record(StudentId::new());
            self.records.write().await.push(record.clone());
            Ok(record)
        })
    }

    fn find(&self, id: StudentId) -> BoxFuture<'_, StoreResult<Option<StudentRecord>>> {
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(records.iter().find(|r| r.id == id).cloned())
        })
    }

    fn replace(
        &self,
        id: StudentId,
        student: NewStudent,
    ) -> BoxFuture<'_, StoreResult<Option<StudentRecord>>> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            match records.iter_mut().find(|r| r.id == id) {
                Some(slot) => {
                    *slot = student.into_record(id);
                    Ok(Some(slot.clone()))
                }
                None => Ok(None),
            }
        })
    }

    fn delete(&self, id: StudentId) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| r.id != id);
            Ok((before - records.len()) as u64)
        })
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn shutdown(&self) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}
