// In-process dashboard repository, holding the document as JSON
use crate::application::dashboard_repository::{DashboardRepository, RepositoryError};
use crate::domain::Collection;
use crate::domain::schema::DashboardRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Keeps the serialized document in memory, so writes go through the same
/// JSON shape the HTTP endpoint stores. Reads and writes can be made to fail
/// to exercise degraded paths.
#[derive(Debug)]
pub struct InMemoryDashboardRepository {
    document: Mutex<Value>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl Default for InMemoryDashboardRepository {
    fn default() -> Self {
        Self::from_json(Value::Array(Vec::new()))
    }
}

impl InMemoryDashboardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(document: Value) -> Self {
        Self {
            document: Mutex::new(document),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Current stored document.
    pub fn stored_json(&self) -> Value {
        self.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Value> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DashboardRepository for InMemoryDashboardRepository {
    async fn fetch_all(&self) -> Result<Vec<DashboardRecord>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("reads disabled".to_string()));
        }
        let document = self.stored_json();
        Ok(serde_json::from_value(document)?)
    }

    async fn replace_all(&self, collection: &Collection) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("writes disabled".to_string()));
        }
        let document = serde_json::to_value(collection)?;
        *self.lock() = document;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dashboard;

    #[tokio::test]
    async fn test_round_trip_through_json() {
        let repo = InMemoryDashboardRepository::new();
        assert!(repo.fetch_all().await.unwrap().is_empty());

        let collection = Collection::new(vec![Dashboard::new("Hall", 2, "/hall")]);
        repo.replace_all(&collection).await.unwrap();
        assert_eq!(repo.write_count(), 1);

        let records = repo.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Hall");
        assert_eq!(records[0].columns, Some(2));
    }

    #[tokio::test]
    async fn test_failures_are_reported() {
        let repo = InMemoryDashboardRepository::new();
        repo.fail_reads(true);
        repo.fail_writes(true);
        assert!(repo.fetch_all().await.is_err());
        assert!(repo.replace_all(&Collection::default()).await.is_err());
        assert_eq!(repo.write_count(), 0);
    }
}
