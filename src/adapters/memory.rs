use crate::domain::model::{NewSchool, SchoolId, SchoolRecord};
use crate::domain::ports::{DuplicateLookup, SchoolStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    records: Vec<SchoolRecord>,
}

/// In-process school store. Enforces the (trimmed name, trimmed address)
/// unique constraint on insert, independent of any validator check.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchoolStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemorySchoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads records as-is; ids continue after the largest one given.
    pub fn with_records(records: Vec<SchoolRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        Self {
            inner: Arc::new(RwLock::new(Inner { next_id, records })),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn same_key(record: &SchoolRecord, name: &str, address: &str) -> bool {
    record.name.trim() == name.trim() && record.address.trim() == address.trim()
}

#[async_trait]
impl DuplicateLookup for InMemorySchoolStore {
    async fn exists_by_name_address(&self, name: &str, address: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().any(|r| same_key(r, name, address)))
    }
}

#[async_trait]
impl SchoolStore for InMemorySchoolStore {
    async fn insert(&self, school: NewSchool) -> Result<SchoolRecord, StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .records
            .iter()
            .any(|r| same_key(r, &school.name, &school.address))
        {
            return Err(StoreError::UniqueViolation {
                name: school.name,
                address: school.address,
            });
        }

        inner.next_id += 1;
        let record = school.into_record(SchoolId(inner.next_id));
        inner.records.push(record.clone());
        tracing::debug!("Stored school #{} ({} total)", record.id, inner.records.len());
        Ok(record)
    }

    async fn fetch_all(&self) -> Result<Vec<SchoolRecord>, StoreError> {
        Ok(self.inner.read().await.records.clone())
    }
}
