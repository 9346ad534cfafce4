use crate::config::RegistryConfig;
use crate::core::filter::ProximityFilter;
use crate::core::keyed_lock::KeyedLock;
use crate::core::proximity::rank_by_distance;
use crate::core::validator::{validate_coordinates, validate_school};
use crate::domain::model::{ProximityListing, ProximityQuery, SchoolRecord, SchoolSubmission};
use crate::domain::ports::SchoolStore;
use crate::utils::error::{ErrorCategory, Result, SchoolError};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Outcome of loading a seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Create and query paths over an injected store.
pub struct SchoolRegistry<S: SchoolStore> {
    store: S,
    config: RegistryConfig,
    creation_locks: KeyedLock<(String, String)>,
}

impl<S: SchoolStore> SchoolRegistry<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, RegistryConfig::default())
    }

    pub fn with_config(store: S, config: RegistryConfig) -> Self {
        Self {
            store,
            config,
            creation_locks: KeyedLock::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub async fn add_school(&self, submission: &SchoolSubmission) -> Result<SchoolRecord> {
        // Held across validate + insert so the duplicate check cannot go stale.
        let _guard = match submission.trimmed_key() {
            Some(key) if self.config.serialize_creates() => {
                Some(self.creation_locks.acquire(key).await)
            }
            _ => None,
        };

        let school = match validate_school(submission, &self.store).await {
            Ok(school) => school,
            Err(e) => {
                if matches!(e, SchoolError::DuplicateRecord { .. }) {
                    tracing::warn!("⚠️ Rejected duplicate school: {}", e);
                } else {
                    tracing::debug!("School submission rejected: {}", e);
                }
                return Err(e);
            }
        };

        let record = self.store.insert(school).await?;
        tracing::info!(
            "🏫 Registered school #{} '{}' at ({}, {})",
            record.id,
            record.name,
            record.latitude,
            record.longitude
        );
        Ok(record)
    }

    pub async fn list_by_proximity(&self, query: &ProximityQuery) -> Result<ProximityListing> {
        let reference = validate_coordinates(query.latitude.as_ref(), query.longitude.as_ref())?;
        let filter = ProximityFilter::resolve(query, &self.config.query)?;

        let records = self.store.fetch_all().await.map_err(|e| {
            SchoolError::StoreUnavailable {
                message: e.to_string(),
            }
        })?;
        tracing::debug!(
            "Ranking {} schools from ({}, {})",
            records.len(),
            reference.latitude,
            reference.longitude
        );

        let ranked = rank_by_distance(reference, &records);
        let schools = if filter.is_noop() {
            ranked
        } else {
            filter.apply(ranked)
        };

        Ok(ProximityListing {
            reference,
            total: schools.len(),
            schools,
        })
    }

    /// 從 JSON 陣列檔案匯入學校資料。驗證失敗的項目會被略過，store 錯誤則中止。
    pub async fn seed_from_file<P: AsRef<Path>>(&self, path: P) -> Result<SeedReport> {
        let path = path.as_ref();
        tracing::info!("📁 Seeding schools from: {}", path.display());

        let content = tokio::fs::read(path).await?;
        let entries: Vec<Value> = serde_json::from_slice(&content)?;

        let mut report = SeedReport::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let submission = SchoolSubmission::from_value(entry);
            match self.add_school(&submission).await {
                Ok(_) => report.inserted += 1,
                Err(e) if e.category() == ErrorCategory::Dependency => return Err(e),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping seed entry {}: {}", index, e);
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            "✅ Seeding finished: {} inserted, {} skipped",
            report.inserted,
            report.skipped
        );
        Ok(report)
    }

    /// Seeds from `registry.seed_file` when one is configured.
    pub async fn seed_from_config(&self) -> Result<Option<SeedReport>> {
        match self.config.seed_file() {
            Some(path) => self.seed_from_file(path).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{NewSchool, SchoolId};
    use crate::domain::ports::{DuplicateLookup, StoreError};
    use crate::utils::error::ErrorKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tokio::sync::Mutex;

    /// No unique constraint on insert; only the registry guards duplicates.
    #[derive(Clone, Default)]
    struct MockStore {
        records: Arc<Mutex<Vec<SchoolRecord>>>,
        fail_fetch: bool,
        fail_insert: bool,
        fail_lookup: bool,
        insert_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DuplicateLookup for MockStore {
        async fn exists_by_name_address(
            &self,
            name: &str,
            address: &str,
        ) -> std::result::Result<bool, StoreError> {
            if self.fail_lookup {
                return Err(StoreError::Unavailable("lookup timeout".to_string()));
            }
            let records = self.records.lock().await;
            // Give concurrent creates a chance to interleave here.
            tokio::task::yield_now().await;
            Ok(records.iter().any(|r| r.name == name && r.address == address))
        }
    }

    #[async_trait]
    impl SchoolStore for MockStore {
        async fn insert(&self, school: NewSchool) -> std::result::Result<SchoolRecord, StoreError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert {
                return Err(StoreError::Unavailable("write rejected".to_string()));
            }
            let mut records = self.records.lock().await;
            let record = school.into_record(SchoolId(records.len() as u64 + 1));
            records.push(record.clone());
            Ok(record)
        }

        async fn fetch_all(&self) -> std::result::Result<Vec<SchoolRecord>, StoreError> {
            if self.fail_fetch {
                return Err(StoreError::Unavailable("read timeout".to_string()));
            }
            Ok(self.records.lock().await.clone())
        }
    }

    fn submission(name: &str, lat: f64, lon: f64) -> SchoolSubmission {
        SchoolSubmission {
            name: Some(json!(name)),
            address: Some(json!("1 Main Street")),
            latitude: Some(json!(lat)),
            longitude: Some(json!(lon)),
        }
    }

    #[tokio::test]
    async fn test_add_school_returns_created_record() {
        let registry = SchoolRegistry::new(MockStore::default());

        let record = registry
            .add_school(&submission(" Oak School ", 10.0, 20.0))
            .await
            .unwrap();

        assert_eq!(record.id, SchoolId(1));
        assert_eq!(record.name, "Oak School");
        assert_eq!(record.latitude, 10.0);
        assert_eq!(registry.store().records.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_school_rejects_duplicate() {
        let registry = SchoolRegistry::new(MockStore::default());
        registry.add_school(&submission("Oak School", 0.0, 0.0)).await.unwrap();

        let err = registry
            .add_school(&submission("Oak School  ", 5.0, 5.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateRecord);
        assert_eq!(registry.store().records.lock().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_identical_creates_insert_once() {
        let registry = Arc::new(SchoolRegistry::new(MockStore::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.add_school(&submission("Oak School", 1.0, 1.0)).await
                })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::DuplicateRecord);
                    duplicates += 1;
                }
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(registry.store().records.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_proximity_orders_and_echoes_reference() {
        let registry = SchoolRegistry::new(MockStore::default());
        registry.add_school(&submission("Far School", 0.0, 2.0)).await.unwrap();
        registry.add_school(&submission("Mid School", 0.0, 1.0)).await.unwrap();
        registry.add_school(&submission("Near School", 0.0, 0.0)).await.unwrap();

        let query = ProximityQuery::from_pairs([("latitude", "0"), ("longitude", " 0 ")]);
        let listing = registry.list_by_proximity(&query).await.unwrap();

        assert_eq!(listing.reference.latitude, 0.0);
        assert_eq!(listing.total, 3);
        let names: Vec<&str> = listing.schools.iter().map(|s| s.school.name.as_str()).collect();
        assert_eq!(names, vec!["Near School", "Mid School", "Far School"]);
        assert_eq!(listing.schools[2].distance_km, 222.39);
    }

    #[tokio::test]
    async fn test_list_by_proximity_applies_filter() {
        let registry = SchoolRegistry::new(MockStore::default());
        for (i, lon) in [0.0, 0.5, 1.0, 3.0].iter().enumerate() {
            registry
                .add_school(&submission(&format!("School {}", i), 0.0, *lon))
                .await
                .unwrap();
        }

        let query = ProximityQuery::from_pairs([
            ("latitude", "0"),
            ("longitude", "0"),
            ("radius_km", "120"),
            ("limit", "2"),
        ]);
        let listing = registry.list_by_proximity(&query).await.unwrap();
        assert_eq!(listing.total, 2);
        assert_eq!(listing.schools[1].distance_km, 55.6);
    }

    #[tokio::test]
    async fn test_list_by_proximity_validates_before_fetch() {
        let store = MockStore {
            fail_fetch: true,
            ..Default::default()
        };
        let registry = SchoolRegistry::new(store);

        let missing = ProximityQuery::from_pairs([("latitude", "10")]);
        let err = registry.list_by_proximity(&missing).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);

        let valid = ProximityQuery::from_pairs([("latitude", "10"), ("longitude", "10")]);
        let err = registry.list_by_proximity(&valid).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_store_unavailable() {
        let store = MockStore {
            fail_insert: true,
            ..Default::default()
        };
        let registry = SchoolRegistry::new(store);
        let err = registry
            .add_school(&submission("Oak School", 0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(registry.store().records.lock().await.is_empty());

        let store = MockStore {
            fail_lookup: true,
            ..Default::default()
        };
        let registry = SchoolRegistry::new(store);
        let err = registry
            .add_school(&submission("Oak School", 0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_seed_aborts_on_store_failure() {
        let mut seed = NamedTempFile::new().unwrap();
        seed.write_all(
            br#"[
                {"name": "Oak School", "address": "1 Main St", "latitude": 1, "longitude": 1},
                {"name": "Elm School", "address": "2 Main St", "latitude": 2, "longitude": 2}
            ]"#,
        )
        .unwrap();

        let store = MockStore {
            fail_insert: true,
            ..Default::default()
        };
        let registry = SchoolRegistry::new(store);

        let err = registry.seed_from_file(seed.path()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        // Stopped at the first entry; the second was never attempted.
        assert_eq!(registry.store().insert_calls.load(Ordering::SeqCst), 1);
        assert!(registry.store().records.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_seed_skips_invalid_entries() {
        let mut seed = NamedTempFile::new().unwrap();
        seed.write_all(
            br#"[
                {"name": "Oa", "address": "1 Main St", "latitude": 1, "longitude": 1},
                {"name": "Elm School", "address": "2 Main St", "latitude": 2, "longitude": 2}
            ]"#,
        )
        .unwrap();

        let registry = SchoolRegistry::new(MockStore::default());
        let report = registry.seed_from_file(seed.path()).await.unwrap();
        assert_eq!(report, SeedReport { inserted: 1, skipped: 1 });
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let registry = SchoolRegistry::new(MockStore::default());
        let query = ProximityQuery::from_pairs([("latitude", "-45"), ("longitude", "170")]);
        let listing = registry.list_by_proximity(&query).await.unwrap();
        assert_eq!(listing.total, 0);
        assert!(listing.schools.is_empty());
    }
}
