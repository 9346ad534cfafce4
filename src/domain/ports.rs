use crate::domain::model::{NewSchool, SchoolRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a store collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("unique constraint violated for {name} / {address}")]
    UniqueViolation { name: String, address: String },
}

/// The one lookup the school validator needs from storage.
#[async_trait]
pub trait DuplicateLookup: Send + Sync {
    async fn exists_by_name_address(&self, name: &str, address: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait SchoolStore: DuplicateLookup {
    async fn insert(&self, school: NewSchool) -> Result<SchoolRecord, StoreError>;
    async fn fetch_all(&self) -> Result<Vec<SchoolRecord>, StoreError>;
}
