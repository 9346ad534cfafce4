pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::InMemorySchoolStore;
pub use config::RegistryConfig;
pub use crate::core::{
    filter::ProximityFilter,
    proximity::{haversine_km, rank_by_distance},
    registry::{SchoolRegistry, SeedReport},
    validator::{validate_coordinates, validate_school},
};
pub use domain::model::{
    Coordinates, NewSchool, ProximityListing, ProximityQuery, RankedSchool, SchoolId,
    SchoolRecord, SchoolSubmission,
};
pub use domain::ports::{DuplicateLookup, SchoolStore, StoreError};
pub use utils::error::{ErrorKind, Result, SchoolError};
