pub mod filter;
pub mod keyed_lock;
pub mod proximity;
pub mod registry;
pub mod validator;

pub use crate::domain::model::{
    Coordinates, NewSchool, ProximityListing, ProximityQuery, RankedSchool, SchoolId,
    SchoolRecord, SchoolSubmission,
};
pub use crate::domain::ports::{DuplicateLookup, SchoolStore, StoreError};
pub use crate::utils::error::Result;
