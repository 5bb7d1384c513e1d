//! Domain model for media flavor resolution.

pub mod candidate;
pub mod catalog;
pub mod checksum;
pub mod error;

pub use candidate::{CandidateMedia, CandidateSet};
pub use catalog::{ExpectedMedia, Flavor, ReleaseCatalog, ReleaseTarget};
pub use checksum::Checksum;
pub use error::{CatalogError, ResolveError, Result};
