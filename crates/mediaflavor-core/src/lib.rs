//! mediaflavor core library
//!
//! Identifies which catalogued release flavor a set of installation-media
//! files represents, and which file plays which catalogued role.
//!
//! Pipeline: [`discover_paths`] -> [`build_candidate_set`] ->
//! [`FlavorMatcher`] via [`Resolver`], failing with a [`DiagnosticReport`]
//! when nothing matches.

pub mod candidates;
pub mod checksum;
pub mod discover;
pub mod domain;
pub mod loader;
pub mod matcher;
pub mod obs;
pub mod report;
pub mod resolver;
pub mod telemetry;

pub use candidates::build_candidate_set;
pub use checksum::{sha256_file, CancelToken, ChecksumProvider, Sha256FileHasher};
pub use discover::discover_paths;
pub use domain::{
    CandidateMedia, CandidateSet, CatalogError, Checksum, ExpectedMedia, Flavor, ReleaseCatalog,
    ReleaseTarget, ResolveError, Result,
};
pub use loader::{load_catalog, parse_json_catalog, parse_yaml_catalog};
pub use matcher::{
    FlavorMatch, FlavorMatcher, FlavorRejection, MatchOutcome, MediaAssignment, NoMatch,
    Verification,
};
pub use obs::ResolutionSpan;
pub use report::{write_match_json, DiagnosticReport, MatchArtifact, MatchedMediaArtifact};
pub use resolver::{resolve, Resolver};
pub use telemetry::init_tracing;

/// mediaflavor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
