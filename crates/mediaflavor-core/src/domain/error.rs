//! Error taxonomy for flavor resolution and catalog loading.

use std::path::PathBuf;

use crate::report::DiagnosticReport;

/// Errors raised while resolving candidate media against a catalog.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown release {release:?} (known releases: {})", .known.join(", "))]
    UnknownRelease { release: String, known: Vec<String> },

    #[error("no flavor of release {release:?} matched the candidate media\n{report}")]
    NoFlavorMatched {
        release: String,
        report: Box<DiagnosticReport>,
    },

    #[error("checksum of {path:?} cancelled")]
    Cancelled { path: PathBuf },
}

impl ResolveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while loading a release catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid sha256 checksum: {0:?}")]
    InvalidChecksum(String),

    #[error("release {0:?} declares no flavors")]
    EmptyRelease(String),
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
