//! Candidate set construction: stat each discovered path exactly once.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::{CandidateSet, ResolveError, Result};

/// Stat every path and collect a sorted, deduplicated path -> size set.
///
/// An empty input yields an empty set. The first path that cannot be
/// stat-ed, or that is not a regular file, aborts with `ResolveError::Io`.
pub fn build_candidate_set<P: AsRef<Path>>(paths: &[P]) -> Result<CandidateSet> {
    let mut set = CandidateSet::new();

    for path in paths {
        let path = path.as_ref();
        if set.size_of(path).is_some() {
            continue;
        }

        let meta = fs::metadata(path).map_err(|e| ResolveError::io(path, e))?;
        if !meta.is_file() {
            return Err(ResolveError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        set.insert(path, meta.len());
    }

    debug!(candidates = set.len(), "candidate set built");
    Ok(set)
}
