use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::checksum::Checksum;

/// A file found on disk, evaluated for a role in some flavor.
///
/// `checksum` stays `None` until hashing is actually needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateMedia {
    pub path: PathBuf,
    pub size: u64,
    pub checksum: Option<Checksum>,
}

impl CandidateMedia {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }
}

/// Sorted, path-unique set of candidate files and their sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    entries: BTreeMap<PathBuf, u64>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-known sizes. A repeated path keeps its last size.
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, u64)>,
        P: Into<PathBuf>,
    {
        Self {
            entries: entries.into_iter().map(|(p, s)| (p.into(), s)).collect(),
        }
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, size: u64) {
        self.entries.insert(path.into(), size);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_of(&self, path: &Path) -> Option<u64> {
        self.entries.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, u64)> {
        self.entries.iter().map(|(p, s)| (p.as_path(), *s))
    }

    /// Distinct sizes present among the candidates.
    pub fn sizes(&self) -> BTreeSet<u64> {
        self.entries.values().copied().collect()
    }

    /// Candidates whose size is one of `sizes`, in path order.
    pub fn with_sizes_in(&self, sizes: &BTreeSet<u64>) -> Vec<CandidateMedia> {
        self.iter()
            .filter(|(_, size)| sizes.contains(size))
            .map(|(path, size)| CandidateMedia::new(path, size))
            .collect()
    }
}
