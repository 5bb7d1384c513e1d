use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{CandidateSet, Checksum, ExpectedMedia, ReleaseTarget};
use crate::matcher::{FlavorMatch, FlavorRejection, Verification};

pub const MATCH_SCHEMA_VERSION: &str = "1.0";

/// Expected media of one flavor, as listed in the catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlavorExpectation {
    pub flavor: String,
    pub media: Vec<ExpectedMedia>,
}

/// A candidate file as it was found on disk.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FoundMedia {
    pub path: PathBuf,
    pub size: u64,
}

/// Expected-vs-found diagnostics attached to a failed resolution.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub release: String,
    pub expected: Vec<FlavorExpectation>,
    pub found: Vec<FoundMedia>,
    pub rejections: Vec<FlavorRejection>,
}

impl DiagnosticReport {
    pub fn new(
        release: &str,
        target: &ReleaseTarget,
        candidates: &CandidateSet,
        rejections: Vec<FlavorRejection>,
    ) -> Self {
        Self {
            release: release.to_string(),
            expected: target
                .flavors()
                .iter()
                .map(|f| FlavorExpectation {
                    flavor: f.name.clone(),
                    media: f.media.clone(),
                })
                .collect(),
            found: candidates
                .iter()
                .map(|(path, size)| FoundMedia {
                    path: path.to_path_buf(),
                    size,
                })
                .collect(),
            rejections,
        }
    }

    fn missing_sizes(&self, flavor: &str) -> Option<&[u64]> {
        self.rejections
            .iter()
            .find(|r| r.flavor == flavor)
            .map(|r| r.missing_sizes.as_slice())
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "expected media for release {}:", self.release)?;
        for expectation in &self.expected {
            writeln!(f, "  flavor {}:", expectation.flavor)?;
            for media in &expectation.media {
                writeln!(
                    f,
                    "    {}  size={}  sha256={}",
                    media.name, media.size, media.checksum
                )?;
            }
            if let Some(missing) = self.missing_sizes(&expectation.flavor) {
                let sizes: Vec<String> = missing.iter().map(|s| s.to_string()).collect();
                writeln!(f, "    missing sizes: {}", sizes.join(", "))?;
            }
        }

        if self.found.is_empty() {
            write!(f, "found no candidate files")
        } else {
            write!(f, "found {} candidate file(s):", self.found.len())?;
            for media in &self.found {
                write!(f, "\n  {}  size={}", media.path.display(), media.size)?;
            }
            Ok(())
        }
    }
}

/// One matched file in the JSON side-file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchedMediaArtifact {
    pub path: PathBuf,
    pub size: u64,
    pub checksum: Option<Checksum>,
    /// Catalog entry name this file plays, when it can be told.
    pub role: Option<String>,
}

/// JSON side-file describing a successful resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub release: String,
    pub flavor: String,
    pub verification: Verification,
    pub media: Vec<MatchedMediaArtifact>,
}

impl MatchArtifact {
    pub fn from_match(release: &str, flavor_match: &FlavorMatch) -> Self {
        Self {
            schema_version: MATCH_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            release: release.to_string(),
            flavor: flavor_match.flavor.name.clone(),
            verification: flavor_match.verification,
            media: flavor_match
                .assignments()
                .into_iter()
                .map(|a| MatchedMediaArtifact {
                    path: a.candidate.path.clone(),
                    size: a.candidate.size,
                    checksum: a.candidate.checksum,
                    role: a.expected.map(|e| e.name.clone()),
                })
                .collect(),
        }
    }
}

/// Write the match side-file as pretty JSON.
pub fn write_match_json(path: &Path, artifact: &MatchArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize match artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
