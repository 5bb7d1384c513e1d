//! Resolution orchestration: candidate set -> release lookup -> flavor match.

use std::path::Path;

use crate::candidates::build_candidate_set;
use crate::checksum::{CancelToken, ChecksumProvider, Sha256FileHasher};
use crate::domain::{CandidateSet, ReleaseCatalog, ResolveError, Result};
use crate::matcher::{FlavorMatch, FlavorMatcher, MatchOutcome, NoMatch};
use crate::obs;
use crate::report::DiagnosticReport;

/// Resolves candidate files to a catalog flavor.
///
/// Holds no state between calls beyond the checksum provider and the cancel
/// token handed to it.
#[derive(Debug, Clone, Default)]
pub struct Resolver<P = Sha256FileHasher> {
    provider: P,
    cancel: CancelToken,
}

impl Resolver<Sha256FileHasher> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ChecksumProvider> Resolver<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` to abort in-flight hashing from another thread.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Stat `paths`, then resolve them against `release` in `catalog`.
    pub fn resolve<Q: AsRef<Path>>(
        &self,
        paths: &[Q],
        release: &str,
        catalog: &ReleaseCatalog,
        force_checksum: bool,
    ) -> Result<FlavorMatch> {
        let candidates = build_candidate_set(paths)?;
        self.resolve_candidates(&candidates, release, catalog, force_checksum)
    }

    /// Resolve an already-built candidate set.
    ///
    /// An empty candidate set never matches, even against a flavor that
    /// expects no media.
    pub fn resolve_candidates(
        &self,
        candidates: &CandidateSet,
        release: &str,
        catalog: &ReleaseCatalog,
        force_checksum: bool,
    ) -> Result<FlavorMatch> {
        let _span = obs::ResolutionSpan::enter(release);

        let target = catalog
            .target(release)
            .ok_or_else(|| ResolveError::UnknownRelease {
                release: release.to_string(),
                known: catalog.release_ids(),
            })?;

        obs::emit_resolution_started(release, candidates.len(), force_checksum);

        let outcome = if candidates.is_empty() {
            MatchOutcome::NoMatch(NoMatch::nothing_found(target))
        } else {
            FlavorMatcher::new(&self.provider, &self.cancel).match_target(
                target,
                candidates,
                force_checksum,
            )?
        };

        match outcome {
            MatchOutcome::Matched(flavor_match) => Ok(flavor_match),
            MatchOutcome::NoMatch(no_match) => {
                obs::emit_no_match(release, target.len());
                Err(ResolveError::NoFlavorMatched {
                    release: release.to_string(),
                    report: Box::new(DiagnosticReport::new(
                        release,
                        target,
                        candidates,
                        no_match.rejections,
                    )),
                })
            }
        }
    }
}

/// Resolve with the default in-process SHA-256 hasher and no cancellation.
pub fn resolve<Q: AsRef<Path>>(
    paths: &[Q],
    release: &str,
    catalog: &ReleaseCatalog,
    force_checksum: bool,
) -> Result<FlavorMatch> {
    Resolver::new().resolve(paths, release, catalog, force_checksum)
}
