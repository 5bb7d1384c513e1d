//! Two-phase flavor matching: size admissibility, then checksum escalation.
//!
//! Flavors are tried in catalog order and the first size-admissible flavor is
//! selected. Checksums are computed only when the caller forces it or when the
//! flavor lists two media of the same size. A failed checksum verification
//! does not reject the flavor: it is still selected, with no matched media and
//! [`Verification::ChecksumUnconfirmed`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::checksum::{CancelToken, ChecksumProvider};
use crate::domain::{
    CandidateMedia, CandidateSet, ExpectedMedia, Flavor, ReleaseTarget, ResolveError, Result,
};
use crate::obs;

/// How strongly the selected flavor was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    /// Sizes only; no checksum was computed.
    SizeOnly,
    /// Every expected checksum was found among the size-matched candidates.
    ChecksumConfirmed,
    /// Checksums were computed but did not cover the flavor's media.
    ChecksumUnconfirmed,
}

/// The selected flavor and the candidates that play its media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorMatch {
    pub flavor: Flavor,
    pub matched_media: Vec<CandidateMedia>,
    pub verification: Verification,
}

/// A matched candidate paired with the catalog entry it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaAssignment<'a> {
    pub candidate: &'a CandidateMedia,
    /// `None` when size alone cannot say which entry the candidate is.
    pub expected: Option<&'a ExpectedMedia>,
}

impl FlavorMatch {
    /// Pair each matched candidate with its expected media entry, by checksum
    /// when one was computed, otherwise by a size unique within the flavor.
    pub fn assignments(&self) -> Vec<MediaAssignment<'_>> {
        self.matched_media
            .iter()
            .map(|candidate| {
                let expected = match candidate.checksum {
                    Some(checksum) => self.flavor.media.iter().find(|m| m.checksum == checksum),
                    None => {
                        let mut same_size =
                            self.flavor.media.iter().filter(|m| m.size == candidate.size);
                        match (same_size.next(), same_size.next()) {
                            (Some(only), None) => Some(only),
                            _ => None,
                        }
                    }
                };
                MediaAssignment {
                    candidate,
                    expected,
                }
            })
            .collect()
    }
}

/// Why a flavor was not admissible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlavorRejection {
    pub flavor: String,
    pub missing_sizes: Vec<u64>,
}

/// No flavor was admissible; one rejection per flavor, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoMatch {
    pub rejections: Vec<FlavorRejection>,
}

impl NoMatch {
    /// Every flavor of `target` rejected with all of its sizes missing.
    pub fn nothing_found(target: &ReleaseTarget) -> Self {
        Self {
            rejections: target
                .flavors()
                .iter()
                .map(|f| FlavorRejection {
                    flavor: f.name.clone(),
                    missing_sizes: f.unique_sizes().into_iter().collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(FlavorMatch),
    NoMatch(NoMatch),
}

impl MatchOutcome {
    pub fn matched(&self) -> Option<&FlavorMatch> {
        match self {
            MatchOutcome::Matched(m) => Some(m),
            MatchOutcome::NoMatch(_) => None,
        }
    }
}

/// Matches one release target against a candidate set.
pub struct FlavorMatcher<'a, P: ?Sized> {
    provider: &'a P,
    cancel: &'a CancelToken,
}

impl<'a, P> FlavorMatcher<'a, P>
where
    P: ChecksumProvider + ?Sized,
{
    pub fn new(provider: &'a P, cancel: &'a CancelToken) -> Self {
        Self { provider, cancel }
    }

    pub fn match_target(
        &self,
        target: &ReleaseTarget,
        candidates: &CandidateSet,
        force_checksum: bool,
    ) -> Result<MatchOutcome> {
        let available = candidates.sizes();
        let mut rejections = Vec::new();

        for flavor in target.flavors() {
            let unique_sizes = flavor.unique_sizes();
            let missing: Vec<u64> = unique_sizes.difference(&available).copied().collect();
            if !missing.is_empty() {
                obs::emit_flavor_inadmissible(&flavor.name, &missing);
                rejections.push(FlavorRejection {
                    flavor: flavor.name.clone(),
                    missing_sizes: missing,
                });
                continue;
            }

            let size_matched = candidates.with_sizes_in(&unique_sizes);
            let duplicate_sizes = flavor.has_duplicate_sizes();

            let (matched_media, verification) = if force_checksum || duplicate_sizes {
                obs::emit_checksum_escalated(
                    &flavor.name,
                    force_checksum,
                    duplicate_sizes,
                    size_matched.len(),
                );
                match self.verify(flavor, size_matched)? {
                    Some(confirmed) => (confirmed, Verification::ChecksumConfirmed),
                    None => {
                        obs::emit_checksum_unconfirmed(&flavor.name);
                        (Vec::new(), Verification::ChecksumUnconfirmed)
                    }
                }
            } else {
                (size_matched, Verification::SizeOnly)
            };

            obs::emit_flavor_selected(&flavor.name, verification, matched_media.len());
            return Ok(MatchOutcome::Matched(FlavorMatch {
                flavor: flavor.clone(),
                matched_media,
                verification,
            }));
        }

        Ok(MatchOutcome::NoMatch(NoMatch { rejections }))
    }

    /// Hash every size-matched candidate and keep those carrying an expected
    /// checksum. Returns `None` unless the kept checksums cover every distinct
    /// expected checksum.
    fn verify(
        &self,
        flavor: &Flavor,
        size_matched: Vec<CandidateMedia>,
    ) -> Result<Option<Vec<CandidateMedia>>> {
        let expected = flavor.expected_checksums();
        let mut checksum_matched = Vec::new();

        for candidate in size_matched {
            if self.cancel.is_cancelled() {
                return Err(ResolveError::Cancelled {
                    path: candidate.path,
                });
            }
            let checksum = self.provider.checksum(&candidate.path, self.cancel)?;
            if expected.contains(&checksum) {
                checksum_matched.push(candidate.with_checksum(checksum));
            }
        }

        let covered: BTreeSet<_> = checksum_matched.iter().filter_map(|c| c.checksum).collect();
        if covered.len() == expected.len() {
            Ok(Some(checksum_matched))
        } else {
            Ok(None)
        }
    }
}
