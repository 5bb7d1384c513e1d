//! Structured tracing hooks for the resolution lifecycle.
//!
//! Events carry an `event` field (`resolve.started`, `flavor.inadmissible`,
//! `checksum.escalated`, `checksum.unconfirmed`, `flavor.selected`,
//! `resolve.no_match`) so they can be filtered in JSON log pipelines.

use tracing::{debug, info, warn};

use crate::matcher::Verification;

/// RAII guard that enters a release-scoped span for one resolution.
///
/// # Example
///
/// ```ignore
/// let _span = ResolutionSpan::enter("7");
/// // events below carry release = "7" until the guard drops
/// ```
pub struct ResolutionSpan {
    _span: tracing::span::EnteredSpan,
}

impl ResolutionSpan {
    /// Create and enter a span tagged with the release id.
    pub fn enter(release: &str) -> Self {
        let span = tracing::info_span!("mediaflavor.resolve", release = %release);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: resolution started with candidate count and checksum mode.
pub fn emit_resolution_started(release: &str, candidates: usize, force_checksum: bool) {
    info!(
        event = "resolve.started",
        release = %release,
        candidates = candidates,
        force_checksum = force_checksum,
    );
}

/// Emit event: a flavor was skipped because some expected sizes were absent (debug level).
pub fn emit_flavor_inadmissible(flavor: &str, missing_sizes: &[u64]) {
    debug!(event = "flavor.inadmissible", flavor = %flavor, missing_sizes = ?missing_sizes);
}

/// Emit event: a flavor's candidates are being verified by checksum.
///
/// `forced` and `duplicate_sizes` record which trigger applied; both may be set.
pub fn emit_checksum_escalated(
    flavor: &str,
    forced: bool,
    duplicate_sizes: bool,
    candidates: usize,
) {
    info!(
        event = "checksum.escalated",
        flavor = %flavor,
        forced = forced,
        duplicate_sizes = duplicate_sizes,
        candidates = candidates,
    );
}

/// Emit event: the flavor is selected even though its checksums were not covered (warning level).
pub fn emit_checksum_unconfirmed(flavor: &str) {
    warn!(event = "checksum.unconfirmed", flavor = %flavor);
}

/// Emit event: a flavor was selected, with how it was verified and how many files matched.
pub fn emit_flavor_selected(flavor: &str, verification: Verification, matched: usize) {
    info!(
        event = "flavor.selected",
        flavor = %flavor,
        verification = ?verification,
        matched = matched,
    );
}

/// Emit event: no flavor of the release matched (warning level).
pub fn emit_no_match(release: &str, flavors: usize) {
    warn!(event = "resolve.no_match", release = %release, flavors = flavors);
}
