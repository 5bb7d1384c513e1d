//! Resolution contract tests.
//!
//! A counting in-memory checksum provider shows exactly when hashing happens.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use mediaflavor_core::{
    CancelToken, CandidateSet, Checksum, ChecksumProvider, ExpectedMedia, Flavor, ReleaseCatalog,
    ReleaseTarget, ResolveError, Resolver, Verification,
};

/// Checksums served from a table; counts every call.
struct CountingHasher {
    sums: HashMap<PathBuf, Checksum>,
    calls: AtomicUsize,
}

impl CountingHasher {
    fn new(sums: &[(&str, char)]) -> Self {
        Self {
            sums: sums
                .iter()
                .map(|(path, fill)| (PathBuf::from(path), sum(*fill)))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChecksumProvider for CountingHasher {
    fn checksum(&self, path: &Path, _cancel: &CancelToken) -> Result<Checksum, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sums.get(path).copied().ok_or_else(|| ResolveError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

fn sum(fill: char) -> Checksum {
    fill.to_string().repeat(64).parse().expect("valid checksum")
}

fn media(name: &str, size: u64, fill: char) -> ExpectedMedia {
    ExpectedMedia::new(name, size, sum(fill))
}

fn catalog(release: &str, flavors: Vec<Flavor>) -> ReleaseCatalog {
    let mut catalog = ReleaseCatalog::new();
    catalog.insert(release, ReleaseTarget::new(flavors));
    catalog
}

// ── Admissibility ───────────────────────────────────────────────────────

#[test]
fn no_admissible_flavor_raises_no_flavor_matched() {
    let catalog = catalog(
        "7",
        vec![
            Flavor::new("dvd", vec![media("dvd.iso", 4000, 'a')]),
            Flavor::new(
                "minimal",
                vec![media("min.iso", 900, 'b'), media("boot.iso", 50, 'c')],
            ),
        ],
    );
    let candidates = CandidateSet::from_entries([("/iso/boot.iso", 50), ("/iso/x.iso", 3999)]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[]));

    match resolver.resolve_candidates(&candidates, "7", &catalog, false) {
        Err(ResolveError::NoFlavorMatched { release, report }) => {
            assert_eq!(release, "7");
            assert_eq!(report.expected.len(), 2);
            assert_eq!(report.found.len(), 2);
            assert_eq!(report.rejections[0].missing_sizes, vec![4000]);
            assert_eq!(report.rejections[1].missing_sizes, vec![900]);
            let text = report.to_string();
            assert!(text.contains("dvd.iso  size=4000"));
            assert!(text.contains(&"c".repeat(64)));
        }
        other => panic!("expected NoFlavorMatched, got {other:?}"),
    }
    assert_eq!(resolver.provider().calls(), 0);
}

#[test]
fn empty_candidate_list_raises_no_flavor_matched() {
    let catalog = catalog("X", vec![Flavor::new("A", vec![media("a.iso", 100, 'a')])]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[]));

    let err = resolver
        .resolve(&Vec::<PathBuf>::new(), "X", &catalog, false)
        .unwrap_err();
    match err {
        ResolveError::NoFlavorMatched { report, .. } => {
            assert!(report.found.is_empty());
            assert_eq!(report.rejections.len(), 1);
            assert_eq!(report.rejections[0].missing_sizes, vec![100]);
            let text = report.to_string();
            assert!(text.contains("a.iso  size=100"));
            assert!(text.contains("missing sizes: 100"));
        }
        other => panic!("expected NoFlavorMatched, got {other:?}"),
    }
}

// ── Escalation ──────────────────────────────────────────────────────────

#[test]
fn unique_sizes_resolve_without_hashing() {
    let catalog = catalog(
        "7",
        vec![Flavor::new(
            "centos-7-x86_64",
            vec![media("dvd.iso", 4000, 'a'), media("boot.iso", 50, 'b')],
        )],
    );
    let candidates = CandidateSet::from_entries([("/iso/boot.iso", 50), ("/iso/dvd.iso", 4000)]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[]));

    let m = resolver
        .resolve_candidates(&candidates, "7", &catalog, false)
        .unwrap();
    assert_eq!(m.flavor.name, "centos-7-x86_64");
    assert_eq!(m.verification, Verification::SizeOnly);
    assert_eq!(m.matched_media.len(), 2);
    assert!(m.matched_media.iter().all(|c| c.checksum.is_none()));
    assert_eq!(resolver.provider().calls(), 0);

    let roles: Vec<_> = m
        .assignments()
        .iter()
        .map(|a| a.expected.map(|e| e.name.clone()))
        .collect();
    assert_eq!(
        roles,
        vec![Some("boot.iso".to_string()), Some("dvd.iso".to_string())]
    );
}

#[test]
fn force_checksum_hashes_even_unique_sizes() {
    let catalog = catalog("7", vec![Flavor::new("A", vec![media("a.iso", 100, 'a')])]);
    let candidates = CandidateSet::from_entries([("/iso/a.iso", 100), ("/iso/other", 7)]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[("/iso/a.iso", 'a')]));

    let m = resolver
        .resolve_candidates(&candidates, "7", &catalog, true)
        .unwrap();
    assert_eq!(m.verification, Verification::ChecksumConfirmed);
    assert_eq!(m.matched_media.len(), 1);
    assert_eq!(m.matched_media[0].checksum, Some(sum('a')));
    assert_eq!(resolver.provider().calls(), 1);
}

#[test]
fn duplicate_sizes_with_wrong_checksums_still_select_flavor_with_no_media() {
    // Failed verification does not reject the flavor; it only empties the
    // matched media. Changing this must be a deliberate decision.
    let catalog = catalog(
        "7",
        vec![
            Flavor::new(
                "two-disc",
                vec![media("disc1.iso", 700, 'a'), media("disc2.iso", 700, 'b')],
            ),
            Flavor::new(
                "other-two-disc",
                vec![media("d1.iso", 700, 'c'), media("d2.iso", 700, 'd')],
            ),
        ],
    );
    let candidates = CandidateSet::from_entries([("/iso/1", 700), ("/iso/2", 700)]);
    let hasher = CountingHasher::new(&[("/iso/1", 'a'), ("/iso/2", 'c')]);
    let resolver = Resolver::with_provider(hasher);

    let m = resolver
        .resolve_candidates(&candidates, "7", &catalog, false)
        .unwrap();
    assert_eq!(m.flavor.name, "two-disc");
    assert_eq!(m.verification, Verification::ChecksumUnconfirmed);
    assert!(m.matched_media.is_empty());
    assert_eq!(resolver.provider().calls(), 2);
}

#[test]
fn duplicate_sizes_with_full_coverage_confirm() {
    let catalog = catalog(
        "7",
        vec![Flavor::new(
            "two-disc",
            vec![media("disc1.iso", 700, 'a'), media("disc2.iso", 700, 'b')],
        )],
    );
    let candidates = CandidateSet::from_entries([("/iso/1", 700), ("/iso/2", 700)]);
    let hasher = CountingHasher::new(&[("/iso/1", 'b'), ("/iso/2", 'a')]);
    let resolver = Resolver::with_provider(hasher);

    let m = resolver
        .resolve_candidates(&candidates, "7", &catalog, false)
        .unwrap();
    assert_eq!(m.verification, Verification::ChecksumConfirmed);
    let roles: Vec<_> = m
        .assignments()
        .iter()
        .map(|a| (a.candidate.path.clone(), a.expected.map(|e| e.name.clone())))
        .collect();
    assert_eq!(
        roles,
        vec![
            (PathBuf::from("/iso/1"), Some("disc2.iso".to_string())),
            (PathBuf::from("/iso/2"), Some("disc1.iso".to_string())),
        ]
    );
}

// ── Ordering ────────────────────────────────────────────────────────────

#[test]
fn earlier_declared_flavor_wins() {
    let catalog = catalog(
        "7",
        vec![
            Flavor::new("first", vec![media("a.iso", 100, 'a')]),
            Flavor::new("second", vec![media("a.iso", 100, 'a'), media("b.iso", 200, 'b')]),
        ],
    );
    let candidates = CandidateSet::from_entries([("/iso/a", 100), ("/iso/b", 200)]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[]));

    let m = resolver
        .resolve_candidates(&candidates, "7", &catalog, false)
        .unwrap();
    assert_eq!(m.flavor.name, "first");
    assert_eq!(m.matched_media.len(), 1);
}

#[test]
fn order_wins_over_checksum_correctness() {
    // Flavor A is size-admissible and declared first, so it is chosen without
    // hashing even though the file's content belongs to flavor B.
    let catalog = catalog(
        "X",
        vec![
            Flavor::new("A", vec![media("a.iso", 100, 'a')]),
            Flavor::new("B", vec![media("b.iso", 100, 'b')]),
        ],
    );
    let candidates = CandidateSet::from_entries([("f1", 100)]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[("f1", 'b')]));

    let m = resolver
        .resolve_candidates(&candidates, "X", &catalog, false)
        .unwrap();
    assert_eq!(m.flavor.name, "A");
    assert_eq!(m.verification, Verification::SizeOnly);
    assert_eq!(m.matched_media.len(), 1);
    assert_eq!(resolver.provider().calls(), 0);
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn unknown_release_lists_known_releases() {
    let catalog = catalog("7", vec![Flavor::new("A", vec![media("a.iso", 1, 'a')])]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[]));
    let err = resolver
        .resolve_candidates(&CandidateSet::from_entries([("/a", 1)]), "9", &catalog, false)
        .unwrap_err();
    assert!(err.to_string().contains("known releases: 7"));
}

#[test]
fn hash_failure_propagates() {
    let catalog = catalog("7", vec![Flavor::new("A", vec![media("a.iso", 1, 'a')])]);
    let resolver = Resolver::with_provider(CountingHasher::new(&[]));
    let err = resolver
        .resolve_candidates(&CandidateSet::from_entries([("/a", 1)]), "7", &catalog, true)
        .unwrap_err();
    match err {
        ResolveError::Io { path, .. } => assert_eq!(path, PathBuf::from("/a")),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn cancelled_resolution_surfaces_cancelled() {
    let catalog = catalog("7", vec![Flavor::new("A", vec![media("a.iso", 1, 'a')])]);
    let token = CancelToken::new();
    let resolver = Resolver::with_provider(CountingHasher::new(&[("/a", 'a')]))
        .with_cancel_token(token.clone());
    token.cancel();

    let err = resolver
        .resolve_candidates(&CandidateSet::from_entries([("/a", 1)]), "7", &catalog, true)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Cancelled { .. }));
    assert_eq!(resolver.provider().calls(), 0);
}
