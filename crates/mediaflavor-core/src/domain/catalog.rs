//! Catalog model: releases, their flavors, and each flavor's expected media.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::checksum::Checksum;

/// One file a flavor expects to find on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedMedia {
    pub name: String,
    pub size: u64,
    pub checksum: Checksum,
}

impl ExpectedMedia {
    pub fn new(name: impl Into<String>, size: u64, checksum: Checksum) -> Self {
        Self {
            name: name.into(),
            size,
            checksum,
        }
    }
}

/// A recognized OS/architecture/variant combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flavor {
    pub name: String,
    pub media: Vec<ExpectedMedia>,
}

impl Flavor {
    pub fn new(name: impl Into<String>, media: Vec<ExpectedMedia>) -> Self {
        Self {
            name: name.into(),
            media,
        }
    }

    /// Expected sizes with duplicates preserved, in declaration order.
    pub fn expected_sizes(&self) -> Vec<u64> {
        self.media.iter().map(|m| m.size).collect()
    }

    pub fn unique_sizes(&self) -> BTreeSet<u64> {
        self.media.iter().map(|m| m.size).collect()
    }

    pub fn expected_checksums(&self) -> BTreeSet<Checksum> {
        self.media.iter().map(|m| m.checksum).collect()
    }

    /// True when two or more media share a size, so size alone cannot tell
    /// them apart.
    pub fn has_duplicate_sizes(&self) -> bool {
        self.unique_sizes().len() != self.media.len()
    }
}

/// The flavors of one release, in priority order.
///
/// Deserializes from a mapping of flavor name to media list, keeping the
/// document's key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseTarget {
    flavors: Vec<Flavor>,
}

impl ReleaseTarget {
    pub fn new(flavors: Vec<Flavor>) -> Self {
        Self { flavors }
    }

    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    pub fn len(&self) -> usize {
        self.flavors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty()
    }
}

impl<'de> Deserialize<'de> for ReleaseTarget {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedFlavors;

        impl<'de> Visitor<'de> for OrderedFlavors {
            type Value = ReleaseTarget;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of flavor name to expected media")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut flavors = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, media)) = access.next_entry::<String, Vec<ExpectedMedia>>()? {
                    if flavors.iter().any(|f: &Flavor| f.name == name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate flavor {name:?}"
                        )));
                    }
                    flavors.push(Flavor { name, media });
                }
                Ok(ReleaseTarget { flavors })
            }
        }

        deserializer.deserialize_map(OrderedFlavors)
    }
}

/// Release identifier to release target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReleaseCatalog {
    releases: BTreeMap<String, ReleaseTarget>,
}

impl ReleaseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, release: impl Into<String>, target: ReleaseTarget) {
        self.releases.insert(release.into(), target);
    }

    pub fn target(&self, release: &str) -> Option<&ReleaseTarget> {
        self.releases.get(release)
    }

    pub fn release_ids(&self) -> Vec<String> {
        self.releases.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReleaseTarget)> {
        self.releases.iter().map(|(k, v)| (k.as_str(), v))
    }
}
