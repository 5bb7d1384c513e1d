//! Catalog files: YAML (default) or JSON, keyed by release then flavor.
//!
//! ```yaml
//! "7":
//!   centos-7-x86_64:
//!     - name: CentOS-7-x86_64-DVD-2009.iso
//!       size: 4712300544
//!       checksum: e33d7b1ea7a9e2f38c8f693215dd85254c3a4fe446f93f563279715b68d07987
//! ```
//!
//! Flavor order within a release is the order written in the file.

use std::path::Path;

use tracing::debug;

use crate::domain::{CatalogError, ReleaseCatalog};

pub fn load_catalog(path: &Path) -> Result<ReleaseCatalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let catalog = if is_json {
        parse_json_catalog(&content)?
    } else {
        parse_yaml_catalog(&content)?
    };

    debug!(path = %path.display(), releases = catalog.release_ids().len(), "catalog loaded");
    Ok(catalog)
}

pub fn parse_yaml_catalog(content: &str) -> Result<ReleaseCatalog, CatalogError> {
    validate(serde_yaml::from_str(content)?)
}

pub fn parse_json_catalog(content: &str) -> Result<ReleaseCatalog, CatalogError> {
    validate(serde_json::from_str(content)?)
}

fn validate(catalog: ReleaseCatalog) -> Result<ReleaseCatalog, CatalogError> {
    if let Some((release, _)) = catalog.iter().find(|(_, target)| target.is_empty()) {
        return Err(CatalogError::EmptyRelease(release.to_string()));
    }
    Ok(catalog)
}
