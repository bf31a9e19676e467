//! Turning configuration references into filesystem paths
//!
//! Supported forms, checked in this order:
//!
//! - `@package:path/in/package` - a package resource
//! - `~/path` - relative to the user's home directory
//! - `/abs/path` - used as is
//! - anything else - relative to the including file's directory

use std::path::{Path, PathBuf};

use crate::resources::{ResourceResolver, resolve_package_reference};
use crate::{Error, Result};

/// Whether `reference` is routed to the package-resource resolver.
pub fn is_package_reference(reference: &str) -> bool {
    reference.starts_with('@')
}

/// Resolves references relative to a base directory.
pub struct ReferenceResolver<'a> {
    resources: &'a dyn ResourceResolver,
    home: Option<PathBuf>,
}

impl<'a> ReferenceResolver<'a> {
    /// A resolver using the platform home directory for `~/`.
    pub fn new(resources: &'a dyn ResourceResolver) -> Self {
        Self {
            resources,
            home: dirs::home_dir(),
        }
    }

    /// Expand `~/` against `home` instead of the platform home directory.
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Resolve `reference` to a path.
    ///
    /// Only package references are checked for existence here; callers
    /// decide what a missing plain path means. An empty reference resolves
    /// to `base_dir` itself.
    pub fn resolve(&self, reference: &str, base_dir: &Path) -> Result<PathBuf> {
        if is_package_reference(reference) {
            return resolve_package_reference(reference, self.resources);
        }
        if let Some(rest) = reference.strip_prefix("~/") {
            let home = self.home.as_ref().ok_or(Error::HomeNotFound)?;
            return Ok(home.join(rest));
        }
        if reference.starts_with('/') {
            return Ok(PathBuf::from(reference));
        }
        if reference.is_empty() {
            return Ok(base_dir.to_path_buf());
        }
        Ok(base_dir.join(reference))
    }
}
