//! Package resources and `@package:path` references
//!
//! A package reference names a file bundled with an installed component
//! rather than a location on disk. Turning one into a path is delegated to a
//! [`ResourceResolver`], which the loader receives as a capability.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Package name under which the bundled presets are registered.
pub const BUILTIN_PACKAGE: &str = "toolbelt";

/// Resources compiled into the binary for [`BUILTIN_PACKAGE`].
const BUILTIN_RESOURCES: &[(&str, &str)] = &[
    (
        "resources/toolbelt.yaml",
        include_str!("../resources/toolbelt.yaml"),
    ),
    (
        "resources/presets/hdw.yaml",
        include_str!("../resources/presets/hdw.yaml"),
    ),
    (
        "resources/presets/python.yaml",
        include_str!("../resources/presets/python.yaml"),
    ),
    (
        "resources/presets/web.yaml",
        include_str!("../resources/presets/web.yaml"),
    ),
    (
        "resources/presets/yaml.yaml",
        include_str!("../resources/presets/yaml.yaml"),
    ),
];

/// Maps a symbolic package resource to a readable file.
pub trait ResourceResolver {
    /// Return a path to `resource` inside `package`.
    ///
    /// The path must exist when this returns `Ok`.
    fn resolve(&self, package: &str, resource: &str) -> Result<PathBuf>;
}

/// Split `@package:path` into its two halves.
pub fn validate_package_reference(reference: &str) -> Result<(&str, &str)> {
    let invalid = |reason: &str| Error::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };

    let body = reference
        .strip_prefix('@')
        .ok_or_else(|| invalid("package references must start with @"))?;

    match body.split_once(':') {
        Some((package, resource))
            if !package.is_empty() && !resource.is_empty() && !resource.contains(':') =>
        {
            Ok((package, resource))
        }
        _ => Err(invalid("Expected format @package:path")),
    }
}

/// Whether `reference` is a syntactically valid package reference.
pub fn is_package_resource_reference(reference: &str) -> bool {
    validate_package_reference(reference).is_ok()
}

/// Validate `reference` and hand it to `resolver`.
pub fn resolve_package_reference(
    reference: &str,
    resolver: &dyn ResourceResolver,
) -> Result<PathBuf> {
    let (package, resource) = validate_package_reference(reference)?;
    resolver.resolve(package, resource)
}

/// Where a registered package keeps its files.
#[derive(Debug, Clone)]
enum PackageSource {
    /// Installed on disk; files are returned in place
    Directory(PathBuf),
    /// In memory; files are extracted on demand
    Embedded(BTreeMap<String, Cow<'static, [u8]>>),
}

/// The default [`ResourceResolver`].
///
/// Packages are registered either as directories (real files, returned as
/// they are) or as in-memory bundles that get extracted to a temp file.
/// [`PackageResources::new`] registers the bundled `toolbelt` presets.
#[derive(Debug, Clone)]
pub struct PackageResources {
    packages: BTreeMap<String, PackageSource>,
    extract_dir: PathBuf,
}

impl Default for PackageResources {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageResources {
    /// Resources with the built-in `toolbelt` package registered.
    pub fn new() -> Self {
        let builtin = BUILTIN_RESOURCES
            .iter()
            .map(|(path, content)| (path.to_string(), Cow::Borrowed(content.as_bytes())))
            .collect();

        let mut packages = BTreeMap::new();
        packages.insert(BUILTIN_PACKAGE.to_string(), PackageSource::Embedded(builtin));

        Self {
            packages,
            extract_dir: std::env::temp_dir(),
        }
    }

    /// Resources with no packages at all.
    pub fn empty() -> Self {
        Self {
            packages: BTreeMap::new(),
            extract_dir: std::env::temp_dir(),
        }
    }

    /// Register (or replace) a package backed by a directory.
    pub fn with_directory(mut self, package: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.packages
            .insert(package.into(), PackageSource::Directory(root.into()));
        self
    }

    /// Register (or replace) an in-memory package.
    pub fn with_files<I, P, C>(mut self, package: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| (path.into(), Cow::Owned(content.into())))
            .collect();
        self.packages
            .insert(package.into(), PackageSource::Embedded(files));
        self
    }

    /// Extract embedded resources under `dir` instead of the system temp dir.
    pub fn with_extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_dir = dir.into();
        self
    }
}

impl ResourceResolver for PackageResources {
    fn resolve(&self, package: &str, resource: &str) -> Result<PathBuf> {
        let source = self
            .packages
            .get(package)
            .ok_or_else(|| Error::UnknownPackage {
                package: package.to_string(),
            })?;

        let relative = Path::new(resource);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::InvalidReference {
                reference: format!("@{package}:{resource}"),
                reason: "resource paths must stay inside the package".to_string(),
            });
        }

        let not_found = || Error::ResourceNotFound {
            package: package.to_string(),
            resource: resource.to_string(),
        };

        match source {
            PackageSource::Directory(root) => {
                let path = root.join(relative);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(not_found())
                }
            }
            PackageSource::Embedded(files) => {
                let content = files.get(resource).ok_or_else(not_found)?;
                extract_resource_to_temp_file(&self.extract_dir, content, package, resource)
            }
        }
    }
}

/// Write `content` to `{package}_{digest}_{basename}` under `dir`.
///
/// The name is derived from the content, so repeated extraction of the
/// same resource reuses one file. Writes go through a temp file that is
/// renamed into place.
pub fn extract_resource_to_temp_file(
    dir: &Path,
    content: &[u8],
    package: &str,
    resource: &str,
) -> Result<PathBuf> {
    let basename = Path::new(resource)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| resource.to_string());

    let mut hasher = Sha256::new();
    hasher.update(package.as_bytes());
    hasher.update(b":");
    hasher.update(resource.as_bytes());
    hasher.update(content);
    let digest = format!("{:x}", hasher.finalize());

    let target = dir.join(format!("{package}_{}_{basename}", &digest[..16]));
    if target.is_file() {
        return Ok(target);
    }

    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    temp.write_all(content)
        .map_err(|e| Error::io(temp.path().to_path_buf(), e))?;
    temp.persist(&target)
        .map_err(|e| Error::io(&target, e.error))?;

    tracing::debug!(?target, package, resource, "Extracted package resource");
    Ok(target)
}
