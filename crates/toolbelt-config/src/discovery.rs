//! Locating configuration sources for a working directory

use std::path::{Path, PathBuf};

use crate::reference::{ReferenceResolver, is_package_reference};

/// Project manifest that may declare `[tool.toolbelt] include = [...]`.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Standalone config names, in priority order.
pub const STANDALONE_CONFIG_FILES: &[&str] = &["toolbelt.yaml", "toolbelt.yml", "toolbelt.py"];

/// Read the `[tool.toolbelt]` table of a `pyproject.toml`.
///
/// A missing, unreadable, or malformed manifest, or one without the table,
/// yields `None`.
pub fn load_pyproject_toml(path: &Path) -> Option<toml::Table> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(?path, error = %e, "No readable project manifest");
            return None;
        }
    };

    let mut manifest: toml::Table = match toml::from_str(&content) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!(?path, error = %e, "Ignoring malformed project manifest");
            return None;
        }
    };

    match manifest.remove("tool")? {
        toml::Value::Table(mut tool) => match tool.remove("toolbelt")? {
            toml::Value::Table(section) => Some(section),
            _ => None,
        },
        _ => None,
    }
}

/// Find the ordered list of configuration files to load.
///
/// An explicit path is used alone when it exists. Otherwise the project
/// manifest's include list wins when it yields anything, and the first
/// standalone config file found is the last resort.
pub fn find_config_sources(
    explicit: Option<&Path>,
    cwd: &Path,
    references: &ReferenceResolver<'_>,
) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        return if path.exists() {
            vec![path]
        } else {
            tracing::debug!(?path, "Explicit config file does not exist");
            Vec::new()
        };
    }

    let from_manifest = manifest_sources(&cwd.join(PYPROJECT_FILE), cwd, references);
    if !from_manifest.is_empty() {
        return from_manifest;
    }

    STANDALONE_CONFIG_FILES
        .iter()
        .map(|name| cwd.join(name))
        .find(|path| path.exists())
        .into_iter()
        .collect()
}

fn manifest_sources(
    manifest: &Path,
    cwd: &Path,
    references: &ReferenceResolver<'_>,
) -> Vec<PathBuf> {
    let Some(section) = load_pyproject_toml(manifest) else {
        return Vec::new();
    };

    let entries: Vec<&str> = match section.get("include") {
        Some(toml::Value::Array(items)) => items.iter().filter_map(toml::Value::as_str).collect(),
        Some(toml::Value::String(single)) => vec![single.as_str()],
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|reference| match references.resolve(reference, cwd) {
            Ok(path) if is_package_reference(reference) || path.exists() => Some(path),
            Ok(path) => {
                tracing::warn!(%reference, ?path, "Config file declared in manifest not found");
                None
            }
            Err(e) => {
                tracing::warn!(%reference, error = %e, "Failed to resolve manifest include");
                None
            }
        })
        .collect()
}
