//! Recursive `include` processing
//!
//! Includes are expanded depth first. Every include failure is logged and
//! skipped; a broken include never fails the document that names it.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::format::{ConfigFormat, load_raw};
use crate::raw::RawDocument;
use crate::reference::{ReferenceResolver, is_package_reference};
use crate::script::ScriptEvaluator;
use crate::Result;

/// Nesting limit for include chains.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// The outcome of expanding one document's includes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expanded {
    /// The document with every include merged in and `include` removed
    pub document: RawDocument,
    /// Included files in the order they finished loading, children first
    pub sources: Vec<String>,
}

/// Expands `include` directives in raw documents.
pub struct IncludeProcessor<'a> {
    references: &'a ReferenceResolver<'a>,
    scripts: &'a dyn ScriptEvaluator,
    max_depth: usize,
}

impl<'a> IncludeProcessor<'a> {
    pub fn new(references: &'a ReferenceResolver<'a>, scripts: &'a dyn ScriptEvaluator) -> Self {
        Self {
            references,
            scripts,
            max_depth: MAX_INCLUDE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand the includes of `document`.
    ///
    /// Relative references resolve against `base_dir`. `in_progress` holds
    /// the resolved paths already open on the current include chain; an
    /// include naming one of them is skipped as circular.
    pub fn process(
        &self,
        document: &RawDocument,
        base_dir: &Path,
        in_progress: &HashSet<String>,
    ) -> Expanded {
        self.process_at(document, base_dir, in_progress, 0)
    }

    fn process_at(
        &self,
        document: &RawDocument,
        base_dir: &Path,
        in_progress: &HashSet<String>,
        depth: usize,
    ) -> Expanded {
        let mut accumulated = document.clone();
        let Some(include) = accumulated.remove("include") else {
            return Expanded {
                document: accumulated,
                sources: Vec::new(),
            };
        };

        let references = match include {
            Value::String(reference) => vec![reference],
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(reference) => Some(reference),
                    other => {
                        tracing::warn!(entry = %other, "Ignoring non-string include entry");
                        None
                    }
                })
                .collect(),
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(include = %other, "Ignoring include that is neither a string nor a list");
                Vec::new()
            }
        };

        let mut sources = Vec::new();
        for reference in references {
            match self.include_one(&reference, base_dir, in_progress, depth) {
                Ok(Some(expanded)) => {
                    accumulated = accumulated.merge(&expanded.document);
                    sources.extend(expanded.sources);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(%reference, error = %e, "Failed to process include");
                }
            }
        }

        Expanded {
            document: accumulated,
            sources,
        }
    }

    /// Load and expand one include. `Ok(None)` means it was skipped.
    fn include_one(
        &self,
        reference: &str,
        base_dir: &Path,
        in_progress: &HashSet<String>,
        depth: usize,
    ) -> Result<Option<Expanded>> {
        let path = self.references.resolve(reference, base_dir)?;
        let key = path.to_string_lossy().into_owned();

        if in_progress.contains(&key) {
            tracing::warn!(path = %key, "Circular include detected, skipping");
            return Ok(None);
        }
        if !is_package_reference(reference) && !path.exists() {
            tracing::warn!(path = %key, "Include file not found");
            return Ok(None);
        }
        let Some(format) = ConfigFormat::from_path(&path) else {
            tracing::warn!(path = %key, "Unsupported include file type");
            return Ok(None);
        };
        if depth + 1 > self.max_depth {
            tracing::warn!(path = %key, max_depth = self.max_depth, "Include nesting too deep, skipping");
            return Ok(None);
        }

        tracing::debug!(path = %key, depth, "Processing include");
        let included = load_raw(&path, format, self.scripts)?;

        let mut branch = in_progress.clone();
        branch.insert(key.clone());
        let nested_dir = path.parent().unwrap_or(Path::new(""));
        let mut expanded = self.process_at(&included, nested_dir, &branch, depth + 1);
        expanded.sources.push(key);
        Ok(Some(expanded))
    }
}
