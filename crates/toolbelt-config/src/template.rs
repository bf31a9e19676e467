//! `${NAME}` / `${NAME:default}` template expansion
//!
//! Expansion is a pure function of the template and a variables mapping.
//! Substituted values are never re-scanned, so a value that itself looks
//! like a placeholder is emitted literally.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)(?::([^}]*))?\}").unwrap());

/// Expand every placeholder in `template`, left to right.
///
/// A variable present in `variables` wins; otherwise the default clause is
/// used verbatim (it may contain `:`); otherwise the placeholder becomes the
/// empty string.
pub fn expand_string(template: &str, variables: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            match variables.get(name) {
                Some(value) => value.clone(),
                None => caps.get(2).map(|d| d.as_str().to_string()).unwrap_or_default(),
            }
        })
        .into_owned()
}

/// Whether `text` contains at least one placeholder.
pub(crate) fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Expand a list of argument templates into argument tokens.
///
/// Elements that contained placeholders are word-split with POSIX shell
/// quoting rules after expansion, so `${FLAGS}` holding `--a --b` yields two
/// arguments. Literal elements are passed through untouched. Empty results
/// are dropped, and a value with unbalanced quoting is kept as one argument.
pub fn expand_list(templates: &[String], variables: &BTreeMap<String, String>) -> Vec<String> {
    let mut out = Vec::with_capacity(templates.len());
    for template in templates {
        if !has_placeholders(template) {
            if !template.is_empty() {
                out.push(template.clone());
            }
            continue;
        }

        let expanded = expand_string(template, variables);
        if expanded.is_empty() {
            continue;
        }

        match shell_words::split(&expanded) {
            Ok(words) => out.extend(words.into_iter().filter(|w| !w.is_empty())),
            Err(e) => {
                tracing::debug!(value = %expanded, error = %e, "Keeping unsplittable argument as-is");
                out.push(expanded);
            }
        }
    }
    out
}
