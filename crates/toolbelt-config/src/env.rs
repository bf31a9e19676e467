//! Environment snapshot used for variable overlays

use std::collections::BTreeMap;

/// Name prefixes whose variables may override configuration variables.
///
/// Anything else in the process environment stays out of emitted command
/// lines unless a config value references it explicitly.
pub const ALLOWED_PREFIXES: &[&str] = &["TOOLBELT_", "TB_", "TBELT_", "CI_", "BUILD_"];

/// An immutable copy of environment variables.
///
/// The loader reads the process environment once through
/// [`Environment::from_process`]; tests build one from pairs instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment.
    ///
    /// Variables that are not valid Unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Unfiltered lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Every variable, unfiltered.
    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Only the variables whose names start with an allowed prefix.
    pub fn overlay(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .filter(|(name, _)| is_overlay_name(name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Whether `name` may take part in the variable overlay.
pub fn is_overlay_name(name: &str) -> bool {
    ALLOWED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_filters_by_prefix() {
        let env = Environment::from_iter([
            ("TOOLBELT_RUFF_VERSION", "0.5.0"),
            ("CI_JOB", "42"),
            ("HOME", "/home/dev"),
            ("AWS_SECRET_ACCESS_KEY", "hunter2"),
        ]);

        let overlay = env.overlay();
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay["TOOLBELT_RUFF_VERSION"], "0.5.0");
        assert_eq!(overlay["CI_JOB"], "42");
        assert!(!overlay.contains_key("HOME"));
    }

    #[test]
    fn get_is_unfiltered() {
        let env = Environment::from_iter([("HOME", "/home/dev")]);
        assert_eq!(env.get("HOME"), Some("/home/dev"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn prefix_must_match_at_start() {
        assert!(is_overlay_name("TB_X"));
        assert!(!is_overlay_name("MY_TB_X"));
        assert!(!is_overlay_name("tb_x"));
    }
}
