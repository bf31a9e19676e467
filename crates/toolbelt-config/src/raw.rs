//! Loosely typed configuration documents
//!
//! A [`RawDocument`] is what a single file (or a merged include tree) looks
//! like before validation. Only the document-level merge rule lives here;
//! field-aware merging of loaded configurations is
//! [`crate::ToolbeltConfig::merge`].

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Keys with non-replacing merge behaviour.
const PROFILES: &str = "profiles";
const GLOBAL_EXCLUDES: &str = "global_exclude_patterns";
const VARIABLES: &str = "variables";

/// A top-level configuration mapping prior to validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument(Map<String, Value>);

impl RawDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a parsed value. `null` counts as an empty document.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(Error::NotAMapping {
                found: value_kind(&other).to_string(),
            }),
        }
    }

    /// Parse YAML text. Empty and comment-only documents are empty mappings.
    ///
    /// `<<` merge keys are expanded before conversion.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let blank = content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::new());
        }
        let mut yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        yaml.apply_merge()?;
        Self::from_value(serde_json::to_value(yaml)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Layer `other` over `self`, returning a new document.
    ///
    /// - `profiles`: entries are combined by name; a colliding profile is
    ///   replaced wholesale by `other`'s entry.
    /// - `global_exclude_patterns`: `self`'s list followed by `other`'s.
    /// - `variables`: combined by name, `other` wins.
    /// - anything else: `other`'s value replaces `self`'s.
    pub fn merge(&self, other: &RawDocument) -> RawDocument {
        let mut merged = self.0.clone();

        for (key, value) in &other.0 {
            let combined = match (key.as_str(), merged.get(key), value) {
                (PROFILES | VARIABLES, Some(Value::Object(base)), Value::Object(over)) => {
                    let mut map = base.clone();
                    map.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
                    Value::Object(map)
                }
                (GLOBAL_EXCLUDES, Some(Value::Array(base)), Value::Array(over)) => {
                    Value::Array([base.as_slice(), over.as_slice()].concat())
                }
                _ => value.clone(),
            };
            merged.insert(key.clone(), combined);
        }

        RawDocument(merged)
    }
}

impl From<Map<String, Value>> for RawDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Human readable name of a JSON value's type.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
