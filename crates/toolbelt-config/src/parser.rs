//! Validation of merged raw documents into [`ToolbeltConfig`]

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{ProfileConfig, ToolConfig, ToolbeltConfig, normalize_extensions};
use crate::raw::{RawDocument, value_kind};
use crate::{Error, Result};

/// Build a typed configuration from a fully merged raw document.
///
/// The result has no `sources`; the caller knows where the data came from,
/// the parser does not. Unknown top-level keys are ignored.
pub fn parse_toolbelt_config(raw: &RawDocument) -> Result<ToolbeltConfig> {
    let mut config = ToolbeltConfig::default();

    if let Some(profiles) = non_null(raw.get("profiles")) {
        let Value::Object(profiles) = profiles else {
            return Err(Error::validation(format!(
                "profiles must be a mapping, found {}",
                value_kind(profiles)
            )));
        };
        for (name, value) in profiles {
            config
                .profiles
                .insert(name.clone(), parse_profile(name, value)?);
        }
    }

    if let Some(value) = non_null(raw.get("global_exclude_patterns")) {
        config.global_exclude_patterns = deserialize(value, "global_exclude_patterns")?;
    }

    if let Some(value) = non_null(raw.get("variables")) {
        config.variables = parse_variables(value)?;
    }

    Ok(config)
}

fn parse_profile(name: &str, value: &Value) -> Result<ProfileConfig> {
    let context = format!("profile '{name}'");
    if !value.is_object() {
        return Err(Error::validation(format!(
            "{context} must be a mapping, found {}",
            value_kind(value)
        )));
    }

    let mut profile: ProfileConfig = deserialize(value, &context)?;
    profile.name = name.to_string();

    if profile.extensions.iter().any(String::is_empty) {
        return Err(Error::validation(format!(
            "{context}: extensions must not be empty strings"
        )));
    }
    profile.extensions = normalize_extensions(&profile.extensions);

    profile.check_tools = validate_tools(profile.check_tools, &context, "check_tools")?;
    profile.format_tools = validate_tools(profile.format_tools, &context, "format_tools")?;

    Ok(profile)
}

fn validate_tools(tools: Vec<ToolConfig>, context: &str, list: &str) -> Result<Vec<ToolConfig>> {
    tools
        .into_iter()
        .enumerate()
        .map(|(i, tool)| tool.validate(&format!("{context} {list}[{i}]")))
        .collect()
}

/// Variables are strings; scalar numbers and booleans are stringified.
fn parse_variables(value: &Value) -> Result<BTreeMap<String, String>> {
    let Value::Object(map) = value else {
        return Err(Error::validation(format!(
            "variables must be a mapping, found {}",
            value_kind(value)
        )));
    };

    map.iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::validation(format!(
                        "variable '{name}' must be a string, found {}",
                        value_kind(other)
                    )));
                }
            };
            Ok((name.clone(), text))
        })
        .collect()
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn deserialize<T: DeserializeOwned>(value: &Value, context: &str) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| Error::validation(format!("{context}: {e}")))
}
