//! Populates registry fields from host parameters before resolution.

use crate::error::{ConfigError, ConfigResult};
use crate::registry::{Field, FieldType, FieldValue, Registry};
use crate::resolver::coerce;
use heck::ToShoutySnakeCase;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Prefix for per-field environment overrides.
pub const ENV_PREFIX: &str = "MIGRATE_";

/// Environment variable that overrides `field_name`, e.g. `MIGRATE_CHANGE_LOG_FILE`.
pub fn env_var_name(field_name: &str) -> String {
    format!("{}{}", ENV_PREFIX, field_name.to_shouty_snake_case())
}

/// Convert a host parameter to the field's type. `Ok(None)` means "not specified".
pub fn value_for(field: &Field, value: &Value) -> ConfigResult<Option<FieldValue>> {
    let converted = match (field.field_type, value) {
        (_, Value::Null) => return Ok(None),
        (FieldType::Boolean, Value::Bool(b)) => FieldValue::Bool(*b),
        (field_type, Value::String(s)) => coerce(field_type, s),
        (FieldType::Text, Value::Number(n)) => FieldValue::Text(n.to_string()),
        (FieldType::Text, Value::Array(items)) => {
            let parts = items
                .iter()
                .map(|item| scalar_text(field, item))
                .collect::<ConfigResult<Vec<_>>>()?;
            FieldValue::Text(parts.join(","))
        }
        (field_type, other) => {
            return Err(ConfigError::field_access(
                &field.name,
                format!("cannot assign {} to a {} field", describe(other), field_type),
            ));
        }
    };
    Ok(Some(converted))
}

fn scalar_text(field: &Field, value: &Value) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::field_access(
            &field.name,
            format!("list entries must be scalars, got {}", describe(other)),
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

/// Assign every parameter to its field. Unknown names fail the whole call.
pub fn inject_parameters(
    registry: &mut Registry,
    parameters: &BTreeMap<String, Value>,
) -> ConfigResult<()> {
    for (name, value) in parameters {
        let field = registry.lookup(name)?;
        if let Some(converted) = value_for(field, value)? {
            debug!(key = %name, value = %converted, "Host parameter");
            registry.set(name, converted)?;
        }
    }
    Ok(())
}

/// Assign raw string values, e.g. from `-D name=value` flags.
pub fn inject_raw<'a>(
    registry: &mut Registry,
    assignments: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> ConfigResult<()> {
    for (name, raw) in assignments {
        let field_type = registry.lookup(name)?.field_type;
        registry.set(name, coerce(field_type, raw))?;
    }
    Ok(())
}

/// Apply `MIGRATE_<FIELD>` overrides found through `lookup`. Returns the fields set.
pub fn apply_env_overrides(
    registry: &mut Registry,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<Vec<String>> {
    let found: Vec<(String, String)> = registry
        .names()
        .filter_map(|name| lookup(&env_var_name(name)).map(|raw| (name.to_string(), raw)))
        .collect();

    for (name, _) in &found {
        debug!(key = %name, var = %env_var_name(name), "Environment override");
    }
    inject_raw(
        registry,
        found.iter().map(|(n, v)| (n.as_str(), v.as_str())),
    )?;
    Ok(found.into_iter().map(|(name, _)| name).collect())
}
