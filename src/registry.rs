//! Field registry: the static table of configurable settings.
//!
//! Every setting is declared once with its type and an optional explicit default.
//! Defaults are attached at construction time, so looking one up never involves
//! matching names at resolution time.

use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A concrete field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Bool(_) => FieldType::Boolean,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Which table a field is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSet {
    /// Connection settings shared by every migration goal.
    Base,
    /// Change-log settings that can also come from a properties file.
    Configurable,
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSet::Base => write!(f, "base"),
            FieldSet::Configurable => write!(f, "configurable"),
        }
    }
}

/// A named configurable setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    /// Value currently held; `None` when nothing has been injected.
    pub current: Option<FieldValue>,
    /// Registered default, used to tell host-injected values from user choices.
    pub default: Option<FieldValue>,
    pub set: FieldSet,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, set: FieldSet) -> Self {
        Self {
            name: name.into(),
            field_type,
            current: None,
            default: None,
            set,
            required: false,
        }
    }

    pub fn text(name: impl Into<String>, set: FieldSet) -> Self {
        Self::new(name, FieldType::Text, set)
    }

    pub fn boolean(name: impl Into<String>, set: FieldSet) -> Self {
        Self::new(name, FieldType::Boolean, set)
    }

    /// Register a default. The current value starts out equal to it, as the host
    /// would inject its declared default value.
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        self.current = Some(value.clone());
        self.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check that `value` can be stored in this field.
    pub fn check_type(&self, value: &FieldValue) -> ConfigResult<()> {
        if value.field_type() == self.field_type {
            Ok(())
        } else {
            Err(ConfigError::field_access(
                &self.name,
                format!(
                    "expected a {} value, got {} '{}'",
                    self.field_type,
                    value.field_type(),
                    value
                ),
            ))
        }
    }
}

/// Shared connection settings.
pub fn base_fields() -> Vec<Field> {
    vec![
        Field::text("driver", FieldSet::Base),
        Field::text("url", FieldSet::Base),
        Field::text("username", FieldSet::Base),
        Field::text("password", FieldSet::Base),
        Field::boolean("promptOnNonLocalDatabase", FieldSet::Base).with_default(true),
    ]
}

/// Change-log settings.
pub fn configurable_fields() -> Vec<Field> {
    vec![
        Field::text("changeLogFile", FieldSet::Configurable).required(),
        Field::boolean("dropFirst", FieldSet::Configurable).with_default(false),
        Field::text("contexts", FieldSet::Configurable).with_default(""),
        Field::text("propertiesFile", FieldSet::Configurable),
        Field::boolean("propertyFileWillOverride", FieldSet::Configurable).with_default(false),
    ]
}

/// The complete set of fields for one resolution session.
#[derive(Debug, Clone)]
pub struct Registry {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry, rejecting duplicate names and mistyped defaults.
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> ConfigResult<Self> {
        let fields: Vec<Field> = fields.into_iter().collect();
        let mut index = HashMap::with_capacity(fields.len());

        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
            if let Some(ref default) = field.default {
                field.check_type(default)?;
            }
        }

        Ok(Self { fields, index })
    }

    /// Base and configurable fields together.
    pub fn standard() -> Self {
        let fields = base_fields().into_iter().chain(configurable_fields());
        // The built-in tables have unique names and correctly typed defaults.
        Self::from_fields(fields).unwrap_or_else(|e| unreachable!("standard registry: {}", e))
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn lookup(&self, name: &str) -> ConfigResult<&Field> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
    }

    pub fn lookup_mut(&mut self, name: &str) -> ConfigResult<&mut Field> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.fields[i]),
            None => Err(ConfigError::UnknownField(name.to_string())),
        }
    }

    /// The registered default for `field`, if one exists.
    pub fn default_of<'a>(&'a self, field: &'a Field) -> Option<&'a FieldValue> {
        field.default.as_ref()
    }

    /// Assign a current value on behalf of the host.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> ConfigResult<()> {
        let value = value.into();
        let field = self.lookup_mut(name)?;
        field.check_type(&value)?;
        field.current = Some(value);
        Ok(())
    }

    /// Clear a field's current value.
    pub fn unset(&mut self, name: &str) -> ConfigResult<()> {
        self.lookup_mut(name)?.current = None;
        Ok(())
    }

    /// Current value of a text field, `None` when unset.
    pub fn text(&self, name: &str) -> ConfigResult<Option<&str>> {
        let field = self.lookup(name)?;
        match field.current {
            None => Ok(None),
            Some(FieldValue::Text(ref s)) => Ok(Some(s)),
            Some(ref other) => Err(ConfigError::field_access(
                name,
                format!("expected text, found {}", other.field_type()),
            )),
        }
    }

    /// Current value of a boolean field, falling back to `false` when unset.
    pub fn flag(&self, name: &str) -> ConfigResult<bool> {
        let field = self.lookup(name)?;
        match field.current {
            None => Ok(false),
            Some(FieldValue::Bool(b)) => Ok(b),
            Some(ref other) => Err(ConfigError::field_access(
                name,
                format!("expected boolean, found {}", other.field_type()),
            )),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
