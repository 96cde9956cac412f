//! Applies a properties source to a field registry.
//!
//! For every properties key the resolver decides whether the field's current
//! value was chosen by the user. A user choice is kept unless the session asked
//! for properties to override everything; otherwise the properties value is
//! coerced to the field's type and stored.

use crate::error::{ConfigError, ConfigResult};
use crate::properties::PropertiesSource;
use crate::registry::{Field, FieldType, FieldValue, Registry};
use tracing::debug;

/// Session-wide precedence policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionPolicy {
    /// When set, properties values replace current values unconditionally.
    pub properties_override: bool,
}

impl ResolutionPolicy {
    pub fn new(properties_override: bool) -> Self {
        Self {
            properties_override,
        }
    }

    /// Read the policy from the registry's `propertyFileWillOverride` field.
    pub fn from_registry(registry: &Registry) -> ConfigResult<Self> {
        Ok(Self::new(registry.flag("propertyFileWillOverride")?))
    }
}

/// Coerce a raw properties string into a value of `field_type`.
///
/// Booleans parse leniently: only a case-insensitive `true` is true.
pub fn coerce(field_type: FieldType, raw: &str) -> FieldValue {
    match field_type {
        FieldType::Boolean => FieldValue::Bool(raw.eq_ignore_ascii_case("true")),
        FieldType::Text => FieldValue::Text(raw.to_string()),
    }
}

/// Whether the field's current value counts as explicitly chosen.
///
/// Unset is never specified. A set value with no registered default always
/// counts as specified, even if the host only injected an empty value.
pub fn is_specified(registry: &Registry, field: &Field) -> ConfigResult<bool> {
    let Some(current) = field.current.as_ref() else {
        return Ok(false);
    };
    let Some(default) = registry.default_of(field) else {
        return Ok(true);
    };
    if current.field_type() != default.field_type() {
        return Err(ConfigError::default_lookup(
            &field.name,
            format!(
                "current value is {} but default is {}",
                current.field_type(),
                default.field_type()
            ),
        ));
    }
    Ok(current != default)
}

/// Resolves properties against a registry under a fixed policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigResolver {
    policy: ResolutionPolicy,
}

impl ConfigResolver {
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Apply every entry of `source` to `registry`.
    ///
    /// Stops at the first failing key. Fields applied before the failure keep
    /// their new values; nothing is rolled back.
    pub fn resolve(&self, registry: &mut Registry, source: &PropertiesSource) -> ConfigResult<()> {
        for (key, raw) in source.iter() {
            self.resolve_key(registry, key, raw)?;
        }
        Ok(())
    }

    /// Resolve one key. Returns whether the properties value was applied.
    pub fn resolve_key(&self, registry: &mut Registry, key: &str, raw: &str) -> ConfigResult<bool> {
        let field = registry.lookup(key)?;
        let apply = self.policy.properties_override || !is_specified(registry, field)?;

        if !apply {
            debug!(key = %key, "Keeping specified value, ignoring properties file entry");
            return Ok(false);
        }

        let value = coerce(field.field_type, raw);
        debug!(key = %key, value = %value, "Properties file setting value");
        let field = registry.lookup_mut(key)?;
        field.check_type(&value)?;
        field.current = Some(value);
        Ok(true)
    }
}

/// Convenience wrapper around [`ConfigResolver::resolve`].
pub fn resolve(
    registry: &mut Registry,
    source: &PropertiesSource,
    policy: ResolutionPolicy,
) -> ConfigResult<()> {
    ConfigResolver::new(policy).resolve(registry, source)
}
