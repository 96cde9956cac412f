//! Resolved settings handed to the migration engine.

use crate::error::{ConfigError, ConfigResult};
use crate::registry::Registry;
use anyhow::Result;
use serde::Serialize;
use tracing::info;

/// Database connection settings shared by every goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub prompt_on_non_local_database: bool,
}

/// Final, conflict-resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationSettings {
    pub change_log_file: String,
    pub drop_first: bool,
    pub contexts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties_file: Option<String>,
    pub properties_override: bool,
    pub connection: ConnectionSettings,
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

impl MigrationSettings {
    /// Read the settings out of a resolved registry.
    pub fn from_registry(registry: &Registry) -> ConfigResult<Self> {
        for field in registry.iter().filter(|f| f.required) {
            if field.current.is_none() {
                return Err(ConfigError::MissingRequired(field.name.clone()));
            }
        }

        let change_log_file = registry
            .text("changeLogFile")?
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ConfigError::MissingRequired("changeLogFile".to_string()))?;

        Ok(Self {
            change_log_file,
            drop_first: registry.flag("dropFirst")?,
            contexts: registry.text("contexts")?.unwrap_or_default().to_string(),
            properties_file: owned(registry.text("propertiesFile")?),
            properties_override: registry.flag("propertyFileWillOverride")?,
            connection: ConnectionSettings {
                driver: owned(registry.text("driver")?),
                url: owned(registry.text("url")?),
                username: owned(registry.text("username")?),
                password: owned(registry.text("password")?),
                prompt_on_non_local_database: registry.flag("promptOnNonLocalDatabase")?,
            },
        })
    }

    /// Contexts split on commas, empty entries dropped. Empty means all contexts.
    pub fn context_list(&self) -> Vec<&str> {
        self.contexts
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Log every setting at info level. The password is never printed.
    pub fn print_settings(&self, indent: &str) {
        let conn = &self.connection;
        info!("{}driver: {}", indent, conn.driver.as_deref().unwrap_or(""));
        info!("{}url: {}", indent, conn.url.as_deref().unwrap_or(""));
        info!("{}username: {}", indent, conn.username.as_deref().unwrap_or(""));
        info!(
            "{}password: {}",
            indent,
            if conn.password.is_some() { "*****" } else { "" }
        );
        info!(
            "{}prompt on non-local database? {}",
            indent, conn.prompt_on_non_local_database
        );
        info!(
            "{}properties file will override? {}",
            indent, self.properties_override
        );
        info!("{}changeLogFile: {}", indent, self.change_log_file);
        info!("{}drop first? {}", indent, self.drop_first);
        info!("{}context(s): {}", indent, self.contexts);
    }
}

/// The migration engine that consumes resolved settings.
pub trait Migrator {
    /// Drop every object in the target database.
    fn drop_all(&mut self) -> Result<()>;

    /// Restrict execution to the given contexts; empty means all.
    fn set_contexts(&mut self, contexts: &[&str]);

    /// Apply the change log.
    fn update(&mut self, change_log_file: &str) -> Result<()>;
}

/// Run a migration with the resolved settings.
pub fn perform_task(settings: &MigrationSettings, migrator: &mut dyn Migrator) -> Result<()> {
    if settings.drop_first {
        info!("Dropping all database objects before update");
        migrator.drop_all()?;
    }
    migrator.set_contexts(&settings.context_list());
    migrator.update(&settings.change_log_file)
}
