//! One resolution session: properties loading, resolution, settings.

use crate::error::ConfigResult;
use crate::opener::{ResourceOpener, load_properties};
use crate::registry::Registry;
use crate::resolver::{ConfigResolver, ResolutionPolicy};
use crate::settings::MigrationSettings;
use tracing::info;

/// Load the properties file named by `propertiesFile`, if any, and resolve it
/// into `registry` only for values the user has not already specified.
pub fn configure(registry: &mut Registry, opener: &dyn ResourceOpener) -> ConfigResult<()> {
    let Some(path) = registry.text("propertiesFile")?.map(str::to_string) else {
        return Ok(());
    };

    info!(path = %path, "Loading settings from properties file");
    let source = load_properties(opener, &path)?;
    let policy = ResolutionPolicy::from_registry(registry)?;
    info!(
        entries = source.len(),
        properties_override = policy.properties_override,
        "Resolving properties file entries"
    );
    ConfigResolver::new(policy).resolve(registry, &source)
}

/// Owns the registry for a single invocation.
pub struct Session {
    registry: Registry,
}

impl Session {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Resolve the properties file and produce the final settings.
    pub fn run(mut self, opener: &dyn ResourceOpener) -> ConfigResult<MigrationSettings> {
        configure(&mut self.registry, opener)?;
        let settings = MigrationSettings::from_registry(&self.registry)?;
        info!("Settings resolved");
        settings.print_settings("    ");
        Ok(settings)
    }
}
