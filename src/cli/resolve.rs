//! `resolve` command: layer host parameters, apply the properties file, print.

use super::{FormatArg, parse_assignment};
use crate::config::{ConfigLoader, apply_env_overrides, inject_parameters, inject_raw};
use crate::format::format_settings;
use crate::opener::{CompositeOpener, FileSystemOpener};
use crate::registry::{FieldValue, Registry};
use crate::session::Session;
use crate::settings::MigrationSettings;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the resolve command.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Change log file to apply
    #[arg(long)]
    pub change_log_file: Option<String>,

    /// Drop the database before applying the change log
    #[arg(long)]
    pub drop_first: Option<bool>,

    /// Comma-separated contexts to run (empty runs all)
    #[arg(long)]
    pub contexts: Option<String>,

    /// Properties file with further settings
    #[arg(long)]
    pub properties_file: Option<String>,

    /// Let the properties file override explicitly specified settings
    #[arg(long)]
    pub properties_override: Option<bool>,

    /// JDBC driver class
    #[arg(long)]
    pub driver: Option<String>,

    /// Database URL
    #[arg(long)]
    pub url: Option<String>,

    /// Database user
    #[arg(long)]
    pub username: Option<String>,

    /// Database password
    #[arg(long)]
    pub password: Option<String>,

    /// Ask before migrating a non-local database
    #[arg(long)]
    pub prompt_on_non_local_database: Option<bool>,

    /// Set any field by name, e.g. -D dropFirst=true (repeatable)
    #[arg(short = 'D', long = "param", value_parser = parse_assignment)]
    pub params: Vec<(String, String)>,

    /// Directory the properties file is resolved against
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

impl ResolveArgs {
    /// Named flags as (field name, value) pairs, in declaration order.
    fn named_flags(&self) -> Vec<(&'static str, FieldValue)> {
        let text = |name: &'static str, v: &Option<String>| {
            v.as_ref().map(|s| (name, FieldValue::Text(s.clone())))
        };
        let flag = |name: &'static str, v: Option<bool>| v.map(|b| (name, FieldValue::Bool(b)));

        [
            text("changeLogFile", &self.change_log_file),
            flag("dropFirst", self.drop_first),
            text("contexts", &self.contexts),
            text("propertiesFile", &self.properties_file),
            flag("propertyFileWillOverride", self.properties_override),
            text("driver", &self.driver),
            text("url", &self.url),
            text("username", &self.username),
            text("password", &self.password),
            flag("promptOnNonLocalDatabase", self.prompt_on_non_local_database),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Build the host-populated registry: defaults, YAML tiers, environment, flags.
pub fn build_registry(
    args: &ResolveArgs,
    loader: &ConfigLoader,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Registry> {
    let mut registry = Registry::standard();

    inject_parameters(&mut registry, &loader.config().parameters)
        .context("Invalid host parameter")?;

    let from_env = apply_env_overrides(&mut registry, env).context("Invalid environment override")?;
    if !from_env.is_empty() {
        debug!(fields = ?from_env, "Applied environment overrides");
    }

    for (name, value) in args.named_flags() {
        registry.set(name, value)?;
    }
    inject_raw(
        &mut registry,
        args.params.iter().map(|(n, v)| (n.as_str(), v.as_str())),
    )
    .context("Invalid -D parameter")?;

    Ok(registry)
}

/// Search path for the properties file: the base directory, then the project config dir.
pub fn build_opener(args: &ResolveArgs, loader: &ConfigLoader) -> CompositeOpener {
    let base_dir = args.base_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut opener = CompositeOpener::new().with(FileSystemOpener::new(base_dir));
    if let Some(project_dir) = loader.project_dir() {
        if project_dir.is_dir() {
            opener = opener.with(FileSystemOpener::new(project_dir));
        }
    }
    opener
}

/// Resolve settings for the given arguments.
pub fn resolve_settings(
    args: &ResolveArgs,
    loader: &ConfigLoader,
    env: impl Fn(&str) -> Option<String>,
) -> Result<MigrationSettings> {
    for (tier, path) in loader.sources() {
        info!(tier = %tier, path = %path.display(), "Using host parameters");
    }
    let registry = build_registry(args, loader, env)?;
    let opener = build_opener(args, loader);
    let settings = Session::new(registry)
        .run(&opener)
        .context("Failed to resolve settings")?;
    Ok(settings)
}

/// Run the resolve command and return the formatted output.
pub fn run_resolve(args: &ResolveArgs, loader: &ConfigLoader) -> Result<String> {
    let settings = resolve_settings(args, loader, |var| std::env::var(var).ok())?;
    format_settings(&settings, args.format.into())
}
