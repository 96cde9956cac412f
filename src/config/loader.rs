//! Host parameter loader with tier-based merging.

use super::merge::deep_merge_all;
use super::types::HostConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a single explicit config file.
pub const CONFIG_PATH_ENV: &str = "MIGRATE_SETTINGS_CONFIG_PATH";

/// File name looked up in each tier directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// File-backed configuration tier (lowest to highest priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Project-level parameters ($CWD/migrate-settings/)
    Project = 0,
    /// User-level parameters (~/.migrate-settings/)
    User = 1,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
        }
    }
}

/// Directories for the file-backed tiers.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover directories from the environment and defaults.
    pub fn discover() -> Self {
        let user_dir = std::env::var("MIGRATE_SETTINGS_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".migrate-settings")));

        let project_dir = std::env::var("MIGRATE_SETTINGS_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("migrate-settings")));

        Self {
            project_dir,
            user_dir,
        }
    }

    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }
}

/// Loads and merges host parameter files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: HostConfig,
    /// Files that contributed, lowest tier first.
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load from an explicit path if `MIGRATE_SETTINGS_CONFIG_PATH` is set, else from all tiers.
    pub fn load() -> Result<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load_explicit(explicit);
        }
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load a single file, ignoring the tier directories.
    pub fn load_explicit(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = match read_yaml(&path)? {
            Value::Null => HostConfig::default(),
            value => serde_json::from_value(value)
                .with_context(|| format!("Invalid host config in {}", path.display()))?,
        };
        Ok(Self {
            paths: ConfigPaths::default(),
            config,
            sources: vec![(ConfigTier::Project, path)],
        })
    }

    /// Load the project and user tiers from `paths` and merge them.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        let mut values: Vec<Value> = Vec::new();
        let mut sources = Vec::new();

        let tiers = [
            (ConfigTier::Project, paths.project_dir.as_deref()),
            (ConfigTier::User, paths.user_dir.as_deref()),
        ];
        for (tier, dir) in tiers {
            let Some(dir) = dir else { continue };
            let file = dir.join(CONFIG_FILE_NAME);
            if !file.exists() {
                continue;
            }
            debug!(tier = %tier, path = %file.display(), "Loading host parameters");
            values.push(read_yaml(&file)?);
            sources.push((tier, file));
        }

        let merged = match deep_merge_all(values) {
            Value::Null => HostConfig::default(),
            merged => serde_json::from_value(merged).context("Invalid merged host config")?,
        };

        Ok(Self {
            paths,
            config: merged,
            sources,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }

    pub fn project_dir(&self) -> Option<&Path> {
        self.paths.project_dir.as_deref()
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_files_is_empty() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert!(loader.config().is_empty());
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_user_tier_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("migrate-settings");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            project_dir.join(CONFIG_FILE_NAME),
            "parameters:\n  changeLogFile: db/master.xml\n  dropFirst: false\n",
        )
        .unwrap();
        std::fs::write(
            user_dir.join(CONFIG_FILE_NAME),
            "parameters:\n  dropFirst: true\n",
        )
        .unwrap();

        let loader =
            ConfigLoader::load_with_paths(ConfigPaths::with_dirs(Some(project_dir), Some(user_dir)))
                .unwrap();
        let params = &loader.config().parameters;
        assert_eq!(params["changeLogFile"], json!("db/master.xml"));
        assert_eq!(params["dropFirst"], json!(true));
        assert_eq!(loader.sources().len(), 2);
        assert_eq!(loader.sources()[1].0, ConfigTier::User);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "parameters: [unclosed\n").unwrap();
        let paths = ConfigPaths::with_dirs(Some(temp.path().to_path_buf()), None);
        assert!(ConfigLoader::load_with_paths(paths).is_err());
    }

    #[test]
    fn test_load_explicit() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("ci.yaml");
        std::fs::write(&file, "parameters:\n  contexts: [test, ci]\n").unwrap();

        let loader = ConfigLoader::load_explicit(&file).unwrap();
        assert_eq!(loader.config().parameters["contexts"], json!(["test", "ci"]));
        assert_eq!(loader.sources()[0].1, file);
    }

    #[test]
    fn test_load_explicit_comment_only_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("ci.yaml");
        std::fs::write(&file, "# nothing yet\n").unwrap();

        let loader = ConfigLoader::load_explicit(&file).unwrap();
        assert!(loader.config().is_empty());
        assert_eq!(loader.sources(), &[(ConfigTier::Project, file.clone())]);

        std::fs::write(&file, "").unwrap();
        assert!(ConfigLoader::load_explicit(&file).unwrap().config().is_empty());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ConfigTier::Project < ConfigTier::User);
        assert_eq!(ConfigTier::User.to_string(), "user");
    }
}
