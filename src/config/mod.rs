//! Host parameter configuration.
//!
//! Field values reach the registry in tiers, lowest to highest:
//! 1. **Defaults** - registered on each field
//! 2. **Project** - `$CWD/migrate-settings/config.yaml`
//! 3. **User** - `~/.migrate-settings/config.yaml`
//! 4. **Environment** - `MIGRATE_<FIELD_NAME>` variables
//! 5. **Command line** - `resolve` flags and `-D name=value`
//!
//! YAML tiers are deep-merged under `parameters:`. The properties file is
//! resolved afterwards, against whatever these tiers produced.
//!
//! ## Environment Variables
//! - `MIGRATE_SETTINGS_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `MIGRATE_SETTINGS_PROJECT_DIR` - Project config dir (default: `./migrate-settings`)
//! - `MIGRATE_SETTINGS_USER_DIR` - User config dir (default: `~/.migrate-settings`)

mod inject;
mod loader;
mod merge;
mod types;

pub use inject::{
    ENV_PREFIX, apply_env_overrides, env_var_name, inject_parameters, inject_raw, value_for,
};
pub use loader::{CONFIG_FILE_NAME, CONFIG_PATH_ENV, ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::HostConfig;
