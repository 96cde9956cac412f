//! Migration settings resolution.
//!
//! Merges registered defaults, host parameters and an optional properties file
//! into the final settings handed to a migration engine.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod opener;
pub mod properties;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod settings;

pub use error::{ConfigError, ConfigResult, ErrorCode};
pub use properties::PropertiesSource;
pub use registry::{Field, FieldSet, FieldType, FieldValue, Registry};
pub use resolver::{ConfigResolver, ResolutionPolicy, resolve};
pub use session::Session;
pub use settings::{MigrationSettings, Migrator};
