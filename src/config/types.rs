//! Host configuration file types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Contents of a host parameter file (`config.yaml`).
///
/// ```yaml
/// parameters:
///   changeLogFile: db/changelog.xml
///   dropFirst: true
///   contexts: [test, staging]
///   propertiesFile: liquibase.properties
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Field name to value, keyed exactly as the registry names fields.
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

impl HostConfig {
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
