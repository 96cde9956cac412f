//! Output formatting for resolved settings and the field table.

use crate::registry::Registry;
use crate::settings::MigrationSettings;
use anyhow::Result;
use serde_json::json;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Format resolved settings as `key: value` lines.
pub fn format_settings_text(settings: &MigrationSettings) -> String {
    let conn = &settings.connection;
    let mut out = String::new();

    out.push_str(&format!("changeLogFile: {}\n", settings.change_log_file));
    out.push_str(&format!("dropFirst: {}\n", settings.drop_first));
    out.push_str(&format!("contexts: {}\n", settings.contexts));
    if let Some(ref path) = settings.properties_file {
        out.push_str(&format!("propertiesFile: {}\n", path));
    }
    out.push_str(&format!(
        "propertyFileWillOverride: {}\n",
        settings.properties_override
    ));

    for (name, value) in [
        ("driver", &conn.driver),
        ("url", &conn.url),
        ("username", &conn.username),
    ] {
        if let Some(v) = value {
            out.push_str(&format!("{}: {}\n", name, v));
        }
    }
    if conn.password.is_some() {
        out.push_str("password: *****\n");
    }
    out.push_str(&format!(
        "promptOnNonLocalDatabase: {}\n",
        conn.prompt_on_non_local_database
    ));

    out
}

pub fn format_settings(settings: &MigrationSettings, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(settings)? + "\n"),
        OutputFormat::Text => Ok(format_settings_text(settings)),
    }
}

/// Format the registry's field table.
pub fn format_fields(registry: &Registry, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let fields: Vec<_> = registry
                .iter()
                .map(|f| {
                    json!({
                        "name": f.name,
                        "type": f.field_type,
                        "set": f.set,
                        "default": f.default,
                        "required": f.required,
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&fields)? + "\n")
        }
        OutputFormat::Text => {
            let width = registry.names().map(str::len).max().unwrap_or(0);
            let mut out = String::new();
            for f in registry.iter() {
                let default = match f.default {
                    Some(ref d) => format!("default={:?}", d.to_string()),
                    None if f.required => "required".to_string(),
                    None => String::new(),
                };
                out.push_str(
                    format!(
                        "{:<width$}  {:<7}  {:<12}  {}",
                        f.name,
                        f.field_type.to_string(),
                        f.set.to_string(),
                        default,
                        width = width
                    )
                    .trim_end(),
                );
                out.push('\n');
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MigrationSettings {
        let mut registry = Registry::standard();
        registry.set("changeLogFile", "db/changelog.xml").unwrap();
        registry.set("password", "secret").unwrap();
        registry.set("url", "jdbc:h2:mem:x").unwrap();
        MigrationSettings::from_registry(&registry).unwrap()
    }

    #[test]
    fn test_text_masks_password() {
        let text = format_settings_text(&settings());
        assert!(text.contains("changeLogFile: db/changelog.xml\n"));
        assert!(text.contains("url: jdbc:h2:mem:x\n"));
        assert!(text.contains("password: *****\n"));
        assert!(!text.contains("secret"));
        assert!(!text.contains("driver:"));
    }

    #[test]
    fn test_json_round_trips_through_value() {
        let out = format_settings(&settings(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["drop_first"], false);
        assert!(!out.contains("secret"));
    }

    #[test]
    fn test_field_table() {
        let registry = Registry::standard();
        let text = format_fields(&registry, OutputFormat::Text).unwrap();
        assert_eq!(text.lines().count(), registry.len());
        assert!(text.lines().any(|l| l.starts_with("changeLogFile") && l.ends_with("required")));
        assert!(text.contains("default=\"false\""));

        let json = format_fields(&registry, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "driver");
        assert_eq!(value[4]["default"], true);
    }
}
