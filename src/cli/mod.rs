//! CLI command definitions for migrate-settings
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod resolve;

use clap::{Args, Parser, Subcommand, ValueEnum};
use resolve::ResolveArgs;

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

impl From<FormatArg> for crate::format::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => crate::format::OutputFormat::Text,
            FormatArg::Json => crate::format::OutputFormat::Json,
        }
    }
}

/// Resolve migration settings from defaults, host parameters and a properties file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Explicit host parameter file (replaces project and user tiers)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and print the final settings
    Resolve(ResolveArgs),

    /// List every known field with its type and default
    Fields(FieldsArgs),
}

/// Arguments for the fields command.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

/// Split a `name=value` assignment. A missing `=` assigns an empty string.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once('=').unwrap_or((s, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid assignment '{}': missing name", s));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("dropFirst=true").unwrap(),
            ("dropFirst".to_string(), "true".to_string())
        );
        assert_eq!(
            parse_assignment("url=jdbc:h2:mem:a=b").unwrap(),
            ("url".to_string(), "jdbc:h2:mem:a=b".to_string())
        );
        assert_eq!(
            parse_assignment("contexts").unwrap(),
            ("contexts".to_string(), String::new())
        );
        assert!(parse_assignment("=oops").is_err());
    }

    #[test]
    fn test_cli_parses_resolve() {
        let cli = Cli::try_parse_from([
            "migrate-settings",
            "--log",
            "off",
            "resolve",
            "--change-log-file",
            "db/changelog.xml",
            "--drop-first",
            "true",
            "-D",
            "contexts=test",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log, "off");
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.change_log_file.as_deref(), Some("db/changelog.xml"));
                assert_eq!(args.drop_first, Some(true));
                assert_eq!(args.params, vec![("contexts".to_string(), "test".to_string())]);
                assert_eq!(args.format, FormatArg::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
